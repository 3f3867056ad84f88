//! The network store: node and link tables plus the adjacency index

use geo::{Distance, Euclidean, Point};
use hashbrown::{HashMap, HashSet};
use log::debug;
use serde::Serialize;

use super::components::{ElementKind, Link, LinkAttrs, LinkId, Node, NodeId};
use crate::error::Error;
use crate::transform::CoordSystem;

/// MATSim network-wide defaults: capacity period of one hour, lane width and
/// cell size in meters.
pub const DEFAULT_CAPACITY_PERIOD: f64 = 3600.0;
pub const DEFAULT_EFFECTIVE_LANE_WIDTH: f64 = 3.75;
pub const DEFAULT_EFFECTIVE_CELL_SIZE: f64 = 7.5;

/// Result of a cascading node removal.
///
/// Carries the removed node and every link id deleted alongside it, so a
/// presentation adapter can retract the matching markers and lines.
#[derive(Debug, Clone)]
pub struct RemovedNode {
    pub node: Node,
    pub removed_links: Vec<LinkId>,
}

/// Scalar attributes and element counts, for display panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub name: Option<String>,
    pub coordinate_system: CoordSystem,
    pub node_count: usize,
    pub link_count: usize,
    pub capacity_period: f64,
    pub effective_lane_width: f64,
    pub effective_cell_size: f64,
}

/// A directed road network with geometric node positions.
///
/// The network owns all node and link records exclusively. Links reference
/// their endpoints by id, so every structural mutation also patches the
/// derived adjacency index (`in_links`, `out_links`, `by_endpoints`); the
/// index is never inferred lazily. All read accessors are cheap; mutation
/// goes through the methods below, which uphold referential integrity:
/// a link's `from` and `to` always name nodes present in the table.
#[derive(Debug, Clone)]
pub struct Network {
    name: Option<String>,
    coordinate_system: CoordSystem,
    capacity_period: f64,
    effective_lane_width: f64,
    effective_cell_size: f64,
    nodes: HashMap<NodeId, Node>,
    links: HashMap<LinkId, Link>,
    /// Links whose `to` is this node.
    in_links: HashMap<NodeId, HashSet<LinkId>>,
    /// Links whose `from` is this node.
    out_links: HashMap<NodeId, HashSet<LinkId>>,
    /// Directed adjacency: `(from, to)` to the links connecting that pair.
    by_endpoints: HashMap<(NodeId, NodeId), HashSet<LinkId>>,
}

impl Network {
    pub fn new(coordinate_system: CoordSystem) -> Self {
        Self {
            name: None,
            coordinate_system,
            capacity_period: DEFAULT_CAPACITY_PERIOD,
            effective_lane_width: DEFAULT_EFFECTIVE_LANE_WIDTH,
            effective_cell_size: DEFAULT_EFFECTIVE_CELL_SIZE,
            nodes: HashMap::new(),
            links: HashMap::new(),
            in_links: HashMap::new(),
            out_links: HashMap::new(),
            by_endpoints: HashMap::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn coordinate_system(&self) -> &CoordSystem {
        &self.coordinate_system
    }

    pub fn set_coordinate_system(&mut self, coordinate_system: CoordSystem) {
        self.coordinate_system = coordinate_system;
    }

    pub fn capacity_period(&self) -> f64 {
        self.capacity_period
    }

    pub fn set_capacity_period(&mut self, seconds: f64) {
        self.capacity_period = seconds;
    }

    pub fn effective_lane_width(&self) -> f64 {
        self.effective_lane_width
    }

    pub fn set_effective_lane_width(&mut self, meters: f64) {
        self.effective_lane_width = meters;
    }

    pub fn effective_cell_size(&self) -> f64 {
        self.effective_cell_size
    }

    pub fn set_effective_cell_size(&mut self, meters: f64) {
        self.effective_cell_size = meters;
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn link(&self, id: &LinkId) -> Option<&Link> {
        self.links.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Ids of links ending at `node`. Empty when the node is unknown.
    pub fn in_links(&self, node: &NodeId) -> impl Iterator<Item = &LinkId> {
        self.in_links.get(node).into_iter().flatten()
    }

    /// Ids of links starting at `node`. Empty when the node is unknown.
    pub fn out_links(&self, node: &NodeId) -> impl Iterator<Item = &LinkId> {
        self.out_links.get(node).into_iter().flatten()
    }

    /// Union of a node's in- and out-link ids. A self-loop appears once.
    pub fn incident_links(&self, node: &NodeId) -> Vec<LinkId> {
        let mut merged: HashSet<LinkId> = self.in_links(node).cloned().collect();
        merged.extend(self.out_links(node).cloned());
        merged.into_iter().collect()
    }

    pub fn summary(&self) -> NetworkSummary {
        NetworkSummary {
            name: self.name.clone(),
            coordinate_system: self.coordinate_system.clone(),
            node_count: self.nodes.len(),
            link_count: self.links.len(),
            capacity_period: self.capacity_period,
            effective_lane_width: self.effective_lane_width,
            effective_cell_size: self.effective_cell_size,
        }
    }

    /// Inserts a node with no incident links.
    pub fn create_node(&mut self, id: NodeId, position: Point<f64>) -> Result<&Node, Error> {
        if self.nodes.contains_key(&id) {
            return Err(Error::DuplicateId {
                kind: ElementKind::Node,
                id: id.to_string(),
            });
        }
        self.in_links.insert(id.clone(), HashSet::new());
        self.out_links.insert(id.clone(), HashSet::new());
        self.nodes.insert(id.clone(), Node::new(id.clone(), position));
        Ok(&self.nodes[&id])
    }

    /// Removes a node and, cascading, every link incident to it.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<RemovedNode, Error> {
        let Some(node) = self.nodes.remove(id) else {
            return Err(self.missing_node(id));
        };
        // Collect the union of in- and out-links first, then drop each link
        // so both endpoint indices stay consistent.
        let incident = self.incident_links(id);
        for link_id in &incident {
            if let Some(link) = self.links.remove(link_id) {
                self.unindex_link(&link);
            }
        }
        self.in_links.remove(id);
        self.out_links.remove(id);
        debug!(
            "removed node '{id}' and {} incident link(s)",
            incident.len()
        );
        Ok(RemovedNode {
            node,
            removed_links: incident,
        })
    }

    /// Inserts a link between two existing nodes and indexes it at both
    /// endpoints.
    pub fn create_link(
        &mut self,
        id: LinkId,
        from: NodeId,
        to: NodeId,
        attrs: LinkAttrs,
    ) -> Result<&Link, Error> {
        if self.links.contains_key(&id) {
            return Err(Error::DuplicateId {
                kind: ElementKind::Link,
                id: id.to_string(),
            });
        }
        if !self.nodes.contains_key(&from) {
            return Err(self.missing_node(&from));
        }
        if !self.nodes.contains_key(&to) {
            return Err(self.missing_node(&to));
        }
        let link = Link::new(id.clone(), from, to, attrs);
        self.index_link(&link);
        self.links.insert(id.clone(), link);
        Ok(&self.links[&id])
    }

    /// Removes a link and unindexes it at both endpoints.
    pub fn remove_link(&mut self, id: &LinkId) -> Result<Link, Error> {
        let link = self.links.remove(id).ok_or_else(|| self.missing_link(id))?;
        self.unindex_link(&link);
        Ok(link)
    }

    /// Moves a node's identity to a new id.
    ///
    /// Links store endpoint ids by value, so every incident link's `from`/`to`
    /// is rewritten along with the adjacency index entries. No-op when the
    /// ids are equal.
    pub fn rename_node(&mut self, old: &NodeId, new: NodeId) -> Result<(), Error> {
        if *old == new {
            return Ok(());
        }
        if self.nodes.contains_key(&new) {
            return Err(Error::DuplicateId {
                kind: ElementKind::Node,
                id: new.to_string(),
            });
        }
        let Some(mut node) = self.nodes.remove(old) else {
            return Err(self.missing_node(old));
        };
        node.id = new.clone();
        self.nodes.insert(new.clone(), node);

        // Rewrite endpoints of every incident link and re-key the endpoint
        // index. unindex/index runs against the link's current fields, so
        // unindex first, patch, then index again.
        for link_id in self.incident_links(old) {
            let Some(mut link) = self.links.remove(&link_id) else {
                continue;
            };
            self.unindex_link(&link);
            if link.from == *old {
                link.from = new.clone();
            }
            if link.to == *old {
                link.to = new.clone();
            }
            self.index_link(&link);
            self.links.insert(link_id, link);
        }

        // The per-node sets were re-created by index_link where needed; move
        // any remaining (possibly empty) sets under the new key.
        if let Some(set) = self.in_links.remove(old) {
            self.in_links.entry(new.clone()).or_default().extend(set);
        }
        if let Some(set) = self.out_links.remove(old) {
            self.out_links.entry(new.clone()).or_default().extend(set);
        }
        debug!("renamed node '{old}' to '{new}'");
        Ok(())
    }

    /// Re-ids a link and replaces its attributes.
    ///
    /// When `new` equals the current id the attributes are updated in place.
    /// When `new` collides with a different existing link nothing changes and
    /// `Ok(false)` is returned; the caller decides how to report that.
    pub fn rename_link(&mut self, old: &LinkId, new: LinkId, attrs: LinkAttrs) -> Result<bool, Error> {
        if *old == new {
            let link = self.links.get_mut(old).ok_or_else(|| Error::NotFound {
                kind: ElementKind::Link,
                id: old.to_string(),
            })?;
            link.set_attrs(attrs);
            return Ok(true);
        }
        if !self.links.contains_key(old) {
            return Err(self.missing_link(old));
        }
        if self.links.contains_key(&new) {
            return Ok(false);
        }
        let Some(mut link) = self.links.remove(old) else {
            return Err(self.missing_link(old));
        };
        self.unindex_link(&link);
        link.id = new.clone();
        link.set_attrs(attrs);
        self.index_link(&link);
        self.links.insert(new, link);
        Ok(true)
    }

    /// Moves a node to a new position.
    ///
    /// Returns the incident link ids so the presentation adapter can rebuild
    /// the lines drawn through the old position.
    pub fn move_node(&mut self, id: &NodeId, position: Point<f64>) -> Result<Vec<LinkId>, Error> {
        let node = self.nodes.get_mut(id).ok_or_else(|| Error::NotFound {
            kind: ElementKind::Node,
            id: id.to_string(),
        })?;
        node.position = position;
        Ok(self.incident_links(id))
    }

    /// Resolves a position to a node, scanning the table linearly.
    ///
    /// With `tolerance` 0 only exact coordinate matches count; otherwise the
    /// first node within `tolerance` (Euclidean, in network units) is
    /// returned. Node identity is opaque to a map widget, which only knows
    /// where the user clicked.
    pub fn find_node_by_position(&self, position: Point<f64>, tolerance: f64) -> Option<&Node> {
        self.nodes.values().find(|node| {
            if tolerance == 0.0 {
                node.position == position
            } else {
                Euclidean.distance(node.position, position) <= tolerance
            }
        })
    }

    /// Whether any link runs from `from` to `to` in that direction.
    pub fn has_link(&self, from: &NodeId, to: &NodeId) -> bool {
        self.by_endpoints
            .get(&(from.clone(), to.clone()))
            .is_some_and(|set| !set.is_empty())
    }

    /// First link running from `from` to `to`, if any.
    pub fn link_between(&self, from: &NodeId, to: &NodeId) -> Option<&Link> {
        self.links_between(from, to).next()
    }

    /// All links running from `from` to `to`.
    pub fn links_between(&self, from: &NodeId, to: &NodeId) -> impl Iterator<Item = &Link> {
        self.by_endpoints
            .get(&(from.clone(), to.clone()))
            .into_iter()
            .flatten()
            .filter_map(|id| self.links.get(id))
    }

    /// Label text for a node at `position`, as shown next to the cursor.
    pub fn node_description(&self, position: Point<f64>, tolerance: f64) -> Option<String> {
        self.find_node_by_position(position, tolerance).map(|node| {
            format!(
                "{} -> x: {} y: {}",
                node.id,
                node.position.x(),
                node.position.y()
            )
        })
    }

    /// Drops all nodes and links, keeping the scalar attributes.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.links.clear();
        self.in_links.clear();
        self.out_links.clear();
        self.by_endpoints.clear();
    }

    fn index_link(&mut self, link: &Link) {
        self.out_links
            .entry(link.from.clone())
            .or_default()
            .insert(link.id.clone());
        self.in_links
            .entry(link.to.clone())
            .or_default()
            .insert(link.id.clone());
        self.by_endpoints
            .entry((link.from.clone(), link.to.clone()))
            .or_default()
            .insert(link.id.clone());
    }

    fn unindex_link(&mut self, link: &Link) {
        if let Some(set) = self.out_links.get_mut(&link.from) {
            set.remove(&link.id);
        }
        if let Some(set) = self.in_links.get_mut(&link.to) {
            set.remove(&link.id);
        }
        let key = (link.from.clone(), link.to.clone());
        if let Some(set) = self.by_endpoints.get_mut(&key) {
            set.remove(&link.id);
            if set.is_empty() {
                self.by_endpoints.remove(&key);
            }
        }
    }

    fn missing_node(&self, id: &NodeId) -> Error {
        Error::NotFound {
            kind: ElementKind::Node,
            id: id.to_string(),
        }
    }

    fn missing_link(&self, id: &LinkId) -> Error {
        Error::NotFound {
            kind: ElementKind::Link,
            id: id.to_string(),
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new(CoordSystem::wgs84())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> LinkAttrs {
        LinkAttrs::new(100.0, 13.9, 1800.0, 1.0)
    }

    fn network_with_two_nodes() -> Network {
        let mut network = Network::default();
        network
            .create_node(NodeId::from("a"), Point::new(0.0, 0.0))
            .unwrap();
        network
            .create_node(NodeId::from("b"), Point::new(3.0, 4.0))
            .unwrap();
        network
    }

    #[test]
    fn summary_reports_counts_and_scalar_attributes() {
        let mut network = network_with_two_nodes();
        network.set_name("test net");
        network
            .create_link(LinkId::from("l1"), NodeId::from("a"), NodeId::from("b"), attrs())
            .unwrap();

        let summary = network.summary();
        assert_eq!(summary.name.as_deref(), Some("test net"));
        assert_eq!(summary.coordinate_system, CoordSystem::wgs84());
        assert_eq!(summary.node_count, 2);
        assert_eq!(summary.link_count, 1);
        assert_eq!(summary.capacity_period, DEFAULT_CAPACITY_PERIOD);
        assert_eq!(summary.effective_lane_width, DEFAULT_EFFECTIVE_LANE_WIDTH);
        assert_eq!(summary.effective_cell_size, DEFAULT_EFFECTIVE_CELL_SIZE);
    }

    #[test]
    fn duplicate_node_id_is_rejected_and_store_unchanged() {
        let mut network = network_with_two_nodes();
        let err = network
            .create_node(NodeId::from("a"), Point::new(9.0, 9.0))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateId { .. }));
        assert_eq!(network.node_count(), 2);
        // The original node keeps its position.
        let a = network.node(&NodeId::from("a")).unwrap();
        assert_eq!(a.position, Point::new(0.0, 0.0));
    }

    #[test]
    fn create_link_requires_both_endpoints() {
        let mut network = network_with_two_nodes();
        let err = network
            .create_link(
                LinkId::from("l1"),
                NodeId::from("a"),
                NodeId::from("ghost"),
                attrs(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(network.link_count(), 0);
    }

    #[test]
    fn link_updates_endpoint_indices() {
        let mut network = network_with_two_nodes();
        network
            .create_link(LinkId::from("l1"), NodeId::from("a"), NodeId::from("b"), attrs())
            .unwrap();
        let out: Vec<_> = network.out_links(&NodeId::from("a")).collect();
        let inn: Vec<_> = network.in_links(&NodeId::from("b")).collect();
        assert_eq!(out, vec![&LinkId::from("l1")]);
        assert_eq!(inn, vec![&LinkId::from("l1")]);
        assert!(network.has_link(&NodeId::from("a"), &NodeId::from("b")));
        assert!(!network.has_link(&NodeId::from("b"), &NodeId::from("a")));
    }

    #[test]
    fn remove_node_cascades_to_incident_links() {
        let mut network = network_with_two_nodes();
        network
            .create_link(LinkId::from("ab"), NodeId::from("a"), NodeId::from("b"), attrs())
            .unwrap();
        network
            .create_link(LinkId::from("ba"), NodeId::from("b"), NodeId::from("a"), attrs())
            .unwrap();

        let removed = network.remove_node(&NodeId::from("a")).unwrap();
        let mut ids = removed.removed_links.clone();
        ids.sort();
        assert_eq!(ids, vec![LinkId::from("ab"), LinkId::from("ba")]);
        assert_eq!(network.link_count(), 0);
        // No surviving link references the removed node.
        assert!(
            network
                .links()
                .all(|l| l.from != NodeId::from("a") && l.to != NodeId::from("a"))
        );
        assert_eq!(network.in_links(&NodeId::from("b")).count(), 0);
    }

    #[test]
    fn remove_missing_link_leaves_table_unchanged() {
        let mut network = network_with_two_nodes();
        network
            .create_link(LinkId::from("l1"), NodeId::from("a"), NodeId::from("b"), attrs())
            .unwrap();
        let err = network.remove_link(&LinkId::from("nope")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(network.link_count(), 1);
    }

    #[test]
    fn rename_node_rewrites_incident_links() {
        let mut network = network_with_two_nodes();
        network
            .create_link(LinkId::from("ab"), NodeId::from("a"), NodeId::from("b"), attrs())
            .unwrap();
        network
            .create_link(LinkId::from("ba"), NodeId::from("b"), NodeId::from("a"), attrs())
            .unwrap();

        network
            .rename_node(&NodeId::from("a"), NodeId::from("a2"))
            .unwrap();

        assert!(network.node(&NodeId::from("a")).is_none());
        let ab = network.link(&LinkId::from("ab")).unwrap();
        assert_eq!(ab.from, NodeId::from("a2"));
        let ba = network.link(&LinkId::from("ba")).unwrap();
        assert_eq!(ba.to, NodeId::from("a2"));
        assert!(network.has_link(&NodeId::from("a2"), &NodeId::from("b")));
        assert!(!network.has_link(&NodeId::from("a"), &NodeId::from("b")));
        // The adjacency index matches a from-scratch recomputation.
        let out: Vec<_> = network.out_links(&NodeId::from("a2")).collect();
        assert_eq!(out, vec![&LinkId::from("ab")]);
    }

    #[test]
    fn rename_node_to_same_id_is_a_noop() {
        let mut network = network_with_two_nodes();
        network
            .rename_node(&NodeId::from("a"), NodeId::from("a"))
            .unwrap();
        assert!(network.node(&NodeId::from("a")).is_some());
    }

    #[test]
    fn rename_node_to_taken_id_fails() {
        let mut network = network_with_two_nodes();
        let err = network
            .rename_node(&NodeId::from("a"), NodeId::from("b"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateId { .. }));
    }

    #[test]
    fn rename_link_collision_returns_false_without_changes() {
        let mut network = network_with_two_nodes();
        network
            .create_link(LinkId::from("l1"), NodeId::from("a"), NodeId::from("b"), attrs())
            .unwrap();
        network
            .create_link(LinkId::from("l2"), NodeId::from("b"), NodeId::from("a"), attrs())
            .unwrap();

        let renamed = network
            .rename_link(&LinkId::from("l1"), LinkId::from("l2"), attrs())
            .unwrap();
        assert!(!renamed);
        assert!(network.link(&LinkId::from("l1")).is_some());
    }

    #[test]
    fn rename_link_same_id_updates_attributes_in_place() {
        let mut network = network_with_two_nodes();
        network
            .create_link(LinkId::from("l1"), NodeId::from("a"), NodeId::from("b"), attrs())
            .unwrap();
        let new_attrs = LinkAttrs::new(5.0, 10.0, 100.0, 2.0);
        let renamed = network
            .rename_link(&LinkId::from("l1"), LinkId::from("l1"), new_attrs)
            .unwrap();
        assert!(renamed);
        let link = network.link(&LinkId::from("l1")).unwrap();
        assert_eq!(link.attrs(), new_attrs);
    }

    #[test]
    fn rename_link_moves_record_and_index() {
        let mut network = network_with_two_nodes();
        network
            .create_link(LinkId::from("l1"), NodeId::from("a"), NodeId::from("b"), attrs())
            .unwrap();
        let renamed = network
            .rename_link(&LinkId::from("l1"), LinkId::from("renamed"), attrs())
            .unwrap();
        assert!(renamed);
        assert!(network.link(&LinkId::from("l1")).is_none());
        assert!(network.link(&LinkId::from("renamed")).is_some());
        let out: Vec<_> = network.out_links(&NodeId::from("a")).collect();
        assert_eq!(out, vec![&LinkId::from("renamed")]);
    }

    #[test]
    fn find_node_by_position_exact_and_with_tolerance() {
        let network = network_with_two_nodes();
        let exact = network.find_node_by_position(Point::new(3.0, 4.0), 0.0);
        assert_eq!(exact.unwrap().id, NodeId::from("b"));
        assert!(
            network
                .find_node_by_position(Point::new(3.1, 4.0), 0.0)
                .is_none()
        );
        let near = network.find_node_by_position(Point::new(3.1, 4.0), 0.5);
        assert_eq!(near.unwrap().id, NodeId::from("b"));
    }

    #[test]
    fn move_node_reports_incident_links() {
        let mut network = network_with_two_nodes();
        network
            .create_link(LinkId::from("ab"), NodeId::from("a"), NodeId::from("b"), attrs())
            .unwrap();
        let touched = network
            .move_node(&NodeId::from("a"), Point::new(1.0, 1.0))
            .unwrap();
        assert_eq!(touched, vec![LinkId::from("ab")]);
        let a = network.node(&NodeId::from("a")).unwrap();
        assert_eq!(a.position, Point::new(1.0, 1.0));
    }

    #[test]
    fn clear_keeps_scalar_attributes() {
        let mut network = network_with_two_nodes();
        network.set_name("munich");
        network.clear();
        assert_eq!(network.node_count(), 0);
        assert_eq!(network.name(), Some("munich"));
    }
}
