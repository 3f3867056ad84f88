//! User-facing editing operations composed from network store primitives

use geo::Point;
use log::{debug, info, warn};

use super::changes::ChangeSet;
use super::ids::IdSequence;
use crate::error::Error;
use crate::model::{ElementKind, LinkAttrs, LinkId, Network, NodeId};
use crate::transform::CoordTransform;
use crate::validation::{self, ValidationEntry};

/// How the reverse direction of a bidirectional pair was satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReverseLink {
    /// A fresh reverse link was created with the given id.
    Created(LinkId),
    /// A reverse link already existed; the forward link was still created.
    AlreadyPresent(LinkId),
}

/// Outcome of [`NetworkEditor::add_bidirectional_link`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidirectionalLink {
    pub forward: LinkId,
    pub reverse: ReverseLink,
    pub changes: ChangeSet,
}

/// Editing operations over an owned [`Network`].
///
/// Every mutation returns a [`ChangeSet`] naming the ids it added or removed;
/// presentation code consumes those to keep markers and table rows in step.
/// Operations run to completion on the calling thread, so a returned error
/// always leaves the network in the state it had before the call, except
/// where documented (a reverse link that already exists does not roll back
/// the forward link).
#[derive(Debug)]
pub struct NetworkEditor {
    network: Network,
    ids: IdSequence,
}

impl NetworkEditor {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            ids: IdSequence::new(),
        }
    }

    /// Editor with a caller-controlled id sequence, for deterministic ids.
    pub fn with_ids(network: Network, ids: IdSequence) -> Self {
        Self { network, ids }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    pub fn generate_node_id(&mut self) -> NodeId {
        self.ids.next_node_id(&self.network)
    }

    pub fn generate_link_id(&mut self) -> LinkId {
        self.ids.next_link_id(&self.network)
    }

    /// Adds a node, generating an id when the caller supplies none.
    pub fn add_node(&mut self, id: Option<NodeId>, position: Point<f64>) -> Result<ChangeSet, Error> {
        let id = id.unwrap_or_else(|| self.ids.next_node_id(&self.network));
        self.network.create_node(id.clone(), position)?;
        info!("added node '{id}' at ({}, {})", position.x(), position.y());
        Ok(ChangeSet::node_added(id))
    }

    /// Renames and/or moves a node.
    ///
    /// A rename is reported as remove-old/add-new so adapters re-key their
    /// markers; a pure move only touches the incident links' geometry.
    pub fn edit_node(
        &mut self,
        old: &NodeId,
        new: NodeId,
        position: Point<f64>,
    ) -> Result<ChangeSet, Error> {
        let current = self
            .network
            .node(old)
            .ok_or_else(|| Error::NotFound {
                kind: ElementKind::Node,
                id: old.to_string(),
            })?
            .position;

        let mut changes = ChangeSet::default();
        if *old != new {
            self.network.rename_node(old, new.clone())?;
            changes.nodes_removed.push(old.clone());
            changes.nodes_added.push(new.clone());
        }
        if current != position {
            changes.links_touched = self.network.move_node(&new, position)?;
        }
        Ok(changes)
    }

    /// Removes a node together with its incident links.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<ChangeSet, Error> {
        let removed = self.network.remove_node(id)?;
        info!(
            "removed node '{id}' with {} incident link(s)",
            removed.removed_links.len()
        );
        Ok(ChangeSet {
            nodes_removed: vec![removed.node.id],
            links_removed: removed.removed_links,
            ..ChangeSet::default()
        })
    }

    /// Adds a link between two nodes known by id.
    pub fn add_link(
        &mut self,
        id: Option<LinkId>,
        from: NodeId,
        to: NodeId,
        attrs: LinkAttrs,
    ) -> Result<ChangeSet, Error> {
        let id = id.unwrap_or_else(|| self.ids.next_link_id(&self.network));
        self.network.create_link(id.clone(), from, to, attrs)?;
        info!("added link '{id}'");
        Ok(ChangeSet::link_added(id))
    }

    /// Adds a link between the nodes sitting at two map positions.
    pub fn add_link_at(
        &mut self,
        id: Option<LinkId>,
        from: Point<f64>,
        to: Point<f64>,
        attrs: LinkAttrs,
        tolerance: f64,
    ) -> Result<ChangeSet, Error> {
        let from = self.resolve_endpoint(from, tolerance)?;
        let to = self.resolve_endpoint(to, tolerance)?;
        self.add_link(id, from, to, attrs)
    }

    /// Adds a forward link and, unless one already exists, a reverse link
    /// with identical attributes and a generated id.
    ///
    /// Fails before creating anything when an endpoint cannot be resolved or
    /// a forward link between the pair already exists. An already-present
    /// reverse link is not an error: the forward link stays and the outcome
    /// says which link serves the reverse direction.
    pub fn add_bidirectional_link(
        &mut self,
        id: Option<LinkId>,
        from: Point<f64>,
        to: Point<f64>,
        attrs: LinkAttrs,
        tolerance: f64,
    ) -> Result<BidirectionalLink, Error> {
        let from = self.resolve_endpoint(from, tolerance)?;
        let to = self.resolve_endpoint(to, tolerance)?;
        if self.network.has_link(&from, &to) {
            return Err(Error::LinkExists {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let forward = id.unwrap_or_else(|| self.ids.next_link_id(&self.network));
        self.network
            .create_link(forward.clone(), from.clone(), to.clone(), attrs)?;
        let mut changes = ChangeSet::link_added(forward.clone());

        // The reverse direction swaps endpoints, so it needs its own search.
        let reverse = match self.network.link_between(&to, &from) {
            Some(existing) => {
                warn!(
                    "reverse link '{}' already exists, keeping it as the reverse of '{forward}'",
                    existing.id
                );
                ReverseLink::AlreadyPresent(existing.id.clone())
            }
            None => {
                let reverse_id = self.ids.next_link_id(&self.network);
                self.network
                    .create_link(reverse_id.clone(), to, from, attrs)?;
                changes.links_added.push(reverse_id.clone());
                ReverseLink::Created(reverse_id)
            }
        };
        info!("added bidirectional link '{forward}' ({reverse:?})");
        Ok(BidirectionalLink {
            forward,
            reverse,
            changes,
        })
    }

    /// Re-ids a link, replaces its attributes and reconciles the reverse
    /// direction with the requested `bidirectional` state.
    ///
    /// The bidirectional flag is not stored anywhere; it is inferred from the
    /// presence of a reverse link and enforced here: toggling it off removes
    /// an existing reverse link, toggling it on creates one carrying the
    /// edited attributes.
    pub fn edit_link(
        &mut self,
        old: &LinkId,
        new: LinkId,
        attrs: LinkAttrs,
        bidirectional: bool,
    ) -> Result<ChangeSet, Error> {
        let (from, to) = {
            let link = self.network.link(old).ok_or_else(|| Error::NotFound {
                kind: ElementKind::Link,
                id: old.to_string(),
            })?;
            (link.from.clone(), link.to.clone())
        };

        // The rename goes first: once it has succeeded, reconciling the
        // reverse direction cannot fail, so an error return never leaves a
        // half-applied edit behind. The reverse id is generated after the
        // rename, so it skips `new` even when `new` is counter-shaped.
        let mut changes = ChangeSet::default();
        if self.network.rename_link(old, new.clone(), attrs)? {
            if *old == new {
                changes.links_touched.push(new.clone());
            } else {
                changes.links_removed.push(old.clone());
                changes.links_added.push(new.clone());
            }
        } else {
            return Err(Error::DuplicateId {
                kind: ElementKind::Link,
                id: new.to_string(),
            });
        }

        let reverse = self.network.link_between(&to, &from).map(|l| l.id.clone());
        match (bidirectional, reverse) {
            (true, None) => {
                let reverse_id = self.ids.next_link_id(&self.network);
                self.network
                    .create_link(reverse_id.clone(), to, from, attrs)?;
                debug!("created reverse link '{reverse_id}' for '{new}'");
                changes.links_added.push(reverse_id);
            }
            (false, Some(reverse_id)) => {
                self.network.remove_link(&reverse_id)?;
                debug!("removed reverse link '{reverse_id}' of '{new}'");
                changes.links_removed.push(reverse_id);
            }
            _ => {}
        }
        Ok(changes)
    }

    /// Removes a single link.
    pub fn remove_link(&mut self, id: &LinkId) -> Result<ChangeSet, Error> {
        let link = self.network.remove_link(id)?;
        info!("removed link '{}'", link.id);
        Ok(ChangeSet {
            links_removed: vec![link.id],
            ..ChangeSet::default()
        })
    }

    /// Runs all structural checks, replacing any previously obtained list.
    pub fn validate(
        &self,
        transform: &dyn CoordTransform,
        distance_threshold: f64,
    ) -> Vec<ValidationEntry> {
        validation::run_all(&self.network, transform, distance_threshold)
    }

    fn resolve_endpoint(&self, position: Point<f64>, tolerance: f64) -> Result<NodeId, Error> {
        self.network
            .find_node_by_position(position, tolerance)
            .map(|node| node.id.clone())
            .ok_or(Error::EndpointNotFound {
                x: position.x(),
                y: position.y(),
            })
    }
}
