//! Change reporting for presentation adapters

use serde::Serialize;

use crate::model::{LinkId, NodeId};

/// Ids touched by one editing operation.
///
/// The core never calls into rendering code; instead every editor operation
/// returns one of these so the adapter can add or retract markers, lines and
/// table rows incrementally (or just repaint everything).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    pub nodes_added: Vec<NodeId>,
    pub nodes_removed: Vec<NodeId>,
    pub links_added: Vec<LinkId>,
    pub links_removed: Vec<LinkId>,
    /// Links whose attributes or geometry changed without a change of id.
    pub links_touched: Vec<LinkId>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.nodes_added.is_empty()
            && self.nodes_removed.is_empty()
            && self.links_added.is_empty()
            && self.links_removed.is_empty()
            && self.links_touched.is_empty()
    }

    pub(crate) fn node_added(id: NodeId) -> Self {
        Self {
            nodes_added: vec![id],
            ..Self::default()
        }
    }

    pub(crate) fn link_added(id: LinkId) -> Self {
        Self {
            links_added: vec![id],
            ..Self::default()
        }
    }
}
