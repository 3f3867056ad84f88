//! Convenience re-exports for embedding applications

pub use crate::editing::{BidirectionalLink, ChangeSet, IdSequence, NetworkEditor, ReverseLink};
pub use crate::error::Error;
pub use crate::io::{MapSettings, NetworkReader, NetworkWriter};
pub use crate::model::{
    ElementKind, Link, LinkAttrs, LinkId, Network, NetworkSummary, Node, NodeId, RemovedNode,
};
pub use crate::transform::{CoordSystem, CoordTransform, IdentityTransform};
pub use crate::validation::{
    DEFAULT_DISTANCE_THRESHOLD, ValidationEntry, check_attribute_ranges,
    check_bidirectional_mismatch, check_dangling_nodes, run_all,
};
