//! Data model for editable road networks
//!
//! Contains the network aggregate and its element types.

pub mod components;
pub mod network;

pub use components::{DEFAULT_MODE, ElementKind, Link, LinkAttrs, LinkId, Node, NodeId};
pub use network::{
    DEFAULT_CAPACITY_PERIOD, DEFAULT_EFFECTIVE_CELL_SIZE, DEFAULT_EFFECTIVE_LANE_WIDTH, Network,
    NetworkSummary, RemovedNode,
};
