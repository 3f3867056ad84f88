//! Editing core for MATSim transportation networks
//!
//! An in-memory directed graph with geometric node positions and per-link
//! traffic attributes, plus the operations a visual network editor needs:
//! structural mutations with referential integrity, bidirectional link
//! pairing, and non-blocking validation scans. Rendering, dialogs and the
//! network XML codec live outside this crate; the boundaries they plug into
//! are in [`io`] and [`editing::ChangeSet`].
//!
//! The core is single-threaded by design: every operation is a finite
//! in-memory computation run to completion on the calling thread. Background
//! file loading should build a [`model::Network`] off-thread and swap it in
//! whole.

pub mod editing;
pub mod error;
pub mod io;
pub mod model;
pub mod prelude;
pub mod transform;
pub mod validation;

pub use error::Error;

// Re-export key components
pub use editing::{BidirectionalLink, ChangeSet, IdSequence, NetworkEditor, ReverseLink};
pub use io::{MapSettings, NetworkReader, NetworkWriter};
pub use model::{ElementKind, Link, LinkAttrs, LinkId, Network, NetworkSummary, Node, NodeId};
pub use transform::{CoordSystem, CoordTransform, IdentityTransform};
pub use validation::{DEFAULT_DISTANCE_THRESHOLD, ValidationEntry};
