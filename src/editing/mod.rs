//! Editing operations layered over the network store
//!
//! Composes store primitives into the actions a user triggers from the map:
//! node and link creation with generated ids, bidirectional pairing, and
//! attribute edits, each reporting the ids it changed.

mod changes;
mod editor;
mod ids;

pub use changes::ChangeSet;
pub use editor::{BidirectionalLink, NetworkEditor, ReverseLink};
pub use ids::IdSequence;
