//! External boundaries: network file codecs and settings persistence
//!
//! The MATSim network XML format (plain or gzip-compressed) is read and
//! written by an external codec; the core only fixes the contracts it talks
//! through. Implementations are expected to parse off the interactive thread
//! and hand the finished [`Network`] over in one piece.

use std::path::Path;

use crate::error::Error;
use crate::model::Network;
use crate::transform::CoordSystem;

mod settings;

pub use settings::MapSettings;

/// Loads a network from a file, converting node positions from
/// `source_coord_system` into the system the returned network declares.
pub trait NetworkReader {
    fn load(&self, path: &Path, source_coord_system: &CoordSystem) -> Result<Network, Error>;
}

/// Writes a network to a file in the codec's format.
pub trait NetworkWriter {
    fn save(&self, network: &Network, path: &Path) -> Result<(), Error>;
}
