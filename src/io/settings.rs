//! Persistence of the editor's map defaults
//!
//! A deliberately tiny format carried over from the original editor: two
//! lines of text, the default zoom level and the map-center coordinate.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Map defaults read at startup and written when the user changes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    pub default_zoom: u32,
    pub center_lat: f64,
    pub center_lon: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        // Munich, the original editor's home town.
        Self {
            default_zoom: 14,
            center_lat: 48.1351,
            center_lon: 11.5820,
        }
    }
}

impl MapSettings {
    /// Reads settings from the two-line file format:
    /// line 1 the integer zoom, line 2 `"<lat>, <lon>"`.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        let mut lines = content.lines();

        let zoom_line = lines
            .next()
            .ok_or_else(|| Error::InvalidSettings("missing zoom line".into()))?;
        let default_zoom = zoom_line
            .trim()
            .parse()
            .map_err(|_| Error::InvalidSettings(format!("invalid zoom '{zoom_line}'")))?;

        let center_line = lines
            .next()
            .ok_or_else(|| Error::InvalidSettings("missing center coordinate line".into()))?;
        let (lat, lon) = center_line
            .split_once(',')
            .ok_or_else(|| Error::InvalidSettings(format!("invalid center '{center_line}'")))?;
        let center_lat = lat
            .trim()
            .parse()
            .map_err(|_| Error::InvalidSettings(format!("invalid latitude '{lat}'")))?;
        let center_lon = lon
            .trim()
            .parse()
            .map_err(|_| Error::InvalidSettings(format!("invalid longitude '{lon}'")))?;

        debug!("loaded map settings from {}", path.display());
        Ok(Self {
            default_zoom,
            center_lat,
            center_lon,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let content = format!(
            "{}\n{}, {}",
            self.default_zoom, self.center_lat, self.center_lon
        );
        fs::write(path, content)?;
        debug!("saved map settings to {}", path.display());
        Ok(())
    }
}
