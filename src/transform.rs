//! Conversion between named coordinate reference systems
//!
//! The core stores node positions in one planar system per network and leaves
//! actual projection math to whatever geodesy backend the embedding
//! application links in. Only the [`CoordTransform`] contract lives here.

use std::fmt;

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A named coordinate reference system, e.g. `"EPSG:4326"` or `"DHDN_GK4"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordSystem(String);

impl CoordSystem {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Geographic latitude/longitude, the system map widgets display in.
    pub fn wgs84() -> Self {
        Self("EPSG:4326".to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoordSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CoordSystem {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// Maps a point between two named reference systems.
///
/// Implementations must treat `from == to` as the identity (modulo axis
/// normalization) and return [`Error::UnsupportedTransform`] for pairs they
/// cannot convert between. The trait is object safe so validators and loaders
/// can take `&dyn CoordTransform`.
pub trait CoordTransform {
    fn transform(
        &self,
        point: Point<f64>,
        from: &CoordSystem,
        to: &CoordSystem,
    ) -> Result<Point<f64>, Error>;
}

/// Pass-through transform for networks already stored in the frame they are
/// measured in. Any cross-system request is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl CoordTransform for IdentityTransform {
    fn transform(
        &self,
        point: Point<f64>,
        from: &CoordSystem,
        to: &CoordSystem,
    ) -> Result<Point<f64>, Error> {
        if from == to {
            Ok(point)
        } else {
            Err(Error::UnsupportedTransform {
                from: from.to_string(),
                to: to.to_string(),
            })
        }
    }
}
