//! Network elements - nodes, links and their identifiers

use std::collections::BTreeSet;
use std::fmt;

use geo::Point;
use serde::{Deserialize, Serialize};

/// Travel mode assigned to links when the caller supplies none.
pub const DEFAULT_MODE: &str = "car";

/// Tag distinguishing nodes from links in errors and validation entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Node,
    Link,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Node => write!(f, "node"),
            ElementKind::Link => write!(f, "link"),
        }
    }
}

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Stable identifier of a node, user supplied or generated.
    NodeId
);
string_id!(
    /// Stable identifier of a link.
    LinkId
);

/// A point location in the network graph.
///
/// The position is expressed in the planar coordinate system of the owning
/// [`Network`](crate::model::Network). Incident-link sets are not stored here;
/// the network maintains them as an index keyed by node id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(with = "point_xy")]
    pub position: Point<f64>,
}

/// Serialize a `geo::Point` as a plain `(x, y)` pair.
mod point_xy {
    use geo::Point;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(point: &Point<f64>, ser: S) -> Result<S::Ok, S::Error> {
        (point.x(), point.y()).serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Point<f64>, D::Error> {
        let (x, y) = <(f64, f64)>::deserialize(de)?;
        Ok(Point::new(x, y))
    }
}

impl Node {
    pub fn new(id: impl Into<NodeId>, position: Point<f64>) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }
}

/// Physical attributes of a link, separate from its identity and endpoints.
///
/// Grouped so editing operations can pass one value instead of four loose
/// floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkAttrs {
    /// Length in the unit of the network's coordinate system, usually meters.
    pub length: f64,
    /// Maximum traversal speed, meters per second.
    pub freespeed: f64,
    /// Throughput in vehicles per capacity period.
    pub capacity: f64,
    /// Number of lanes in the link's direction.
    pub permlanes: f64,
}

impl LinkAttrs {
    pub fn new(length: f64, freespeed: f64, capacity: f64, permlanes: f64) -> Self {
        Self {
            length,
            freespeed,
            capacity,
            permlanes,
        }
    }
}

/// A directed edge between two nodes, carrying traffic attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub from: NodeId,
    pub to: NodeId,
    pub length: f64,
    pub freespeed: f64,
    pub capacity: f64,
    pub permlanes: f64,
    /// Travel modes allowed on this link, e.g. "car", "bike".
    pub modes: BTreeSet<String>,
}

impl Link {
    pub fn new(id: impl Into<LinkId>, from: NodeId, to: NodeId, attrs: LinkAttrs) -> Self {
        Self {
            id: id.into(),
            from,
            to,
            length: attrs.length,
            freespeed: attrs.freespeed,
            capacity: attrs.capacity,
            permlanes: attrs.permlanes,
            modes: BTreeSet::from([DEFAULT_MODE.to_owned()]),
        }
    }

    pub fn attrs(&self) -> LinkAttrs {
        LinkAttrs {
            length: self.length,
            freespeed: self.freespeed,
            capacity: self.capacity,
            permlanes: self.permlanes,
        }
    }

    pub fn set_attrs(&mut self, attrs: LinkAttrs) {
        self.length = attrs.length;
        self.freespeed = attrs.freespeed;
        self.capacity = attrs.capacity;
        self.permlanes = attrs.permlanes;
    }
}
