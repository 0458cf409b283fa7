//! Topology type definitions.
//!
//! This file contains the value types shared by the topology core: node and
//! topology handles, planar positions, and the immutable `Link` value with
//! its directedness and wired/wireless mode.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);
static NEXT_TOPOLOGY_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique node identity.
///
/// Two nodes are the same node iff their ids are equal; positions and other
/// attributes play no part in identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate a fresh id that has never been handed out before.
    pub(crate) fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value of this id
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-owning handle a node keeps to the topology it is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TopologyId(u64);

impl TopologyId {
    pub(crate) fn next() -> Self {
        TopologyId(NEXT_TOPOLOGY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TopologyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "topology#{}", self.0)
    }
}

/// A position in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Renders as `[x, y]`, the coordinate form used by topology snapshots.
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Directedness of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LinkType {
    /// One-way arc from source to destination
    Directed,
    /// Two-way edge, present iff both complementary arcs are present
    Undirected,
}

/// How a link came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum LinkMode {
    /// Added explicitly; never touched by proximity maintenance
    #[default]
    Wired,
    /// Created and removed automatically from distance and communication range
    Wireless,
}

/// Which incident links of a node to select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Incidence {
    /// Links with the node at either end
    Any,
    /// Links whose source is the node
    Outgoing,
    /// Links whose destination is the node
    Incoming,
}

/// An immutable link between two nodes.
///
/// Equality and hashing use `(source, destination, type)` only; the mode is
/// carried along but is not part of identity. Undirected links compare equal
/// regardless of endpoint order.
#[derive(Debug, Clone, Copy)]
pub struct Link {
    source: NodeId,
    destination: NodeId,
    link_type: LinkType,
    mode: LinkMode,
}

impl Link {
    pub fn new(source: NodeId, destination: NodeId, link_type: LinkType, mode: LinkMode) -> Self {
        Self {
            source,
            destination,
            link_type,
            mode,
        }
    }

    /// Wired directed arc `source -> destination`
    pub fn directed(source: NodeId, destination: NodeId) -> Self {
        Self::new(source, destination, LinkType::Directed, LinkMode::Wired)
    }

    /// Wired undirected edge between `a` and `b`
    pub fn undirected(a: NodeId, b: NodeId) -> Self {
        Self::new(a, b, LinkType::Undirected, LinkMode::Wired)
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn destination(&self) -> NodeId {
        self.destination
    }

    pub fn link_type(&self) -> LinkType {
        self.link_type
    }

    pub fn mode(&self) -> LinkMode {
        self.mode
    }

    pub fn is_directed(&self) -> bool {
        self.link_type == LinkType::Directed
    }

    pub fn is_wireless(&self) -> bool {
        self.mode == LinkMode::Wireless
    }

    /// Same endpoints and mode, opposite direction. Only meaningful for arcs.
    pub fn reversed(&self) -> Self {
        Self::new(self.destination, self.source, self.link_type, self.mode)
    }

    /// Copy of this link with a different directedness
    pub fn with_type(&self, link_type: LinkType) -> Self {
        Self::new(self.source, self.destination, link_type, self.mode)
    }

    /// True if `node` is one of the endpoints
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.destination == node
    }

    /// The endpoint opposite `node`, if `node` is an endpoint
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if self.source == node {
            Some(self.destination)
        } else if self.destination == node {
            Some(self.source)
        } else {
            None
        }
    }

    fn key(&self) -> (NodeId, NodeId) {
        match self.link_type {
            LinkType::Directed => (self.source, self.destination),
            LinkType::Undirected => {
                if self.source <= self.destination {
                    (self.source, self.destination)
                } else {
                    (self.destination, self.source)
                }
            }
        }
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.link_type == other.link_type && self.key() == other.key()
    }
}

impl Eq for Link {}

impl Hash for Link {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.link_type.hash(state);
        self.key().hash(state);
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.link_type {
            LinkType::Directed => write!(f, "{} --> {}", self.source, self.destination),
            LinkType::Undirected => write!(f, "{} <--> {}", self.source, self.destination),
        }
    }
}
