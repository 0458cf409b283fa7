//! Topology nodes.
//!
//! A node is created standalone, then handed to a [`Topology`] which takes
//! ownership of it until it is removed again. While attached, the node keeps
//! a non-owning [`TopologyId`] handle to its owner.
//!
//! [`Topology`]: super::Topology

use std::rc::Rc;

use super::events::{ConnectivityListener, ListenerSet};
use super::types::{NodeId, Point, TopologyId};

/// Communication range of a node built with [`Node::new`]
pub const DEFAULT_COMMUNICATION_RANGE: f64 = 0.0;

/// Whether `label` can stand as a single identifier in a snapshot line.
///
/// Labels must be non-empty and free of whitespace, `[`, `]`, `,`, `<` and
/// `--`, the characters the snapshot grammar uses as separators.
pub fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && !label.contains("--")
        && !label.chars().any(|ch| ch.is_whitespace() || matches!(ch, '[' | ']' | ',' | '<'))
}

#[derive(Debug)]
pub struct Node {
    id: NodeId,
    label: Option<String>,
    location: Point,
    communication_range: f64,
    topology: Option<TopologyId>,
    undirected_listeners: ListenerSet<dyn ConnectivityListener>,
    directed_listeners: ListenerSet<dyn ConnectivityListener>,
}

impl Node {
    pub fn new() -> Self {
        Self {
            id: NodeId::next(),
            label: None,
            location: Point::default(),
            communication_range: DEFAULT_COMMUNICATION_RANGE,
            topology: None,
            undirected_listeners: ListenerSet::new(),
            directed_listeners: ListenerSet::new(),
        }
    }

    pub fn with_location(mut self, x: f64, y: f64) -> Self {
        self.location = Point::new(x, y);
        self
    }

    pub fn with_range(mut self, range: f64) -> Self {
        self.communication_range = range;
        self
    }

    /// Identifier written to snapshots instead of the numeric id.
    ///
    /// Checked with [`is_valid_label`] when the node joins a topology.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Label if set, numeric id otherwise
    pub fn name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.id.to_string(),
        }
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn x(&self) -> f64 {
        self.location.x
    }

    pub fn y(&self) -> f64 {
        self.location.y
    }

    pub fn communication_range(&self) -> f64 {
        self.communication_range
    }

    /// Topology this node is attached to, if any
    pub fn topology(&self) -> Option<TopologyId> {
        self.topology
    }

    pub fn is_attached(&self) -> bool {
        self.topology.is_some()
    }

    pub fn distance(&self, other: &Node) -> f64 {
        self.location.distance(&other.location)
    }

    /// Listen for links of the given directedness touching this node.
    pub fn add_connectivity_listener(&mut self, listener: Rc<dyn ConnectivityListener>, directed: bool) -> bool {
        self.connectivity_listeners_mut(directed).add(listener)
    }

    pub fn remove_connectivity_listener(&mut self, listener: &Rc<dyn ConnectivityListener>, directed: bool) -> bool {
        self.connectivity_listeners_mut(directed).remove(listener)
    }

    pub fn connectivity_listeners(&self, directed: bool) -> &ListenerSet<dyn ConnectivityListener> {
        if directed {
            &self.directed_listeners
        } else {
            &self.undirected_listeners
        }
    }

    fn connectivity_listeners_mut(&mut self, directed: bool) -> &mut ListenerSet<dyn ConnectivityListener> {
        if directed {
            &mut self.directed_listeners
        } else {
            &mut self.undirected_listeners
        }
    }

    pub(crate) fn set_location(&mut self, location: Point) {
        self.location = location;
    }

    pub(crate) fn set_communication_range(&mut self, range: f64) {
        self.communication_range = range;
    }

    pub(crate) fn attach(&mut self, topology: TopologyId) {
        self.topology = Some(topology);
    }

    pub(crate) fn detach(&mut self) {
        self.topology = None;
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
