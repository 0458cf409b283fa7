//! The topology orchestrator.
//!
//! `Topology` owns its nodes and links and is the only way to mutate them.
//! Every mutation runs to completion on the stored collections before any
//! listener is notified.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ConfigError, TopologyConfig};

use super::events::{ConnectivityListener, EventNotifier, LinkEvent, MovementListener, TopologyListener};
use super::links::LinkStore;
use super::node::{is_valid_label, Node};
use super::types::{Incidence, Link, NodeId, Point, TopologyId};

/// Precondition violations on topology mutation
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TopologyError {
    #[error("Node {node} is already attached to {topology}")]
    AlreadyAttached { node: NodeId, topology: TopologyId },

    #[error("Node {0} is already part of this topology")]
    DuplicateNode(NodeId),

    #[error("Node {0} is not part of this topology")]
    UnknownNode(NodeId),

    #[error("Link from node {0} to itself")]
    SelfLoop(NodeId),

    #[error("Invalid communication range: {0}")]
    InvalidRange(f64),

    #[error("Invalid position: [{x}, {y}]")]
    InvalidPosition { x: f64, y: f64 },

    #[error("Label '{0}' cannot be written as a snapshot identifier")]
    InvalidLabel(String),

    #[error("Another node is already named '{0}'")]
    DuplicateName(String),
}

pub struct Topology {
    id: TopologyId,
    config: TopologyConfig,
    rng: StdRng,
    order: Vec<NodeId>,
    nodes: HashMap<NodeId, Node>,
    names: HashMap<String, NodeId>,
    links: LinkStore,
    events: EventNotifier,
}

impl Topology {
    /// Empty topology with the default configuration
    pub fn new() -> Self {
        Self::build(TopologyConfig::default())
    }

    /// Empty topology with a validated `config`
    pub fn with_config(config: TopologyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: TopologyConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            id: TopologyId::next(),
            config,
            rng,
            order: Vec::new(),
            nodes: HashMap::new(),
            names: HashMap::new(),
            links: LinkStore::new(),
            events: EventNotifier::new(),
        }
    }

    pub fn id(&self) -> TopologyId {
        self.id
    }

    pub fn config(&self) -> &TopologyConfig {
        &self.config
    }

    // ---------- Nodes ----------

    /// Add `node` at its current location.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, TopologyError> {
        let location = node.location();
        self.add_node_at(Some(location.x), Some(location.y), node)
    }

    /// Build a node with the configured default range and add it.
    pub fn create_node(&mut self, x: Option<f64>, y: Option<f64>) -> Result<NodeId, TopologyError> {
        let node = Node::new().with_range(self.config.default_communication_range);
        self.add_node_at(x, y, node)
    }

    /// Add `node` at `(x, y)`.
    ///
    /// A `None` coordinate is replaced by a uniformly random one inside the
    /// configured canvas. Wireless links to every existing node are in place
    /// before topology listeners hear about the new node.
    ///
    /// Node names (label, or numeric id when unlabelled) are unique within a
    /// topology, and positions must be finite.
    pub fn add_node_at(&mut self, x: Option<f64>, y: Option<f64>, mut node: Node) -> Result<NodeId, TopologyError> {
        if let Some(topology) = node.topology() {
            return Err(TopologyError::AlreadyAttached {
                node: node.id(),
                topology,
            });
        }
        let id = node.id();
        if self.nodes.contains_key(&id) {
            return Err(TopologyError::DuplicateNode(id));
        }
        validate_range(node.communication_range())?;
        if let Some(label) = node.label() {
            if !is_valid_label(label) {
                return Err(TopologyError::InvalidLabel(label.to_string()));
            }
        }
        let name = node.name();
        if self.names.contains_key(&name) {
            return Err(TopologyError::DuplicateName(name));
        }

        let x = x.unwrap_or_else(|| self.rng.gen::<f64>() * self.config.canvas_width);
        let y = y.unwrap_or_else(|| self.rng.gen::<f64>() * self.config.canvas_height);
        validate_position(x, y)?;
        node.set_location(Point::new(x, y));
        node.attach(self.id);

        debug!("Adding node {} at {}", name, node.location());
        self.names.insert(name, id);
        self.order.push(id);
        self.nodes.insert(id, node);

        self.update_wireless_links_for(id);
        if let Some(node) = self.nodes.get(&id) {
            self.events.notify_node_added(node);
        }
        Ok(id)
    }

    /// Remove a node and every link touching it, returning the detached node.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, TopologyError> {
        if !self.nodes.contains_key(&id) {
            return Err(TopologyError::UnknownNode(id));
        }

        for link in self.links.incident(id, true, Incidence::Any) {
            self.remove_link(link);
        }

        self.order.retain(|&n| n != id);
        let mut node = self.nodes.remove(&id).ok_or(TopologyError::UnknownNode(id))?;
        self.names.remove(&node.name());
        node.detach();

        debug!("Removed node {}", node.name());
        self.events.notify_node_removed(&node);
        Ok(node)
    }

    /// Remove every node, and with them every link.
    pub fn clear(&mut self) {
        let snapshot = self.order.clone();
        info!("Clearing topology with {} nodes", snapshot.len());
        for id in snapshot {
            if let Err(e) = self.remove_node(id) {
                warn!("Skipping node {} while clearing: {}", id, e);
            }
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Node whose label (or numeric id, when unlabelled) is `name`
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.names.get(name).and_then(|id| self.nodes.get(id))
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Node ids in insertion order
    pub fn node_ids(&self) -> &[NodeId] {
        &self.order
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // ---------- Movement ----------

    /// Move a node, recompute its wireless links, then notify movement listeners.
    pub fn move_node(&mut self, id: NodeId, x: f64, y: f64) -> Result<(), TopologyError> {
        validate_position(x, y)?;
        let node = self.nodes.get_mut(&id).ok_or(TopologyError::UnknownNode(id))?;
        node.set_location(Point::new(x, y));
        self.node_moved(id)
    }

    /// Shift a node by `(dx, dy)`.
    pub fn translate_node(&mut self, id: NodeId, dx: f64, dy: f64) -> Result<(), TopologyError> {
        let location = self.nodes.get(&id).ok_or(TopologyError::UnknownNode(id))?.location();
        self.move_node(id, location.x + dx, location.y + dy)
    }

    /// Re-evaluation entry point for a node whose position has changed.
    pub fn node_moved(&mut self, id: NodeId) -> Result<(), TopologyError> {
        if !self.nodes.contains_key(&id) {
            return Err(TopologyError::UnknownNode(id));
        }
        self.update_wireless_links_for(id);
        if let Some(node) = self.nodes.get(&id) {
            self.events.notify_node_moved(node);
        }
        Ok(())
    }

    /// Change a node's communication range and recompute its wireless links.
    pub fn set_communication_range(&mut self, id: NodeId, range: f64) -> Result<(), TopologyError> {
        validate_range(range)?;
        let node = self.nodes.get_mut(&id).ok_or(TopologyError::UnknownNode(id))?;
        node.set_communication_range(range);
        self.update_wireless_links_for(id);
        Ok(())
    }

    // ---------- Links ----------

    /// Add a link between two nodes of this topology, notifying listeners.
    ///
    /// Meant for wired links; wireless links follow node ranges on their own.
    pub fn add_link(&mut self, link: Link) -> Result<(), TopologyError> {
        self.add_link_with(link, false)
    }

    /// Add a link, notifying listeners unless `silent`.
    pub fn add_link_with(&mut self, link: Link, silent: bool) -> Result<(), TopologyError> {
        for end in [link.source(), link.destination()] {
            if !self.nodes.contains_key(&end) {
                return Err(TopologyError::UnknownNode(end));
            }
        }
        if link.source() == link.destination() {
            return Err(TopologyError::SelfLoop(link.source()));
        }
        self.insert_link(link, silent);
        Ok(())
    }

    pub(crate) fn insert_link(&mut self, link: Link, silent: bool) {
        let events = self.links.add_link(link, silent);
        self.dispatch(&events);
    }

    /// Remove a link. Listeners hear about `link` even if it was not stored.
    pub fn remove_link(&mut self, link: Link) {
        let events = self.links.remove_link(link);
        self.dispatch(&events);
    }

    fn dispatch(&self, events: &[LinkEvent]) {
        for event in events {
            let link = event.link();
            self.events.notify_link(
                event,
                self.nodes.get(&link.source()),
                self.nodes.get(&link.destination()),
            );
        }
    }

    /// Stored link of the requested directedness, if any.
    pub fn link(&self, from: NodeId, to: NodeId, directed: bool) -> Option<Link> {
        self.links.get_link(from, to, directed)
    }

    /// Undirected edge between `a` and `b`, if any.
    pub fn undirected_link(&self, a: NodeId, b: NodeId) -> Option<Link> {
        self.links.get_link(a, b, false)
    }

    /// Arc from `from` to `to`, wired or wireless.
    pub fn out_link_to(&self, from: NodeId, to: NodeId) -> Option<Link> {
        self.links.get_link(from, to, true)
    }

    /// All arcs (`directed`) or edges, in insertion order.
    pub fn links(&self, directed: bool) -> &[Link] {
        self.links.links(directed)
    }

    /// Links of one view touching `id`.
    pub fn node_links(&self, id: NodeId, directed: bool, incidence: Incidence) -> Vec<Link> {
        self.links.incident(id, directed, incidence)
    }

    /// Nodes sharing an undirected edge with `id`
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        self.links
            .incident(id, false, Incidence::Any)
            .iter()
            .filter_map(|l| l.other_end(id))
            .collect()
    }

    /// Destinations of arcs leaving `id`
    pub fn out_neighbors(&self, id: NodeId) -> Vec<NodeId> {
        self.links
            .incident(id, true, Incidence::Outgoing)
            .iter()
            .map(|l| l.destination())
            .collect()
    }

    /// Sources of arcs entering `id`
    pub fn in_neighbors(&self, id: NodeId) -> Vec<NodeId> {
        self.links
            .incident(id, true, Incidence::Incoming)
            .iter()
            .map(|l| l.source())
            .collect()
    }

    pub fn link_store(&self) -> &LinkStore {
        &self.links
    }

    // ---------- Listeners ----------

    pub fn add_connectivity_listener(&mut self, listener: Rc<dyn ConnectivityListener>, directed: bool) -> bool {
        self.events.connectivity_mut(directed).add(listener)
    }

    pub fn remove_connectivity_listener(&mut self, listener: &Rc<dyn ConnectivityListener>, directed: bool) -> bool {
        self.events.connectivity_mut(directed).remove(listener)
    }

    /// Register a connectivity listener scoped to one attached node.
    pub fn add_node_connectivity_listener(
        &mut self,
        id: NodeId,
        listener: Rc<dyn ConnectivityListener>,
        directed: bool,
    ) -> Result<bool, TopologyError> {
        let node = self.nodes.get_mut(&id).ok_or(TopologyError::UnknownNode(id))?;
        Ok(node.add_connectivity_listener(listener, directed))
    }

    pub fn remove_node_connectivity_listener(
        &mut self,
        id: NodeId,
        listener: &Rc<dyn ConnectivityListener>,
        directed: bool,
    ) -> Result<bool, TopologyError> {
        let node = self.nodes.get_mut(&id).ok_or(TopologyError::UnknownNode(id))?;
        Ok(node.remove_connectivity_listener(listener, directed))
    }

    pub fn add_topology_listener(&mut self, listener: Rc<dyn TopologyListener>) -> bool {
        self.events.topology_listeners_mut().add(listener)
    }

    pub fn remove_topology_listener(&mut self, listener: &Rc<dyn TopologyListener>) -> bool {
        self.events.topology_listeners_mut().remove(listener)
    }

    pub fn add_movement_listener(&mut self, listener: Rc<dyn MovementListener>) -> bool {
        self.events.movement_listeners_mut().add(listener)
    }

    pub fn remove_movement_listener(&mut self, listener: &Rc<dyn MovementListener>) -> bool {
        self.events.movement_listeners_mut().remove(listener)
    }

    pub fn notifier(&self) -> &EventNotifier {
        &self.events
    }
}

fn validate_range(range: f64) -> Result<(), TopologyError> {
    if range.is_finite() && range >= 0.0 {
        Ok(())
    } else {
        Err(TopologyError::InvalidRange(range))
    }
}

fn validate_position(x: f64, y: f64) -> Result<(), TopologyError> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(TopologyError::InvalidPosition { x, y })
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Topology")
            .field("id", &self.id)
            .field("nodes", &self.order.len())
            .field("arcs", &self.links.arc_count())
            .field("edges", &self.links.edge_count())
            .finish()
    }
}
