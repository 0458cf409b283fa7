//! Listener registry and event fan-out.
//!
//! Four listener categories exist: undirected connectivity, directed
//! connectivity, topology (node arrival/departure) and movement. Connectivity
//! events are delivered to the union of the topology-wide listeners and the
//! listeners registered on either endpoint node; each distinct listener is
//! called once per event, in first-seen order.
//!
//! Listeners receive shared references only. A callback must not mutate the
//! topology that is notifying it.

use std::fmt;
use std::rc::Rc;

use super::node::Node;
use super::types::Link;

/// Observer of link additions and removals
pub trait ConnectivityListener {
    fn link_added(&self, link: &Link);
    fn link_removed(&self, link: &Link);
}

/// Observer of nodes entering and leaving a topology
pub trait TopologyListener {
    fn node_added(&self, node: &Node);
    fn node_removed(&self, node: &Node);
}

/// Observer of node position changes
pub trait MovementListener {
    fn node_moved(&self, node: &Node);
}

/// Connectivity notification produced by a link store mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    Added(Link),
    Removed(Link),
}

impl LinkEvent {
    pub fn link(&self) -> &Link {
        match self {
            LinkEvent::Added(link) | LinkEvent::Removed(link) => link,
        }
    }
}

/// Identity comparison for listener handles (data pointer only).
fn same_listener<L: ?Sized>(a: &Rc<L>, b: &Rc<L>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Insertion-ordered set of listener handles, compared by identity.
pub struct ListenerSet<L: ?Sized> {
    listeners: Vec<Rc<L>>,
}

impl<L: ?Sized> ListenerSet<L> {
    pub fn new() -> Self {
        Self { listeners: Vec::new() }
    }

    /// Register `listener`. Returns false if it was already registered.
    pub fn add(&mut self, listener: Rc<L>) -> bool {
        if self.contains(&listener) {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Unregister `listener`. Returns false if it was not registered.
    pub fn remove(&mut self, listener: &Rc<L>) -> bool {
        match self.listeners.iter().position(|l| same_listener(l, listener)) {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, listener: &Rc<L>) -> bool {
        self.listeners.iter().any(|l| same_listener(l, listener))
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<L>> {
        self.listeners.iter()
    }

    /// Copy of the current handles, safe to iterate while the set changes.
    pub fn snapshot(&self) -> Vec<Rc<L>> {
        self.listeners.clone()
    }
}

impl<L: ?Sized> Default for ListenerSet<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> fmt::Debug for ListenerSet<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.listeners.len())
            .finish()
    }
}

/// Merge several listener sets into one list, keeping first-seen order.
fn union<'a, L: ?Sized + 'a>(sets: impl IntoIterator<Item = &'a ListenerSet<L>>) -> Vec<Rc<L>> {
    let mut merged: Vec<Rc<L>> = Vec::new();
    for set in sets {
        for listener in set.iter() {
            if !merged.iter().any(|seen| same_listener(seen, listener)) {
                merged.push(Rc::clone(listener));
            }
        }
    }
    merged
}

/// Topology-wide listener registry.
#[derive(Debug, Default)]
pub struct EventNotifier {
    undirected: ListenerSet<dyn ConnectivityListener>,
    directed: ListenerSet<dyn ConnectivityListener>,
    topology: ListenerSet<dyn TopologyListener>,
    movement: ListenerSet<dyn MovementListener>,
}

impl EventNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connectivity(&self, directed: bool) -> &ListenerSet<dyn ConnectivityListener> {
        if directed {
            &self.directed
        } else {
            &self.undirected
        }
    }

    pub fn connectivity_mut(&mut self, directed: bool) -> &mut ListenerSet<dyn ConnectivityListener> {
        if directed {
            &mut self.directed
        } else {
            &mut self.undirected
        }
    }

    pub fn topology_listeners(&self) -> &ListenerSet<dyn TopologyListener> {
        &self.topology
    }

    pub fn topology_listeners_mut(&mut self) -> &mut ListenerSet<dyn TopologyListener> {
        &mut self.topology
    }

    pub fn movement_listeners(&self) -> &ListenerSet<dyn MovementListener> {
        &self.movement
    }

    pub fn movement_listeners_mut(&mut self) -> &mut ListenerSet<dyn MovementListener> {
        &mut self.movement
    }

    /// Listeners interested in `link`: topology-wide first, then those on the
    /// source node, then those on the destination node, without duplicates.
    ///
    /// Computed on every call; nothing is cached between events.
    pub fn connectivity_fan_out(
        &self,
        link: &Link,
        source: Option<&Node>,
        destination: Option<&Node>,
    ) -> Vec<Rc<dyn ConnectivityListener>> {
        let directed = link.is_directed();
        let sets = std::iter::once(self.connectivity(directed))
            .chain(source.map(|n| n.connectivity_listeners(directed)))
            .chain(destination.map(|n| n.connectivity_listeners(directed)));
        union(sets)
    }

    pub fn notify_link(&self, event: &LinkEvent, source: Option<&Node>, destination: Option<&Node>) {
        let listeners = self.connectivity_fan_out(event.link(), source, destination);
        for listener in listeners {
            match event {
                LinkEvent::Added(link) => listener.link_added(link),
                LinkEvent::Removed(link) => listener.link_removed(link),
            }
        }
    }

    pub fn notify_node_added(&self, node: &Node) {
        for listener in self.topology.snapshot() {
            listener.node_added(node);
        }
    }

    pub fn notify_node_removed(&self, node: &Node) {
        for listener in self.topology.snapshot() {
            listener.node_removed(node);
        }
    }

    pub fn notify_node_moved(&self, node: &Node) {
        for listener in self.movement.snapshot() {
            listener.node_moved(node);
        }
    }
}
