//! Network topology module.
//!
//! This module contains the topology core: nodes positioned in the plane,
//! the arc/edge link store, proximity-driven wireless link maintenance, and
//! listener fan-out for connectivity, topology and movement events.

pub mod types;
pub mod node;
pub mod events;
pub mod links;
pub mod wireless;
pub mod orchestrator;

// Re-export key types for easier access
pub use types::{Incidence, Link, LinkMode, LinkType, NodeId, Point, TopologyId};
pub use node::{is_valid_label, Node, DEFAULT_COMMUNICATION_RANGE};
pub use events::{ConnectivityListener, EventNotifier, LinkEvent, ListenerSet, MovementListener, TopologyListener};
pub use links::LinkStore;
pub use wireless::WirelessAction;
pub use orchestrator::{Topology, TopologyError};
