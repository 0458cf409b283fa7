//! # Toponet - Dynamic 2D network topology
//!
//! This library models a mutable set of nodes positioned in the plane,
//! connected by explicit (wired) links and by wireless links derived from
//! node proximity, with listener hooks so simulators, renderers and loggers
//! can react to structural changes.
//!
//! ## Overview
//!
//! Links exist in two views that are kept in step at all times:
//!
//! - **Arcs**: directed links, identified by `(source, destination)`
//! - **Edges**: undirected links, present iff both complementary arcs are
//!
//! Each node has a communication range. Whenever a node is added, moved or
//! re-ranged, wireless arcs to and from every other node are re-evaluated:
//! an arc `a -> b` appears when `b` is strictly inside `a`'s range and
//! disappears when `b` is strictly outside it. Wired links are never touched
//! by this maintenance.
//!
//! ## Architecture
//!
//! - `topology`: nodes, link store, wireless maintenance, listeners, orchestrator
//! - `snapshot`: plain-text export/import of nodes and wired links
//! - `analysis`: degree summaries and GraphViz DOT output
//! - `config`: placement and default-range settings
//! - `config_loader`: YAML configuration loading
//!
//! ## Example Usage
//!
//! ```rust
//! use toponet::topology::{Link, Node, Topology};
//!
//! let mut topo = Topology::new();
//! let a = topo.add_node(Node::new().with_range(10.0))?;
//! let b = topo.add_node(Node::new().with_location(5.0, 0.0).with_range(10.0))?;
//! let c = topo.add_node(Node::new().with_location(20.0, 0.0).with_range(10.0))?;
//!
//! // a and b are within range of each other
//! assert!(topo.undirected_link(a, b).is_some());
//! assert!(topo.undirected_link(b, c).is_none());
//!
//! // Wired links are added explicitly
//! topo.add_link(Link::undirected(a, c))?;
//!
//! // Wireless links are not part of the snapshot
//! let text = topo.to_string();
//! assert_eq!(text.lines().count(), 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Library operations return typed errors (`TopologyError`, `SnapshotError`,
//! `ConfigError`) built with `thiserror`. Lookups that miss return `None`.
//! The command-line tool reports errors through `color_eyre`.

pub mod topology;
pub mod snapshot;
pub mod analysis;
pub mod config;
pub mod config_loader;

pub use config::{ConfigError, TopologyConfig};
pub use snapshot::SnapshotError;
pub use topology::{Link, LinkMode, LinkType, Node, NodeId, Topology, TopologyError};
