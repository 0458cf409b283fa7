//! Read-only topology analysis.
//!
//! Provides a summary of the current topology for rendering and reporting:
//! - Arc/edge counts split by wired and wireless mode
//! - Per-node degree (inbound/outbound/undirected)
//! - Degree statistics
//! - GraphViz DOT output for visualization

use serde::Serialize;

use crate::topology::{Incidence, Node, NodeId, Point, Topology};

/// Degree information for a single node
#[derive(Debug, Clone, Serialize)]
pub struct NodeDegree {
    pub node_id: String,
    pub position: Point,
    pub communication_range: f64,
    pub outbound: usize,
    pub inbound: usize,
    /// Number of undirected edges
    pub neighbors: usize,
}

/// Statistical summary of degrees
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DegreeStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

/// Snapshot summary of a topology
#[derive(Debug, Clone, Serialize)]
pub struct TopologySummary {
    pub total_nodes: usize,
    pub total_arcs: usize,
    pub total_edges: usize,
    pub wired_arcs: usize,
    pub wireless_arcs: usize,
    pub wired_edges: usize,
    pub wireless_edges: usize,
    /// Arcs whose reverse arc is absent
    pub directed_only_arcs: usize,
    /// Nodes with no links of any kind
    pub isolated_nodes: Vec<String>,
    pub node_degrees: Vec<NodeDegree>,
    pub outbound_stats: DegreeStats,
    pub neighbor_stats: DegreeStats,
}

fn node_degree(topology: &Topology, node: &Node) -> NodeDegree {
    let id = node.id();
    NodeDegree {
        node_id: node.name(),
        position: node.location(),
        communication_range: node.communication_range(),
        outbound: topology.node_links(id, true, Incidence::Outgoing).len(),
        inbound: topology.node_links(id, true, Incidence::Incoming).len(),
        neighbors: topology.node_links(id, false, Incidence::Any).len(),
    }
}

/// Summarize the current state of `topology`
pub fn summarize(topology: &Topology) -> TopologySummary {
    let arcs = topology.links(true);
    let edges = topology.links(false);

    let node_degrees: Vec<NodeDegree> = topology.nodes().map(|n| node_degree(topology, n)).collect();

    let isolated_nodes = node_degrees
        .iter()
        .filter(|d| d.outbound == 0 && d.inbound == 0)
        .map(|d| d.node_id.clone())
        .collect();

    let outbound_stats = DegreeStats::of(node_degrees.iter().map(|d| d.outbound).collect());
    let neighbor_stats = DegreeStats::of(node_degrees.iter().map(|d| d.neighbors).collect());

    let wireless_arcs = arcs.iter().filter(|l| l.is_wireless()).count();
    let wireless_edges = edges.iter().filter(|l| l.is_wireless()).count();

    TopologySummary {
        total_nodes: topology.node_count(),
        total_arcs: arcs.len(),
        total_edges: edges.len(),
        wired_arcs: arcs.len() - wireless_arcs,
        wireless_arcs,
        wired_edges: edges.len() - wireless_edges,
        wireless_edges,
        directed_only_arcs: arcs.len() - 2 * edges.len(),
        isolated_nodes,
        node_degrees,
        outbound_stats,
        neighbor_stats,
    }
}

impl DegreeStats {
    /// Min, max, mean, median and population standard deviation of `degrees`
    fn of(mut degrees: Vec<usize>) -> Self {
        degrees.sort_unstable();
        let (Some(&min), Some(&max)) = (degrees.first(), degrees.last()) else {
            return Self::default();
        };

        let count = degrees.len() as f64;
        let mean = degrees.iter().sum::<usize>() as f64 / count;
        let mid = degrees.len() / 2;
        let median = if degrees.len() % 2 == 0 {
            (degrees[mid - 1] + degrees[mid]) as f64 / 2.0
        } else {
            degrees[mid] as f64
        };
        let variance = degrees.iter().map(|&d| (d as f64 - mean).powi(2)).sum::<f64>() / count;

        Self {
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        }
    }
}

/// Quoted DOT identifier for a node name
fn dot_id(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for ch in name.chars() {
        if matches!(ch, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Generate GraphViz DOT format for visualization.
///
/// Nodes are pinned at their positions (for `neato -n`). Undirected edges are
/// drawn without arrowheads, directed-only arcs with one; wireless links are
/// dashed.
pub fn generate_dot(topology: &Topology) -> String {
    let mut dot = String::new();
    dot.push_str("digraph Topology {\n");
    dot.push_str("    node [shape=circle];\n\n");

    for node in topology.nodes() {
        let color = if topology.node_links(node.id(), true, Incidence::Any).is_empty() {
            "red"
        } else {
            "lightblue"
        };
        dot.push_str(&format!(
            "    {} [pos=\"{},{}!\", fillcolor={}, style=filled];\n",
            dot_id(&node.name()),
            node.x(),
            node.y(),
            color
        ));
    }

    dot.push('\n');

    let name = |id: NodeId| dot_id(&topology.node(id).map(Node::name).unwrap_or_default());
    let style = |wireless: bool| if wireless { ", style=dashed" } else { "" };

    for edge in topology.links(false) {
        dot.push_str(&format!(
            "    {} -> {} [dir=none{}];\n",
            name(edge.source()),
            name(edge.destination()),
            style(edge.is_wireless())
        ));
    }

    for arc in topology.links(true) {
        if topology.undirected_link(arc.source(), arc.destination()).is_none() {
            dot.push_str(&format!(
                "    {} -> {} [dir=forward{}];\n",
                name(arc.source()),
                name(arc.destination()),
                style(arc.is_wireless())
            ));
        }
    }

    dot.push_str("}\n");
    dot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Link;

    fn sample() -> Topology {
        let mut topo = Topology::new();
        let a = topo.add_node(Node::new().with_label("a").with_range(10.0)).unwrap();
        topo.add_node(Node::new().with_label("b").with_location(5.0, 0.0).with_range(10.0)).unwrap();
        let c = topo.add_node(Node::new().with_label("c").with_location(100.0, 0.0)).unwrap();
        topo.add_node(Node::new().with_label("d").with_location(200.0, 0.0)).unwrap();
        topo.add_link(Link::directed(c, a)).unwrap();
        topo
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&sample());

        assert_eq!(summary.total_nodes, 4);
        assert_eq!(summary.total_arcs, 3);
        assert_eq!(summary.total_edges, 1);
        assert_eq!(summary.wireless_arcs, 2);
        assert_eq!(summary.wired_arcs, 1);
        assert_eq!(summary.wireless_edges, 1);
        assert_eq!(summary.directed_only_arcs, 1);
        assert_eq!(summary.isolated_nodes, vec!["d".to_string()]);

        let a = &summary.node_degrees[0];
        assert_eq!((a.outbound, a.inbound, a.neighbors), (1, 2, 1));
    }

    #[test]
    fn test_degree_stats() {
        let stats = DegreeStats::of(vec![4, 1, 3, 2]);
        assert_eq!(stats.min, 1);
        assert_eq!(stats.max, 4);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.median, 2.5);

        let odd = DegreeStats::of(vec![2, 2, 8]);
        assert_eq!(odd.median, 2.0);
        assert_eq!(odd.mean, 4.0);

        assert_eq!(DegreeStats::of(Vec::new()), DegreeStats::default());
    }

    #[test]
    fn test_dot_escapes_names() {
        assert_eq!(dot_id("plain"), "\"plain\"");
        assert_eq!(dot_id("say\"hi\""), "\"say\\\"hi\\\"\"");
        assert_eq!(dot_id("back\\slash"), "\"back\\\\slash\"");

        let mut topo = Topology::new();
        let a = topo.add_node(Node::new().with_label("\"a\"")).unwrap();
        let b = topo.add_node(Node::new().with_label("b")).unwrap();
        topo.add_link(Link::directed(a, b)).unwrap();

        let dot = generate_dot(&topo);
        assert!(dot.contains("    \"\\\"a\\\"\" [pos="));
        assert!(dot.contains("    \"\\\"a\\\"\" -> \"b\" [dir=forward];"));
    }

    #[test]
    fn test_generate_dot() {
        let dot = generate_dot(&sample());
        assert!(dot.starts_with("digraph Topology {"));
        assert!(dot.contains("\"a\" [pos=\"0,0!\", fillcolor=lightblue, style=filled];"));
        assert!(dot.contains("\"d\" [pos=\"200,0!\", fillcolor=red, style=filled];"));
        assert!(dot.contains("[dir=none, style=dashed];"));
        assert!(dot.contains("\"c\" -> \"a\" [dir=forward];"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_summary_serializes() {
        let json = serde_json::to_string(&summarize(&sample())).unwrap();
        assert!(json.contains("\"total_nodes\":4"));
    }
}
