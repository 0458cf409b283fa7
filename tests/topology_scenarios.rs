#[cfg(test)]
mod topology_scenarios {
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    use proptest::prelude::*;
    use tempfile::NamedTempFile;

    use toponet::config_loader::load_config;
    use toponet::snapshot::{export, import};
    use toponet::topology::{ConnectivityListener, Link, LinkMode, Node, NodeId, Topology, TopologyError};

    /// Counts every connectivity callback it receives
    #[derive(Default)]
    struct Counter {
        added: RefCell<usize>,
        removed: RefCell<usize>,
    }

    impl ConnectivityListener for Counter {
        fn link_added(&self, _link: &Link) {
            *self.added.borrow_mut() += 1;
        }

        fn link_removed(&self, _link: &Link) {
            *self.removed.borrow_mut() += 1;
        }
    }

    fn ranged(x: f64, y: f64, range: f64) -> Node {
        Node::new().with_location(x, y).with_range(range)
    }

    /// Three nodes in a row; only the first two start within range
    #[test]
    fn test_three_node_scenario() {
        let mut topo = Topology::new();
        let a = topo.add_node(ranged(0.0, 0.0, 10.0)).unwrap();
        let b = topo.add_node(ranged(5.0, 0.0, 10.0)).unwrap();
        let c = topo.add_node(ranged(20.0, 0.0, 10.0)).unwrap();

        assert!(topo.undirected_link(a, b).is_some());
        assert!(topo.undirected_link(a, c).is_none());
        assert!(topo.undirected_link(b, c).is_none());
        assert_eq!(topo.links(false).len(), 1);
        assert_eq!(topo.links(true).len(), 2);

        topo.move_node(c, 7.0, 0.0).unwrap();

        for (x, y) in [(a, b), (a, c), (b, c)] {
            let edge = topo.undirected_link(x, y).unwrap();
            assert_eq!(edge.mode(), LinkMode::Wireless);
        }
        assert_eq!(topo.links(false).len(), 3);
        assert_eq!(topo.links(true).len(), 6);
        assert!(topo.link_store().is_consistent());
    }

    /// Strict inequality on both sides of the range boundary
    #[test]
    fn test_wireless_boundary() {
        let epsilon = 1e-6;
        let mut topo = Topology::new();
        let a = topo.add_node(ranged(0.0, 0.0, 10.0)).unwrap();
        let b = topo.add_node(ranged(10.0, 0.0, 0.0)).unwrap();
        assert!(topo.out_link_to(a, b).is_none());

        topo.move_node(b, 10.0 - epsilon, 0.0).unwrap();
        assert!(topo.out_link_to(a, b).unwrap().is_wireless());

        // At exactly the range the existing link survives
        topo.move_node(b, 10.0, 0.0).unwrap();
        assert!(topo.out_link_to(a, b).is_some());

        topo.move_node(b, 10.0 + epsilon, 0.0).unwrap();
        assert!(topo.out_link_to(a, b).is_none());
    }

    #[test]
    fn test_wired_link_survives_distance() {
        let mut topo = Topology::new();
        let a = topo.add_node(ranged(0.0, 0.0, 10.0)).unwrap();
        let b = topo.add_node(ranged(5.0, 0.0, 10.0)).unwrap();
        let c = topo.add_node(ranged(500.0, 0.0, 10.0)).unwrap();
        topo.add_link(Link::undirected(a, c)).unwrap();

        topo.move_node(c, 1000.0, 1000.0).unwrap();
        assert_eq!(topo.undirected_link(a, c).unwrap().mode(), LinkMode::Wired);

        topo.move_node(b, 300.0, 300.0).unwrap();
        assert!(topo.undirected_link(a, b).is_none());
    }

    #[test]
    fn test_listener_registered_twice_hears_once() {
        let mut topo = Topology::new();
        let a = topo.add_node(Node::new()).unwrap();
        let b = topo.add_node(Node::new().with_location(50.0, 0.0)).unwrap();

        let counter = Rc::new(Counter::default());
        let handle: Rc<dyn ConnectivityListener> = counter.clone();
        topo.add_connectivity_listener(Rc::clone(&handle), true);
        topo.add_node_connectivity_listener(a, Rc::clone(&handle), true).unwrap();

        topo.add_link(Link::directed(a, b)).unwrap();
        assert_eq!(*counter.added.borrow(), 1);

        topo.remove_link(Link::directed(a, b));
        assert_eq!(*counter.removed.borrow(), 1);
    }

    #[test]
    fn test_add_remove_pair_restores_state() {
        let mut topo = Topology::new();
        let a = topo.add_node(ranged(0.0, 0.0, 10.0)).unwrap();
        let b = topo.add_node(ranged(3.0, 0.0, 10.0)).unwrap();
        topo.add_link(Link::directed(a, b)).unwrap();

        let nodes_before = topo.node_ids().to_vec();
        let arcs_before = topo.links(true).to_vec();
        let edges_before = topo.links(false).to_vec();

        let lonely = topo.add_node(ranged(400.0, 300.0, 5.0)).unwrap();
        let detached = topo.remove_node(lonely).unwrap();

        assert!(!detached.is_attached());
        assert_eq!(topo.node_ids(), nodes_before.as_slice());
        assert_eq!(topo.links(true), arcs_before.as_slice());
        assert_eq!(topo.links(false), edges_before.as_slice());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut topo = Topology::new();
        let a = topo.add_node(Node::new().with_label("A")).unwrap();
        let b = topo.add_node(Node::new().with_label("B").with_location(3.0, 4.0)).unwrap();
        topo.add_link(Link::undirected(a, b)).unwrap();

        let text = export(&topo);
        assert_eq!(text, "A [0, 0]\nB [3, 4]\nA <--> B\n");

        let mut copy = Topology::new();
        let table = import(&mut copy, &text).unwrap();

        assert_eq!(copy.node_count(), 2);
        let (ca, cb) = (table["A"], table["B"]);
        assert_eq!(copy.node(ca).unwrap().location(), topo.node(a).unwrap().location());
        assert_eq!(copy.node(cb).unwrap().location(), topo.node(b).unwrap().location());

        assert_eq!(copy.links(false).len(), 1);
        let edge = copy.undirected_link(ca, cb).unwrap();
        assert_eq!(edge.mode(), LinkMode::Wired);
        assert!(copy.links(true).iter().all(|l| !l.is_wireless()));

        assert_eq!(export(&copy), text);
    }

    #[test]
    fn test_round_trip_keeps_directed_wired_arcs() {
        let mut topo = Topology::new();
        let a = topo.add_node(Node::new().with_label("n1").with_location(-2.5, 7.125)).unwrap();
        let b = topo.add_node(Node::new().with_label("n2").with_location(1e-3, 0.0)).unwrap();
        topo.add_link(Link::directed(b, a)).unwrap();

        let copy = Topology::from_snapshot(&topo.to_string()).unwrap();
        assert_eq!(copy.to_string(), topo.to_string());
        assert_eq!(copy.links(true).len(), 1);
        assert!(copy.links(false).is_empty());
    }

    #[test]
    fn test_only_exportable_names_are_admitted() {
        let mut topo = Topology::new();
        assert_eq!(
            topo.add_node(Node::new().with_label("base station")),
            Err(TopologyError::InvalidLabel("base station".to_string()))
        );
        let unnamed = topo.add_node(Node::new()).unwrap();
        assert_eq!(
            topo.add_node(Node::new().with_label(unnamed.to_string()).with_location(1.0, 1.0)),
            Err(TopologyError::DuplicateName(unnamed.to_string()))
        );
        assert!(matches!(
            topo.add_node_at(Some(f64::NAN), Some(0.0), Node::new().with_label("a")),
            Err(TopologyError::InvalidPosition { .. })
        ));

        let station = topo.add_node(Node::new().with_label("base_station").with_location(3.0, 4.0)).unwrap();
        topo.add_link(Link::undirected(unnamed, station)).unwrap();

        let copy = Topology::from_snapshot(&topo.to_string()).unwrap();
        assert_eq!(copy.node_count(), 2);
        assert_eq!(copy.to_string(), topo.to_string());
    }

    #[test]
    fn test_import_with_loaded_config() {
        let mut config_file = NamedTempFile::new().unwrap();
        write!(config_file, "default_communication_range: 10\nseed: 3\n").unwrap();
        let config = load_config(config_file.path()).unwrap();

        let mut topo = Topology::with_config(config).unwrap();
        let table = import(&mut topo, "a [0, 0]\nb [5, 0]\nc [50, 0]\nb --> c\n").unwrap();

        assert!(topo.undirected_link(table["a"], table["b"]).unwrap().is_wireless());
        assert!(!topo.out_link_to(table["b"], table["c"]).unwrap().is_wireless());
        assert!(topo.out_link_to(table["c"], table["b"]).is_none());
    }

    #[test]
    fn test_clear_then_reuse() {
        let mut topo = Topology::new();
        for i in 0..5 {
            topo.add_node(ranged(i as f64 * 2.0, 0.0, 5.0)).unwrap();
        }
        assert!(!topo.links(false).is_empty());

        topo.clear();
        assert!(topo.is_empty());
        assert!(topo.links(true).is_empty());

        let id = topo.create_node(Some(1.0), Some(1.0)).unwrap();
        assert!(topo.contains_node(id));
    }

    #[derive(Debug, Clone)]
    enum Op {
        AddArc(usize, usize),
        AddEdge(usize, usize),
        RemoveArc(usize, usize),
        RemoveEdge(usize, usize),
        Move(usize, f64, f64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..6usize, 0..6usize).prop_map(|(a, b)| Op::AddArc(a, b)),
            (0..6usize, 0..6usize).prop_map(|(a, b)| Op::AddEdge(a, b)),
            (0..6usize, 0..6usize).prop_map(|(a, b)| Op::RemoveArc(a, b)),
            (0..6usize, 0..6usize).prop_map(|(a, b)| Op::RemoveEdge(a, b)),
            (0..6usize, 0.0..60.0f64, 0.0..60.0f64).prop_map(|(n, x, y)| Op::Move(n, x, y)),
        ]
    }

    proptest! {
        #[test]
        fn prop_arcs_and_edges_stay_consistent(ops in prop::collection::vec(op_strategy(), 0..60)) {
            let mut topo = Topology::new();
            let ids: Vec<NodeId> = (0..6)
                .map(|i| topo.add_node(ranged(i as f64 * 8.0, 0.0, 12.0)).unwrap())
                .collect();

            for op in ops {
                match op {
                    Op::AddArc(a, b) if a != b => topo.add_link(Link::directed(ids[a], ids[b])).unwrap(),
                    Op::AddEdge(a, b) if a != b => topo.add_link(Link::undirected(ids[a], ids[b])).unwrap(),
                    Op::RemoveArc(a, b) => topo.remove_link(Link::directed(ids[a], ids[b])),
                    Op::RemoveEdge(a, b) => topo.remove_link(Link::undirected(ids[a], ids[b])),
                    Op::Move(n, x, y) => topo.move_node(ids[n], x, y).unwrap(),
                    _ => {}
                }
                prop_assert!(topo.link_store().is_consistent());

                for edge in topo.links(false) {
                    prop_assert!(topo.out_link_to(edge.source(), edge.destination()).is_some());
                    prop_assert!(topo.out_link_to(edge.destination(), edge.source()).is_some());
                }
            }
        }
    }
}
