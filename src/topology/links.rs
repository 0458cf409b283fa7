//! Arc and edge storage.
//!
//! Arcs (directed links) and edges (undirected links) are stored separately.
//! An edge between `a` and `b` is present iff both arcs `a -> b` and
//! `b -> a` are present; every insertion and removal keeps the two views in
//! step, so lookups in either view are a single hash lookup.
//!
//! Mutations return the connectivity events they produced, in order, and
//! leave dispatch to the caller.

use std::collections::HashSet;

use log::{debug, warn};

use super::events::LinkEvent;
use super::types::{Incidence, Link, LinkMode, LinkType, NodeId};

#[derive(Debug, Default)]
pub struct LinkStore {
    arcs: Vec<Link>,
    edges: Vec<Link>,
    arc_index: HashSet<Link>,
    edge_index: HashSet<Link>,
}

impl LinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `link`, synthesising the complementary view.
    ///
    /// A directed link whose reverse arc is already stored also creates the
    /// undirected edge (with the new arc's mode). An undirected link inserts
    /// whichever of its two arcs are missing. Re-adding a stored link is a
    /// no-op. When `silent` is set the store is updated but no events are
    /// returned.
    pub fn add_link(&mut self, link: Link, silent: bool) -> Vec<LinkEvent> {
        let mut events = Vec::new();

        match link.link_type() {
            LinkType::Directed => {
                if self.arc_index.contains(&link) {
                    warn!("Ignoring duplicate arc {}", link);
                    return events;
                }
                Self::insert(&mut self.arcs, &mut self.arc_index, link);

                if self.arc_index.contains(&link.reversed()) {
                    let edge = link.with_type(LinkType::Undirected);
                    if Self::insert(&mut self.edges, &mut self.edge_index, edge) {
                        events.push(LinkEvent::Added(edge));
                    }
                }
            }
            LinkType::Undirected => {
                if self.edge_index.contains(&link) {
                    warn!("Ignoring duplicate edge {}", link);
                    return events;
                }
                let forward = Link::new(link.source(), link.destination(), LinkType::Directed, link.mode());
                for arc in [forward, forward.reversed()] {
                    if Self::insert(&mut self.arcs, &mut self.arc_index, arc) {
                        events.push(LinkEvent::Added(arc));
                    }
                }
                Self::insert(&mut self.edges, &mut self.edge_index, link);
            }
        }

        debug!("Added {:?} link {}", link.mode(), link);
        events.push(LinkEvent::Added(link));

        if silent {
            events.clear();
        }
        events
    }

    /// Remove `link` and whatever it implies in the other view.
    ///
    /// Removing an arc also removes the edge it was part of. Removing an edge
    /// removes both of its arcs. The event for `link` itself is always
    /// returned last, even if nothing matching was stored.
    pub fn remove_link(&mut self, link: Link) -> Vec<LinkEvent> {
        let mut events = Vec::new();

        match link.link_type() {
            LinkType::Directed => {
                Self::take(&mut self.arcs, &mut self.arc_index, &link);
                let edge = link.with_type(LinkType::Undirected);
                if let Some(stored) = Self::take(&mut self.edges, &mut self.edge_index, &edge) {
                    events.push(LinkEvent::Removed(stored));
                }
            }
            LinkType::Undirected => {
                let forward = link.with_type(LinkType::Directed);
                for arc in [forward, forward.reversed()] {
                    if let Some(stored) = Self::take(&mut self.arcs, &mut self.arc_index, &arc) {
                        events.push(LinkEvent::Removed(stored));
                    }
                }
                Self::take(&mut self.edges, &mut self.edge_index, &link);
            }
        }

        debug!("Removed link {}", link);
        events.push(LinkEvent::Removed(link));
        events
    }

    /// Stored link from `from` to `to` in the requested view.
    ///
    /// For the undirected view the endpoint order does not matter.
    pub fn get_link(&self, from: NodeId, to: NodeId, directed: bool) -> Option<Link> {
        let link_type = if directed {
            LinkType::Directed
        } else {
            LinkType::Undirected
        };
        let key = Link::new(from, to, link_type, LinkMode::Wired);
        self.index(directed).get(&key).copied()
    }

    pub fn contains(&self, link: &Link) -> bool {
        self.index(link.is_directed()).contains(link)
    }

    /// All arcs (`directed`) or edges, in insertion order
    pub fn links(&self, directed: bool) -> &[Link] {
        if directed {
            &self.arcs
        } else {
            &self.edges
        }
    }

    /// Links of one view touching `node`, in insertion order.
    pub fn incident(&self, node: NodeId, directed: bool, incidence: Incidence) -> Vec<Link> {
        self.links(directed)
            .iter()
            .filter(|l| match incidence {
                Incidence::Any => l.touches(node),
                Incidence::Outgoing => l.source() == node,
                Incidence::Incoming => l.destination() == node,
            })
            .copied()
            .collect()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True when every edge has both arcs and every arc pair has its edge.
    pub fn is_consistent(&self) -> bool {
        let edges_backed = self.edges.iter().all(|edge| {
            let forward = edge.with_type(LinkType::Directed);
            self.arc_index.contains(&forward) && self.arc_index.contains(&forward.reversed())
        });
        let pairs_joined = self.arcs.iter().all(|arc| {
            !self.arc_index.contains(&arc.reversed())
                || self.edge_index.contains(&arc.with_type(LinkType::Undirected))
        });
        edges_backed
            && pairs_joined
            && self.arcs.len() == self.arc_index.len()
            && self.edges.len() == self.edge_index.len()
    }

    fn index(&self, directed: bool) -> &HashSet<Link> {
        if directed {
            &self.arc_index
        } else {
            &self.edge_index
        }
    }

    fn insert(list: &mut Vec<Link>, index: &mut HashSet<Link>, link: Link) -> bool {
        if !index.insert(link) {
            return false;
        }
        list.push(link);
        true
    }

    fn take(list: &mut Vec<Link>, index: &mut HashSet<Link>, link: &Link) -> Option<Link> {
        let stored = index.take(link)?;
        if let Some(position) = list.iter().position(|l| l == link) {
            list.remove(position);
        }
        Some(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (NodeId, NodeId) {
        (NodeId::next(), NodeId::next())
    }

    #[test]
    fn test_single_arc_has_no_edge() {
        let (a, b) = ids();
        let mut store = LinkStore::new();
        let events = store.add_link(Link::directed(a, b), false);

        assert_eq!(events, vec![LinkEvent::Added(Link::directed(a, b))]);
        assert!(store.get_link(a, b, true).is_some());
        assert!(store.get_link(b, a, true).is_none());
        assert!(store.get_link(a, b, false).is_none());
        assert!(store.is_consistent());
    }

    #[test]
    fn test_reverse_arc_synthesises_edge() {
        let (a, b) = ids();
        let mut store = LinkStore::new();
        store.add_link(Link::directed(a, b), false);
        let events = store.add_link(Link::directed(b, a), false);

        assert_eq!(
            events,
            vec![
                LinkEvent::Added(Link::undirected(b, a)),
                LinkEvent::Added(Link::directed(b, a)),
            ]
        );
        assert_eq!(store.edge_count(), 1);
        assert!(store.get_link(a, b, false).is_some());
        assert!(store.is_consistent());
    }

    #[test]
    fn test_synthesised_edge_inherits_mode_of_new_arc() {
        let (a, b) = ids();
        let mut store = LinkStore::new();
        store.add_link(Link::directed(a, b), false);
        store.add_link(Link::new(b, a, LinkType::Directed, LinkMode::Wireless), false);

        let edge = store.get_link(a, b, false).unwrap();
        assert!(edge.is_wireless());
    }

    #[test]
    fn test_undirected_add_creates_missing_arcs() {
        let (a, b) = ids();
        let mut store = LinkStore::new();
        store.add_link(Link::directed(a, b), false);
        let events = store.add_link(Link::undirected(a, b), false);

        assert_eq!(
            events,
            vec![
                LinkEvent::Added(Link::directed(b, a)),
                LinkEvent::Added(Link::undirected(a, b)),
            ]
        );
        assert_eq!(store.arc_count(), 2);
        assert_eq!(store.edge_count(), 1);
        assert!(store.is_consistent());
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let (a, b) = ids();
        let mut store = LinkStore::new();
        store.add_link(Link::undirected(a, b), false);

        assert!(store.add_link(Link::directed(a, b), false).is_empty());
        assert!(store.add_link(Link::undirected(b, a), false).is_empty());
        assert_eq!(store.arc_count(), 2);
        assert_eq!(store.edge_count(), 1);
    }

    #[test]
    fn test_silent_add_mutates_without_events() {
        let (a, b) = ids();
        let mut store = LinkStore::new();
        assert!(store.add_link(Link::undirected(a, b), true).is_empty());
        assert_eq!(store.arc_count(), 2);
        assert_eq!(store.edge_count(), 1);
    }

    #[test]
    fn test_removing_arc_removes_edge() {
        let (a, b) = ids();
        let mut store = LinkStore::new();
        store.add_link(Link::undirected(a, b), false);
        let events = store.remove_link(Link::directed(b, a));

        assert_eq!(
            events,
            vec![
                LinkEvent::Removed(Link::undirected(a, b)),
                LinkEvent::Removed(Link::directed(b, a)),
            ]
        );
        assert!(store.get_link(a, b, false).is_none());
        assert!(store.get_link(a, b, true).is_some());
        assert!(store.is_consistent());
    }

    #[test]
    fn test_removing_edge_removes_both_arcs() {
        let (a, b) = ids();
        let mut store = LinkStore::new();
        store.add_link(Link::undirected(a, b), false);
        let events = store.remove_link(Link::undirected(b, a));

        assert_eq!(events.len(), 3);
        assert_eq!(events[2], LinkEvent::Removed(Link::undirected(b, a)));
        assert_eq!(store.arc_count(), 0);
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_removing_absent_link_still_reports_it() {
        let (a, b) = ids();
        let mut store = LinkStore::new();
        let events = store.remove_link(Link::directed(a, b));
        assert_eq!(events, vec![LinkEvent::Removed(Link::directed(a, b))]);
    }

    #[test]
    fn test_incident_filters() {
        let (a, b) = ids();
        let c = NodeId::next();
        let mut store = LinkStore::new();
        store.add_link(Link::directed(a, b), false);
        store.add_link(Link::directed(c, a), false);
        store.add_link(Link::directed(b, c), false);

        assert_eq!(store.incident(a, true, Incidence::Any).len(), 2);
        assert_eq!(store.incident(a, true, Incidence::Outgoing), vec![Link::directed(a, b)]);
        assert_eq!(store.incident(a, true, Incidence::Incoming), vec![Link::directed(c, a)]);
    }
}
