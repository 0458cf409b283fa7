//! Proximity-driven wireless link maintenance.
//!
//! Reachability is evaluated per direction: `a -> b` exists when `b` lies
//! strictly inside `a`'s communication range, independently of `b`'s range.
//! Wired arcs are never created or removed here. A pair sitting exactly at
//! the range boundary keeps whatever it currently has.

use log::debug;

use super::node::Node;
use super::orchestrator::Topology;
use super::types::{Link, LinkMode, LinkType, NodeId};

/// What proximity maintenance wants done for one ordered pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WirelessAction {
    Create(Link),
    Remove(Link),
}

/// Decide the wireless arc `from -> to` given the arc currently stored.
pub fn evaluate(from: &Node, to: &Node, existing: Option<Link>) -> Option<WirelessAction> {
    let distance = from.distance(to);
    let range = from.communication_range();
    match existing {
        None if distance < range => Some(WirelessAction::Create(Link::new(
            from.id(),
            to.id(),
            LinkType::Directed,
            LinkMode::Wireless,
        ))),
        Some(link) if link.is_wireless() && distance > range => Some(WirelessAction::Remove(link)),
        _ => None,
    }
}

impl Topology {
    /// Re-evaluate wireless arcs between `node` and every other node, in
    /// both directions.
    pub(crate) fn update_wireless_links_for(&mut self, node: NodeId) {
        let others: Vec<NodeId> = self.node_ids().iter().copied().filter(|&id| id != node).collect();
        for other in others {
            self.update_wireless_link(node, other);
            self.update_wireless_link(other, node);
        }
    }

    fn update_wireless_link(&mut self, from: NodeId, to: NodeId) {
        let action = match (self.node(from), self.node(to)) {
            (Some(a), Some(b)) => evaluate(a, b, self.out_link_to(from, to)),
            _ => None,
        };
        match action {
            Some(WirelessAction::Create(link)) => {
                debug!("Wireless link {} in range", link);
                self.insert_link(link, false);
            }
            Some(WirelessAction::Remove(link)) => {
                debug!("Wireless link {} out of range", link);
                self.remove_link(link);
            }
            None => {}
        }
    }
}
