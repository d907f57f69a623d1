//! Peer cancellation: batched removal of two selected subtrees wherever they pair up.
//!
//! Given two selections, every sum or product in the tree is scanned child by child. A child
//! equivalent to one selection is paired with a previously seen, still unpaired child equivalent
//! to the other selection; both are then deactivated by replacing them with the identity element
//! of the surrounding node. The scan can consider only the immediately preceding slot
//! (adjacent-only mode) or every preceding slot.
//!
//! The result is a batch of identity-to-replacement edits; nothing is mutated in place.
//! [`apply_edits`] materializes a new tree with the edits applied.

use crate::node::{Kind, Node, NodeId};
use super::{step::Step, step_collector::StepCollector};

/// One batched edit: the node with this identity is replaced by the given subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerEdit {
    /// The identity of the node to replace.
    pub target: NodeId,

    /// The replacement subtree.
    pub replacement: Node,
}

/// Collects the edits that cancel the two selections against each other throughout the tree.
pub fn cancel_peers(
    root: &Node,
    first: &Node,
    second: &Node,
    adjacent_only: bool,
    step_collector: &mut dyn StepCollector<Step>,
) -> Vec<PeerEdit> {
    let mut edits = Vec::new();
    walk(root, first, second, adjacent_only, &mut edits);
    if !edits.is_empty() {
        step_collector.push(Step::PeerCancel);
    }
    edits
}

/// Which selection a child matched.
#[derive(Clone, Copy, PartialEq)]
enum Side {
    First,
    Second,
}

fn walk(node: &Node, first: &Node, second: &Node, adjacent_only: bool, edits: &mut Vec<PeerEdit>) {
    if matches!(node.kind(), Kind::BracketedSum | Kind::BracketedMultiplication) {
        let identity = match node.kind() {
            Kind::BracketedSum => "0",
            _ => "1",
        };

        // unpaired matches seen so far, by child slot
        let mut open: Vec<(usize, Side, NodeId)> = Vec::new();
        for (slot, child) in node.children().iter().enumerate() {
            let side = if child.equivalent(first) {
                Some(Side::First)
            } else if child.equivalent(second) {
                Some(Side::Second)
            } else {
                None
            };
            let Some(side) = side else { continue };

            let opposite = match side {
                Side::First => Side::Second,
                Side::Second => Side::First,
            };
            let partner = open.iter()
                .position(|&(seen_slot, seen_side, _)| {
                    seen_side == opposite && (!adjacent_only || seen_slot + 1 == slot)
                });
            match partner {
                Some(index) => {
                    let (_, _, partner_id) = open.remove(index);
                    edits.push(PeerEdit { target: partner_id, replacement: Node::num(identity) });
                    edits.push(PeerEdit { target: child.id(), replacement: Node::num(identity) });
                },
                None => open.push((slot, side, child.id())),
            }
        }
    }

    // recurse regardless of whether this level paired anything
    for child in node.children() {
        walk(child, first, second, adjacent_only, edits);
    }
}

/// Builds a new tree with every edit applied. Nodes not named by an edit keep their identity.
pub fn apply_edits(root: &Node, edits: &[PeerEdit]) -> Node {
    if let Some(edit) = edits.iter().find(|edit| edit.target == root.id()) {
        return edit.replacement.detached();
    }
    let children = root.children().iter()
        .map(|child| apply_edits(child, edits))
        .collect();
    root.remade(children)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn var(name: &str) -> Node {
        Node::variable(name)
    }

    #[test]
    fn adjacent_pair_cancels_in_a_sum() {
        let root = Node::sum(vec![var("a"), var("b"), var("c")]);
        let edits = cancel_peers(&root, &var("a"), &var("b"), true, &mut ());
        assert_eq!(edits.len(), 2);

        let edited = apply_edits(&root, &edits);
        assert_eq!(edited, Node::sum(vec![Node::num("0"), Node::num("0"), var("c")]));
    }

    #[test]
    fn adjacent_only_mode_skips_distant_pairs() {
        let root = Node::sum(vec![var("a"), var("c"), var("b")]);
        assert!(cancel_peers(&root, &var("a"), &var("b"), true, &mut ()).is_empty());

        // any-preceding mode pairs them
        let edits = cancel_peers(&root, &var("a"), &var("b"), false, &mut ());
        assert_eq!(edits.len(), 2);
    }

    #[test]
    fn products_cancel_to_one() {
        let root = Node::product(vec![var("a"), var("b")]);
        let edits = cancel_peers(&root, &var("a"), &var("b"), true, &mut ());
        let edited = apply_edits(&root, &edits);
        assert_eq!(edited, Node::product(vec![Node::num("1"), Node::num("1")]));
    }

    #[test]
    fn each_match_pairs_at_most_once() {
        // two `a`s but only one `b`: exactly one pair cancels
        let root = Node::sum(vec![var("a"), var("b"), var("a")]);
        let edits = cancel_peers(&root, &var("a"), &var("b"), false, &mut ());
        assert_eq!(edits.len(), 2);

        let edited = apply_edits(&root, &edits);
        assert_eq!(edited, Node::sum(vec![Node::num("0"), Node::num("0"), var("a")]));
    }

    #[test]
    fn nested_levels_are_scanned() {
        let root = Node::sum(vec![
            Node::product(vec![var("a"), var("b")]),
            var("c"),
        ]);
        let edits = cancel_peers(&root, &var("a"), &var("b"), true, &mut ());
        let edited = apply_edits(&root, &edits);
        assert_eq!(edited, Node::sum(vec![
            Node::product(vec![Node::num("1"), Node::num("1")]),
            var("c"),
        ]));
    }
}
