//! Sign extraction (the MinusPullout capability).
//!
//! [`pull_out_minus`] reports whether extracting every sign from a subtree yields an even or odd
//! number of flips, together with the extracted form. Negations flip their child's parity,
//! products and fractions XOR the parity of their parts, and a sum only pulls a sign when every
//! summand does.

use crate::node::{Kind, Node};
use super::{step::Step, step_collector::StepCollector};

/// The result of extracting signs from a subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct Pulled {
    /// Whether the extraction flipped the sign an odd number of times, i.e. whether the
    /// extracted form must be negated to stay equal to the input.
    pub odd: bool,

    /// The extracted form, free of the pulled signs.
    pub node: Node,
}

impl Pulled {
    fn even(node: Node) -> Pulled {
        Pulled { odd: false, node }
    }

    /// Reassembles the node this extraction came from.
    pub fn reapply(self) -> Node {
        if self.odd {
            Node::negation(self.node)
        } else {
            self.node
        }
    }
}

/// Extracts every pullable sign from the subtree, reporting the net parity.
pub fn pull_out_minus(node: &Node) -> Pulled {
    match node.kind() {
        Kind::Negation => {
            let child = pull_out_minus(&node.children()[0]);
            Pulled { odd: !child.odd, node: child.node }
        },
        Kind::Num => match node.evaluate() {
            Some(value) if value < 0.0 => Pulled { odd: true, node: Node::num_f64(-value) },
            _ => Pulled::even(node.clone()),
        },
        Kind::BracketedMultiplication | Kind::Fraction => {
            let mut odd = false;
            let parts = node.children().iter()
                .map(|child| {
                    let pulled = pull_out_minus(child);
                    odd ^= pulled.odd;
                    pulled.node
                })
                .collect::<Vec<_>>();
            Pulled { odd, node: node.remade(parts) }
        },
        Kind::BracketedSum => {
            // compare the all-pulled and none-pulled reconstructions: the sum carries an outer
            // sign only when every summand does
            let pulled = node.children().iter()
                .map(pull_out_minus)
                .collect::<Vec<_>>();
            if pulled.iter().all(|term| term.odd) {
                let terms = pulled.into_iter().map(|term| term.node).collect();
                Pulled { odd: true, node: node.remade(terms) }
            } else {
                let terms = pulled.into_iter().map(Pulled::reapply).collect();
                Pulled::even(node.remade(terms))
            }
        },
        _ => Pulled::even(node.clone()),
    }
}

/// Rewrites a subtree into its sign-extracted form, when that form differs from the input.
pub fn minus_pullout(
    node: &Node,
    step_collector: &mut dyn StepCollector<Step>,
) -> Option<Node> {
    let rebuilt = pull_out_minus(node).reapply();
    if rebuilt == *node {
        return None;
    }
    step_collector.push(Step::MinusPullout);
    Some(rebuilt)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn double_negation_has_even_parity() {
        let node = Node::negation(Node::negation(Node::variable("x")));
        let pulled = pull_out_minus(&node);
        assert!(!pulled.odd);
        assert!(pulled.node.equivalent(&Node::variable("x")));
    }

    #[test]
    fn negative_literal_pulls_its_sign() {
        let pulled = pull_out_minus(&Node::num("-3"));
        assert_eq!(pulled, Pulled { odd: true, node: Node::num("3") });
    }

    #[test]
    fn product_parity_is_the_xor_of_its_factors() {
        let node = Node::product(vec![
            Node::negation(Node::variable("a")),
            Node::negation(Node::variable("b")),
            Node::negation(Node::variable("c")),
        ]);
        let pulled = pull_out_minus(&node);
        assert!(pulled.odd);
        assert_eq!(pulled.node, Node::product(vec![
            Node::variable("a"),
            Node::variable("b"),
            Node::variable("c"),
        ]));
    }

    #[test]
    fn fully_negated_sum_pulls_an_outer_sign() {
        let node = Node::sum(vec![
            Node::negation(Node::variable("a")),
            Node::negation(Node::variable("b")),
        ]);
        let pulled = pull_out_minus(&node);
        assert!(pulled.odd);
        assert_eq!(pulled.node, Node::sum(vec![
            Node::variable("a"),
            Node::variable("b"),
        ]));
    }

    #[test]
    fn mixed_sum_keeps_its_signs() {
        let node = Node::sum(vec![
            Node::negation(Node::variable("a")),
            Node::variable("b"),
        ]);
        let pulled = pull_out_minus(&node);
        assert!(!pulled.odd);
        assert_eq!(pulled.node, node);
    }

    #[test]
    fn rule_rewrites_only_when_something_changes() {
        let node = Node::negation(Node::negation(Node::variable("x")));
        assert_eq!(minus_pullout(&node, &mut ()), Some(Node::variable("x")));
        assert_eq!(minus_pullout(&Node::variable("x"), &mut ()), None);
    }
}
