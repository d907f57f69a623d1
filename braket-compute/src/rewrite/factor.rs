//! Factoring of repeated leading factors out of sums.
//!
//! Every summand is normalized to a signed factor list; the most frequent leading factor (ties
//! broken by encounter order) is extracted when it occurs more than once, rewriting the sum as
//! `factor * (sum of the stripped remainders) + (sum of the non-matching summands)`.
//! [`factor_right`] is the mirrored variant, extracting the most frequent trailing factor to the
//! right of the remainder sum.

use crate::node::{Kind, Node};
use super::{
    sign::pull_out_minus,
    step::Step,
    step_collector::StepCollector,
};

/// `a*b + a*c = a*(b+c)`
pub fn factor_left(node: &Node, step_collector: &mut dyn StepCollector<Step>) -> Option<Node> {
    let factored = factor(node, false)?;
    step_collector.push(Step::FactorLeft);
    Some(factored)
}

/// `b*a + c*a = (b+c)*a`
pub fn factor_right(node: &Node, step_collector: &mut dyn StepCollector<Step>) -> Option<Node> {
    let factored = factor(node, true)?;
    step_collector.push(Step::FactorRight);
    Some(factored)
}

/// A summand normalized to a sign and its ordered factors.
struct Summand {
    odd: bool,
    factors: Vec<Node>,
}

impl Summand {
    fn of(term: &Node) -> Summand {
        let pulled = pull_out_minus(term);
        let factors = match pulled.node.kind() {
            Kind::BracketedMultiplication => pulled.node.children().to_vec(),
            _ => vec![pulled.node],
        };
        Summand { odd: pulled.odd, factors }
    }

    /// The factor extraction would strip: the first from the left, or the last from the right.
    fn edge(&self, from_right: bool) -> &Node {
        // a summand always has at least one factor
        if from_right {
            &self.factors[self.factors.len() - 1]
        } else {
            &self.factors[0]
        }
    }

    /// The summand with its edge factor removed, re-signed.
    fn stripped(mut self, from_right: bool) -> Node {
        if from_right {
            self.factors.pop();
        } else {
            self.factors.remove(0);
        }
        let remainder = Node::product(self.factors);
        if self.odd {
            Node::negation(remainder)
        } else {
            remainder
        }
    }

    fn reassembled(self) -> Node {
        let product = Node::product(self.factors);
        if self.odd {
            Node::negation(product)
        } else {
            product
        }
    }
}

fn factor(node: &Node, from_right: bool) -> Option<Node> {
    if node.kind() != Kind::BracketedSum {
        return None;
    }

    let summands = node.children().iter().map(Summand::of).collect::<Vec<_>>();

    // most frequent edge factor, ties broken by encounter order
    let mut best: Option<(&Node, usize)> = None;
    for candidate in summands.iter().map(|summand| summand.edge(from_right)) {
        let count = summands.iter()
            .filter(|summand| summand.edge(from_right).equivalent(candidate))
            .count();
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((candidate, count));
        }
    }
    let (extracted, count) = best?;
    if count < 2 {
        return None;
    }
    let extracted = extracted.detached();

    let (matching, others): (Vec<_>, Vec<_>) = summands.into_iter()
        .partition(|summand| summand.edge(from_right).equivalent(&extracted));

    let remainders = matching.into_iter()
        .map(|summand| summand.stripped(from_right))
        .collect::<Vec<_>>();
    let factored = if from_right {
        Node::product(vec![Node::sum(remainders), extracted])
    } else {
        Node::product(vec![extracted, Node::sum(remainders)])
    };

    let mut terms = vec![factored];
    terms.extend(others.into_iter().map(Summand::reassembled));
    Some(Node::sum(terms))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn var(name: &str) -> Node {
        Node::variable(name)
    }

    #[test]
    fn repeated_leading_factor_is_extracted() {
        let node = Node::sum(vec![
            Node::product(vec![var("a"), var("b")]),
            Node::product(vec![var("a"), var("c")]),
        ]);
        let factored = factor_left(&node, &mut ()).unwrap();
        assert_eq!(factored, Node::product(vec![
            var("a"),
            Node::sum(vec![var("b"), var("c")]),
        ]));
    }

    #[test]
    fn non_matching_summands_are_kept_aside() {
        let node = Node::sum(vec![
            Node::product(vec![var("a"), var("b")]),
            Node::product(vec![var("a"), var("c")]),
            Node::product(vec![var("d"), var("e")]),
        ]);
        let factored = factor_left(&node, &mut ()).unwrap();
        assert_eq!(factored, Node::sum(vec![
            Node::product(vec![var("a"), Node::sum(vec![var("b"), var("c")])]),
            Node::product(vec![var("d"), var("e")]),
        ]));
    }

    #[test]
    fn signs_survive_the_extraction() {
        // a*b - a*c = a*(b - c)
        let node = Node::sum(vec![
            Node::product(vec![var("a"), var("b")]),
            Node::negation(Node::product(vec![var("a"), var("c")])),
        ]);
        let factored = factor_left(&node, &mut ()).unwrap();
        assert_eq!(factored, Node::product(vec![
            var("a"),
            Node::sum(vec![var("b"), Node::negation(var("c"))]),
        ]));
    }

    #[test]
    fn right_variant_mirrors_the_order() {
        let node = Node::sum(vec![
            Node::product(vec![var("b"), var("a")]),
            Node::product(vec![var("c"), var("a")]),
        ]);
        let factored = factor_right(&node, &mut ()).unwrap();
        assert_eq!(factored, Node::product(vec![
            Node::sum(vec![var("b"), var("c")]),
            var("a"),
        ]));
    }

    #[test]
    fn nothing_repeats_nothing_changes() {
        let node = Node::sum(vec![
            Node::product(vec![var("a"), var("b")]),
            Node::product(vec![var("c"), var("d")]),
        ]);
        assert_eq!(factor_left(&node, &mut ()), None);
    }

    #[test]
    fn ties_prefer_the_earlier_factor() {
        let node = Node::sum(vec![
            Node::product(vec![var("a"), var("x")]),
            Node::product(vec![var("b"), var("y")]),
            Node::product(vec![var("a"), var("z")]),
            Node::product(vec![var("b"), var("w")]),
        ]);
        let factored = factor_left(&node, &mut ()).unwrap();
        // both `a` and `b` occur twice; `a` was encountered first
        assert_eq!(factored.children()[0].children()[0], var("a"));
    }
}
