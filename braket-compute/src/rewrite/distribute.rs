//! Distribution of products over sums.
//!
//! `(a + b) * (c + d) = a*c + a*d + b*c + b*d`, generalized to any number of factors: every
//! factor is treated as a (possibly one-term) sum and the result is the cartesian combination of
//! their terms. The projected term count is capped; a product that would expand past the cap is
//! left unchanged, with a warning, so pathological inputs cannot blow up combinatorially.

use tracing::warn;
use crate::node::{Kind, Node};
use super::{step::Step, step_collector::StepCollector};

/// The largest number of terms a single distribution may produce.
pub const MAX_TERMS: usize = 400;

/// `a*(b+c) = a*b + a*c`
pub fn distribute(node: &Node, step_collector: &mut dyn StepCollector<Step>) -> Option<Node> {
    if node.kind() != Kind::BracketedMultiplication {
        return None;
    }

    // each factor as its term list; a non-sum factor is a one-term sum
    let factor_terms = node.children().iter()
        .map(|factor| match factor.kind() {
            Kind::BracketedSum => factor.children(),
            _ => std::slice::from_ref(factor),
        })
        .collect::<Vec<_>>();

    if factor_terms.iter().all(|terms| terms.len() == 1) {
        return None;
    }

    let projected = factor_terms.iter()
        .map(|terms| terms.len())
        .try_fold(1usize, |acc, len| {
            acc.checked_mul(len).filter(|&total| total <= MAX_TERMS)
        });
    if projected.is_none() {
        warn!(
            cap = MAX_TERMS,
            "distribution would exceed the term cap; leaving the product unchanged"
        );
        return None;
    }

    let mut terms: Vec<Vec<Node>> = vec![Vec::new()];
    for factor in factor_terms {
        terms = terms.into_iter()
            .flat_map(|combination| {
                factor.iter().map(move |term| {
                    let mut extended = combination.clone();
                    extended.push(term.detached());
                    extended
                })
            })
            .collect();
    }

    step_collector.push(Step::Distribute);
    Some(Node::sum(terms.into_iter().map(Node::product).collect()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn var(name: &str) -> Node {
        Node::variable(name)
    }

    #[test]
    fn binomial_product_expands() {
        let node = Node::product(vec![
            Node::sum(vec![var("a"), var("b")]),
            Node::sum(vec![var("c"), var("d")]),
        ]);
        let expanded = distribute(&node, &mut ()).unwrap();
        assert_eq!(expanded, Node::sum(vec![
            Node::product(vec![var("a"), var("c")]),
            Node::product(vec![var("a"), var("d")]),
            Node::product(vec![var("b"), var("c")]),
            Node::product(vec![var("b"), var("d")]),
        ]));
    }

    #[test]
    fn plain_factor_distributes_over_the_sum() {
        let node = Node::product(vec![
            var("a"),
            Node::sum(vec![var("b"), var("c")]),
        ]);
        let expanded = distribute(&node, &mut ()).unwrap();
        assert_eq!(expanded, Node::sum(vec![
            Node::product(vec![var("a"), var("b")]),
            Node::product(vec![var("a"), var("c")]),
        ]));
    }

    #[test]
    fn sum_free_product_is_untouched() {
        let node = Node::product(vec![var("a"), var("b")]);
        assert_eq!(distribute(&node, &mut ()), None);
    }

    #[test]
    fn term_cap_blocks_the_expansion() {
        // five 4-term sums project to 4^5 = 1024 terms, past the cap
        let wide_sum = || Node::sum(vec![var("a"), var("b"), var("c"), var("d")]);
        let node = Node::product((0..5).map(|_| wide_sum()).collect());
        assert_eq!(distribute(&node, &mut ()), None);
    }

    #[test]
    fn cap_boundary_still_expands() {
        // 4^4 = 256 terms, within the cap
        let wide_sum = || Node::sum(vec![var("a"), var("b"), var("c"), var("d")]);
        let node = Node::product((0..4).map(|_| wide_sum()).collect());
        let expanded = distribute(&node, &mut ()).unwrap();
        assert_eq!(expanded.children().len(), 256);
    }
}
