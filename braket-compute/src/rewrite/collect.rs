//! Collection and cancellation of like terms in a sum.
//!
//! Summands that are equivalent once their leading numeric coefficient and leading sign are
//! ignored form a group; each group's signed coefficients are accumulated, groups that cancel to
//! zero are dropped, and the survivors are re-expanded into (optionally negated)
//! coefficient-times-term form.

use crate::node::{Kind, Node};
use super::{
    sign::pull_out_minus,
    step::Step,
    step_collector::StepCollector,
};

/// `2x + 3x = 5x`, `x - x = 0`
pub fn collect_terms(node: &Node, step_collector: &mut dyn StepCollector<Step>) -> Option<Node> {
    if node.kind() != Kind::BracketedSum {
        return None;
    }

    let mut groups: Vec<(Node, f64)> = Vec::new();
    for term in node.children() {
        let (coefficient, core) = split(term);
        match groups.iter_mut().find(|(existing, _)| existing.equivalent(&core)) {
            Some((_, total)) => *total += coefficient,
            None => groups.push((core, coefficient)),
        }
    }

    let terms = groups.into_iter()
        .filter(|&(_, total)| total.abs() > 1e-12)
        .map(|(core, total)| scaled(core, total))
        .collect::<Vec<_>>();

    let collected = Node::sum(terms);
    if collected == *node {
        return None;
    }
    step_collector.push(Step::Collect);
    Some(collected)
}

/// Splits a summand into its signed numeric coefficient and the remaining core term.
fn split(term: &Node) -> (f64, Node) {
    let pulled = pull_out_minus(term);
    let sign = if pulled.odd { -1.0 } else { 1.0 };

    if let Some(value) = pulled.node.evaluate() {
        return (sign * value, Node::num("1"));
    }

    if pulled.node.kind() == Kind::BracketedMultiplication {
        if let Some(value) = pulled.node.children()[0].evaluate() {
            let rest = pulled.node.children()[1..].to_vec();
            return (sign * value, Node::product(rest));
        }
    }

    (sign, pulled.node)
}

/// Rebuilds a group into coefficient-times-term form.
fn scaled(core: Node, total: f64) -> Node {
    let magnitude = total.abs();
    let unsigned = if core.is_num(1.0) {
        Node::num_f64(magnitude)
    } else if (magnitude - 1.0).abs() <= 1e-12 {
        core
    } else {
        Node::product(vec![Node::num_f64(magnitude), core])
    };

    if total < 0.0 {
        Node::negation(unsigned)
    } else {
        unsigned
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn var(name: &str) -> Node {
        Node::variable(name)
    }

    fn coeff(value: &str, core: Node) -> Node {
        Node::product(vec![Node::num(value), core])
    }

    #[test]
    fn like_terms_merge() {
        let node = Node::sum(vec![coeff("2", var("x")), coeff("3", var("x"))]);
        assert_eq!(collect_terms(&node, &mut ()), Some(coeff("5", var("x"))));
    }

    #[test]
    fn opposite_terms_cancel_to_zero() {
        let node = Node::sum(vec![var("x"), Node::negation(var("x"))]);
        assert_eq!(collect_terms(&node, &mut ()), Some(Node::num("0")));
    }

    #[test]
    fn cancelled_group_is_dropped() {
        let node = Node::sum(vec![
            var("y"),
            coeff("2", var("x")),
            Node::negation(coeff("2", var("x"))),
        ]);
        assert_eq!(collect_terms(&node, &mut ()), Some(var("y")));
    }

    #[test]
    fn negative_total_renders_as_negation() {
        // x - 3x = -(2 * x)
        let node = Node::sum(vec![var("x"), Node::negation(coeff("3", var("x")))]);
        assert_eq!(
            collect_terms(&node, &mut ()),
            Some(Node::negation(coeff("2", var("x")))),
        );
    }

    #[test]
    fn numeric_summands_form_their_own_group() {
        let node = Node::sum(vec![Node::num("2"), var("x"), Node::num("3")]);
        let collected = collect_terms(&node, &mut ()).unwrap();
        assert_eq!(collected, Node::sum(vec![Node::num("5"), var("x")]));
    }

    #[test]
    fn unrelated_terms_are_untouched() {
        let node = Node::sum(vec![var("x"), var("y")]);
        assert_eq!(collect_terms(&node, &mut ()), None);
    }
}
