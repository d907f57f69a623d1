//! Complex-pair multiplication.
//!
//! `(ra + i ia) * (rb + i ib) = (ra*rb - ia*ib) + i (ra*ib + ia*rb)`. Each of the four partial
//! products runs through sign extraction and zero filtering; the result collapses back to a
//! plain real node when its imaginary part folds to zero.

use crate::node::{Kind, Node};
use super::{
    fold::fold,
    sign::pull_out_minus,
    step::Step,
    step_collector::StepCollector,
};

/// Multiplies two operands, either or both of which may be complex pairs.
pub fn multiply_complex(
    lhs: &Node,
    rhs: &Node,
    step_collector: &mut dyn StepCollector<Step>,
) -> Node {
    let (real_a, imag_a) = parts(lhs);
    let (real_b, imag_b) = parts(rhs);

    let real = signed_sum(vec![
        partial(&real_a, &real_b, false),
        partial(&imag_a, &imag_b, true),
    ]);
    let imaginary = signed_sum(vec![
        partial(&real_a, &imag_b, false),
        partial(&imag_a, &real_b, false),
    ]);

    step_collector.push(Step::ComplexMultiply);
    if fold(&imaginary).is_num(0.0) {
        real
    } else {
        Node::complex_pair(real, imaginary)
    }
}

/// Expands a product containing at least one complex pair, multiplying its factors pairwise from
/// the left.
pub fn expand_complex_product(
    node: &Node,
    step_collector: &mut dyn StepCollector<Step>,
) -> Option<Node> {
    if node.kind() != Kind::BracketedMultiplication
        || !node.children().iter().any(|child| child.kind() == Kind::ComplexPair)
    {
        return None;
    }

    let mut factors = node.children().iter();
    // a product has at least one factor
    let mut acc = factors.next()?.detached();
    for factor in factors {
        acc = multiply_complex(&acc, factor, step_collector);
    }
    Some(acc)
}

/// Splits an operand into its real and imaginary parts. A plain operand is all real.
fn parts(node: &Node) -> (Node, Node) {
    if node.kind() == Kind::ComplexPair {
        (node.children()[0].detached(), node.children()[1].detached())
    } else {
        (node.detached(), Node::num("0"))
    }
}

/// Builds one partial product, filtered to [`None`] when it is exactly zero.
fn partial(lhs: &Node, rhs: &Node, negated: bool) -> Option<(bool, Node)> {
    if fold(lhs).is_num(0.0) || fold(rhs).is_num(0.0) {
        return None;
    }
    let pulled = pull_out_minus(&Node::product(vec![lhs.detached(), rhs.detached()]));
    Some((pulled.odd ^ negated, pulled.node))
}

/// Sums the surviving signed partials.
fn signed_sum(partials: Vec<Option<(bool, Node)>>) -> Node {
    let terms = partials.into_iter()
        .flatten()
        .map(|(odd, node)| if odd { Node::negation(node) } else { node })
        .collect::<Vec<_>>();
    Node::sum(terms)
}
