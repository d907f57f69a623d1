//! Numeric folding.
//!
//! Folding walks the tree bottom-up and replaces every fully numeric subtree with its literal
//! value. Sums and products additionally fold partially: their numeric children are combined
//! into a single literal while the symbolic children are kept, and the combined literal is only
//! inserted when it is not the identity element (0 for a sum, 1 for a product).
//!
//! Folding is idempotent: a second pass over a folded tree changes nothing.

use crate::node::{Kind, Node};
use super::{step::Step, step_collector::StepCollector};

/// Folds a tree without collecting steps.
pub fn fold(node: &Node) -> Node {
    fold_with(node, &mut ())
}

/// Folds a tree, recording a step for every replacement made.
pub fn fold_with(node: &Node, step_collector: &mut dyn StepCollector<Step>) -> Node {
    let children = node.children().iter()
        .map(|child| fold_with(child, step_collector))
        .collect::<Vec<_>>();
    let rebuilt = node.remade(children);

    if let Some(value) = rebuilt.evaluate() {
        if rebuilt.kind() == Kind::Num {
            return rebuilt;
        }
        step_collector.push(Step::Fold);
        return Node::num_f64(value);
    }

    match rebuilt.kind() {
        Kind::BracketedSum => fold_partial(rebuilt, 0.0, |acc, v| acc + v, step_collector),
        Kind::BracketedMultiplication => {
            fold_partial(rebuilt, 1.0, |acc, v| acc * v, step_collector)
        },
        _ => rebuilt,
    }
}

/// Combines the numeric children of a sum or product into one literal, keeping the symbolic
/// children. The node itself is known not to evaluate, so at least one symbolic child remains.
fn fold_partial(
    node: Node,
    identity: f64,
    combine: fn(f64, f64) -> f64,
    step_collector: &mut dyn StepCollector<Step>,
) -> Node {
    let mut acc = identity;
    let mut numeric = 0;
    let mut rest = Vec::with_capacity(node.children().len());
    for child in node.children() {
        match child.evaluate() {
            Some(value) => {
                acc = combine(acc, value);
                numeric += 1;
            },
            None => rest.push(child.clone()),
        }
    }

    // one non-identity literal is already in its folded form
    if numeric == 0 || (numeric == 1 && acc != identity) {
        return node;
    }

    step_collector.push(Step::PartialFold);
    if acc != identity {
        match node.kind() {
            // the combined literal becomes the leading coefficient of a product, and the
            // trailing term of a sum
            Kind::BracketedMultiplication => rest.insert(0, Node::num_f64(acc)),
            _ => rest.push(Node::num_f64(acc)),
        }
    }

    match node.kind() {
        Kind::BracketedSum => Node::sum(rest),
        _ => Node::product(rest),
    }
}
