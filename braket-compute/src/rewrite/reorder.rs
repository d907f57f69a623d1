//! Commutation-aware canonical reordering of operator strings.
//!
//! The unit of work is the longest contiguous run of orderable factors inside a product. An
//! odd-even transposition sort brings the run into canonical key order; every adjacent
//! out-of-order pair is rewritten through its commutation rule, which may flip the cumulative
//! sign of the line and may spawn extra additive correction lines (Kronecker deltas, number
//! operators). Spawned lines are themselves fully sorted and may spawn further lines.
//!
//! All lines become additive terms of the result, ordered by (length, sign, concatenated keys)
//! for deterministic output. Growth past [`MAX_LINES`] is treated as a defect of the input: the
//! whole operation becomes a warned no-op.

use tracing::warn;
use crate::node::{
    order::{self, OrderKey},
    Kind,
    Node,
};
use super::{step::Step, step_collector::StepCollector};

/// The largest number of lines one reordering may accumulate.
pub const MAX_LINES: usize = 64;

/// One additive term in flight: a cumulative sign and an operator sequence.
#[derive(Debug, Clone)]
struct Line {
    negated: bool,
    factors: Vec<Node>,
}

impl Line {
    fn keys(&self) -> Vec<OrderKey> {
        self.factors.iter().filter_map(order::order_key).collect()
    }
}

/// Reorders the longest operator string of a product into canonical order, returning the
/// resulting sum of (possibly negated) products.
pub fn reorder(node: &Node, step_collector: &mut dyn StepCollector<Step>) -> Option<Node> {
    if node.kind() != Kind::BracketedMultiplication {
        return None;
    }

    let factors = node.children();
    let (start, end) = longest_run(factors)?;

    let mut lines = vec![Line {
        negated: false,
        factors: factors[start..end].iter().map(Node::detached).collect(),
    }];
    let mut changed = false;
    let mut index = 0;
    while index < lines.len() {
        if !sort_line(&mut lines, index, &mut changed) {
            warn!(
                cap = MAX_LINES,
                "reordering spawned too many terms; leaving the product unchanged"
            );
            return None;
        }
        index += 1;
    }
    if !changed {
        return None;
    }

    lines.sort_by_cached_key(|line| (line.factors.len(), line.negated, line.keys()));

    let terms = lines.into_iter()
        .map(|line| {
            let mut assembled = factors[..start].iter().map(Node::detached).collect::<Vec<_>>();
            assembled.extend(line.factors.iter().map(Node::detached));
            assembled.extend(factors[end..].iter().map(Node::detached));
            let product = Node::product(assembled);
            if line.negated {
                Node::negation(product)
            } else {
                product
            }
        })
        .collect::<Vec<_>>();

    step_collector.push(Step::Reorder);
    Some(Node::sum(terms))
}

/// Finds the longest contiguous run of orderable factors, at least two factors long. Earlier
/// runs win ties.
fn longest_run(factors: &[Node]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut start = None;
    for (index, factor) in factors.iter().enumerate() {
        if order::order_key(factor).is_some() {
            let start = *start.get_or_insert(index);
            let run = (start, index + 1);
            if best.map_or(true, |(s, e)| run.1 - run.0 > e - s) {
                best = Some(run);
            }
        } else {
            start = None;
        }
    }
    best.filter(|(s, e)| e - s >= 2)
}

/// Runs the odd-even transposition sort over one line, spawning extra lines for every
/// commutation correction. Returns false when the line cap is hit.
fn sort_line(lines: &mut Vec<Line>, index: usize, changed: &mut bool) -> bool {
    let mut line = lines[index].clone();
    let mut parity = 0;
    let mut quiet_passes = 0;

    // a full quiet cycle is one swap-free pass at each parity
    while quiet_passes < 2 {
        let mut swapped = false;
        let mut k = parity;
        while k + 1 < line.factors.len() {
            if out_of_order(&line.factors[k], &line.factors[k + 1]) {
                let (swap, extras) = order::commute(&line.factors[k], &line.factors[k + 1]);

                // extras carry the cumulative sign of the line before this swap
                for extra in extras {
                    if lines.len() >= MAX_LINES {
                        return false;
                    }
                    let mut factors = line.factors[..k].to_vec();
                    factors.extend(extra.factors);
                    factors.extend(line.factors[k + 2..].iter().cloned());
                    lines.push(Line { negated: line.negated ^ extra.negate, factors });
                }

                line.negated ^= swap.negate;
                line.factors.splice(k..k + 2, swap.factors);
                swapped = true;
                *changed = true;
            }
            k += 2;
        }

        if swapped {
            quiet_passes = 0;
        } else {
            quiet_passes += 1;
        }
        parity = 1 - parity;
    }

    lines[index] = line;
    true
}

fn out_of_order(left: &Node, right: &Node) -> bool {
    match (order::order_key(left), order::order_key(right)) {
        (Some(a), Some(b)) => a > b,
        _ => false,
    }
}
