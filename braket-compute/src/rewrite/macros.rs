//! Macro expansion.
//!
//! A macro node carries a trigger name and positional argument subtrees. Expansion parses the
//! macro's output template into a tree of placeholder leaves, substitutes each placeholder with
//! the corresponding argument, and replaces the macro node with the result.
//!
//! Expansion is refused (the macro node is kept) when the substituted result still contains a
//! raw-latex leaf: raw latex cannot be proven free of hidden argument interpolation, so inlining
//! it would break round-trip safety.

use crate::ctxt::Ctxt;
use crate::node::{Kind, Node, NodeError};
use super::{step::Step, step_collector::StepCollector};

/// The depth at which recursive macro expansion is cut off.
pub const MAX_DEPTH: usize = 32;

/// Expands a single macro node one level, consulting the macro table for its template.
///
/// Returns `Ok(None)` when the node is not a macro, when no template is defined for its
/// trigger, or when expansion is refused because the result contains raw latex.
pub fn expand_macro(
    node: &Node,
    ctxt: &mut Ctxt,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<Option<Node>, NodeError> {
    if node.kind() != Kind::Macro {
        return Ok(None);
    }

    let id = ctxt.macros.ensure_declared(ctxt.macro_scope, node.value());
    let Some(template) = ctxt.macros.output_template(ctxt.macro_scope, id) else {
        return Ok(None);
    };

    let parsed = ctxt.macros.try_parse(ctxt.macro_scope, node.value(), &template)?;
    let substituted = substitute(&parsed, node.children());

    if contains_raw_latex(&substituted) {
        return Ok(None);
    }

    step_collector.push(Step::MacroExpand);
    Ok(Some(substituted))
}

/// Expands every macro in the tree, recursively, until none is left or the depth limit trips.
pub fn expand_all(
    node: &Node,
    ctxt: &mut Ctxt,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<Node, NodeError> {
    expand_rec(node, ctxt, step_collector, 0)
}

fn expand_rec(
    node: &Node,
    ctxt: &mut Ctxt,
    step_collector: &mut dyn StepCollector<Step>,
    depth: usize,
) -> Result<Node, NodeError> {
    let children = node.children().iter()
        .map(|child| expand_rec(child, ctxt, step_collector, depth))
        .collect::<Result<Vec<_>, _>>()?;
    let rebuilt = node.remade(children);

    match expand_macro(&rebuilt, ctxt, step_collector)? {
        Some(expanded) => {
            if depth >= MAX_DEPTH {
                return Err(NodeError::MacroDepth {
                    trigger: rebuilt.value().to_string(),
                    limit: MAX_DEPTH,
                });
            }
            // the substituted output may itself contain macros
            expand_rec(&expanded, ctxt, step_collector, depth + 1)
        },
        None => Ok(rebuilt),
    }
}

/// Replaces every placeholder leaf with the argument at its index. A missing argument becomes
/// the empty-argument marker.
fn substitute(template: &Node, args: &[Node]) -> Node {
    if template.kind() == Kind::PlaceHolder {
        return template.value().parse::<usize>()
            .ok()
            .and_then(|index| args.get(index))
            .map_or_else(Node::empty, Node::detached);
    }
    template.remade(
        template.children().iter()
            .map(|child| substitute(child, args))
            .collect(),
    )
}

fn contains_raw_latex(node: &Node) -> bool {
    node.kind() == Kind::RawLatex || node.children().iter().any(contains_raw_latex)
}
