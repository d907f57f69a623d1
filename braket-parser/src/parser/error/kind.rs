use ariadne::Fmt;
use braket_attrs::ErrorKind;
use braket_error::{ErrorKind, EXPR};

/// A fragment of the source could not be classified as a number, identifier, reserved symbol, or
/// function keyword.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot understand `{}`", fragment),
    labels = ["this is not part of the formula language"],
    help = format!("formulas are made of numbers, identifiers, parentheses, and the symbols {}", "+ - * / :".fg(EXPR)),
)]
pub struct InvalidFragment {
    /// The fragment that could not be classified.
    pub fragment: String,
}

/// The number of opening and closing parentheses do not match.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unbalanced parentheses",
    labels = ["in this formula"],
    help = format!("counted {} opening and {} closing parentheses", open, close),
)]
pub struct UnbalancedParens {
    /// The number of opening parentheses.
    pub open: usize,

    /// The number of closing parentheses.
    pub close: usize,
}

/// There was no expression inside a pair of parentheses.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing expression inside parentheses",
    labels = ["add an expression here"],
)]
pub struct EmptyGroup;

/// An operator did not find the operands it requires.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("missing operand for `{}`", op),
    labels = [format!(
        "this operator needs {} {} {} it, but found {}",
        needed,
        if *needed == 1 { "operand" } else { "operands" },
        if *before { "before" } else { "after" },
        found,
    )],
)]
pub struct MissingOperand {
    /// The symbol of the operator.
    pub op: &'static str,

    /// The number of operands the operator requires on the offending side.
    pub needed: usize,

    /// The number of operands that were actually available.
    pub found: usize,

    /// Whether the missing operands were expected before the operator. (Otherwise, they were
    /// expected after it.)
    pub before: bool,
}

/// After resolving every operator, more than one element remained in the group.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unconsumed operands",
    labels = [format!("{} elements remain after resolving every operator", count)],
    help = format!("add an {} between adjacent values, or remove one of them", "operator".fg(EXPR)),
)]
pub struct UnconsumedOperands {
    /// The number of elements left in the group.
    pub count: usize,
}

/// An operator token appeared on its own, with no group giving it operands.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a formula by itself", op),
    labels = ["this operator has nothing to apply to"],
)]
pub struct BareOperator {
    /// The lexeme of the operator.
    pub op: String,
}
