//! The tree builder: converts resolved parser output into canonical node trees.
//!
//! Nested chains of the same operator are flattened here, so `2+3+4` becomes one three-term sum
//! rather than a nested pair of sums. Binder keywords take their positional slots from the
//! multiplication chain of their argument group; any other shape is an error naming the required
//! slot count.

use braket_attrs::ErrorKind;
use braket_error::{Error, ErrorKind};
use braket_parser::parser::{self, Expr, OpKind};
use crate::ctxt::Ctxt;
use super::{Kind, Node};

/// A binder keyword's argument group did not split into the required number of slots.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` expects exactly {} argument slots", keyword, needed),
    labels = [format!("this argument group splits into {} slots", found)],
    help = format!("write `{}(index upperBound body)`, separating the slots by multiplication", keyword),
)]
pub struct BinderSlots {
    /// The binder keyword.
    pub keyword: &'static str,

    /// The number of slots the binder requires.
    pub needed: usize,

    /// The number of slots that were found.
    pub found: usize,
}

/// Parses a source string all the way to a node tree.
pub fn parse(source: &str, ctxt: &mut Ctxt) -> Result<Node, Error> {
    let expr = parser::parse(source)?;
    build(&expr, ctxt)
}

/// Builds a node tree from resolved parser output.
pub fn build(expr: &Expr, ctxt: &mut Ctxt) -> Result<Node, Error> {
    match expr {
        Expr::Num(num) => Ok(Node::num(num.value.clone())),
        Expr::Name(sym) => Ok(build_name(&sym.name, ctxt)),
        Expr::Infix(infix) => match infix.op.kind {
            OpKind::Add => Ok(Node::sum(build_chain(expr, OpKind::Add, ctxt)?)),
            OpKind::Mul => Ok(Node::product(build_chain(expr, OpKind::Mul, ctxt)?)),
            OpKind::Div => Ok(Node::fraction(
                build(&infix.args[0], ctxt)?,
                build(&infix.args[1], ctxt)?,
            )),
            OpKind::Neg => Ok(Node::negation(build(&infix.args[0], ctxt)?)),
            OpKind::BigSum => Ok(Node::big_sum(binder_slots(infix, "sum", ctxt)?)),
            OpKind::BigIntegral => Ok(Node::big_integral(binder_slots(infix, "int", ctxt)?)),
        },
    }
}

/// Builds a name reference. `pi` and `e` are constants, `i` is the imaginary unit, and anything
/// else is a variable, declared in the variable table as a side effect.
fn build_name(name: &str, ctxt: &mut Ctxt) -> Node {
    match name {
        "pi" | "e" => Node::constant(name),
        "i" => Node::imaginary_unit(),
        _ => {
            ctxt.variables.ensure_declared(ctxt.variable_scope, name);
            Node::variable(name)
        },
    }
}

/// Builds the flattened operand list of a chain of the same operator.
fn build_chain(expr: &Expr, kind: OpKind, ctxt: &mut Ctxt) -> Result<Vec<Node>, Error> {
    let mut operands = Vec::new();
    flatten(expr, kind, &mut operands);
    operands.into_iter()
        .map(|operand| build(operand, ctxt))
        .collect()
}

/// Collects the leaves of a nested chain of the same operator, in source order.
fn flatten<'expr>(expr: &'expr Expr, kind: OpKind, out: &mut Vec<&'expr Expr>) {
    if let Expr::Infix(infix) = expr {
        if infix.op.kind == kind {
            for arg in &infix.args {
                flatten(arg, kind, out);
            }
            return;
        }
    }
    out.push(expr);
}

/// Recovers the three positional slots of a binder from the multiplication chain of its argument
/// group.
fn binder_slots(
    infix: &parser::Infix,
    keyword: &'static str,
    ctxt: &mut Ctxt,
) -> Result<[Node; 3], Error> {
    let mut slots = Vec::new();
    flatten(&infix.args[0], OpKind::Mul, &mut slots);
    match <[&Expr; 3]>::try_from(slots.as_slice()) {
        Ok([first, second, third]) => Ok([
            build(first, ctxt)?,
            build(second, ctxt)?,
            build(third, ctxt)?,
        ]),
        Err(_) => Err(Error::new(
            vec![infix.span.clone()],
            BinderSlots { keyword, needed: 3, found: slots.len() },
        )),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse_node(input: &str) -> Node {
        parse(input, &mut Ctxt::in_memory()).unwrap()
    }

    #[test]
    fn addition_chain_flattens() {
        let tree = parse_node("2+3+4");
        assert_eq!(tree.kind(), Kind::BracketedSum);
        assert_eq!(tree.children().len(), 3);
    }

    #[test]
    fn implicit_multiplication_flattens() {
        let tree = parse_node("1 2 3");
        assert_eq!(tree.kind(), Kind::BracketedMultiplication);
        assert_eq!(tree.children().len(), 3);
    }

    #[test]
    fn grouping_limits_flattening() {
        // the parenthesized sum stays a nested child
        let tree = parse_node("2 + (3 + 4) + x");
        assert_eq!(tree.children().len(), 3);
        assert_eq!(tree.children()[1].kind(), Kind::BracketedSum);
    }

    #[test]
    fn names_classify() {
        assert_eq!(parse_node("asd"), Node::variable("asd"));
        assert_eq!(parse_node("pi"), Node::constant("pi"));
        assert_eq!(parse_node("i"), Node::imaginary_unit());
    }

    #[test]
    fn division_builds_a_fraction() {
        let tree = parse_node("x / 2");
        assert_eq!(tree.kind(), Kind::Fraction);
        assert_eq!(tree.children()[0], Node::variable("x"));
    }

    #[test]
    fn binder_recovers_three_slots() {
        let tree = parse_node("sum(k n x)");
        assert_eq!(tree.kind(), Kind::BigSum);
        assert_eq!(tree.children()[0], Node::variable("k"));
        assert_eq!(tree.children()[2], Node::variable("x"));
    }

    #[test]
    fn binder_slot_count_is_checked() {
        assert!(parse("sum(k n)", &mut Ctxt::in_memory()).is_err());
        assert!(parse("int(k n x y)", &mut Ctxt::in_memory()).is_err());
    }
}
