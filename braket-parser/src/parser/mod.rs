pub mod error;
pub mod expr;
pub mod group;
pub mod implicit;
pub mod resolve;

pub use error::Error;
pub use expr::{Expr, Infix, LitNum, LitSym, Op, OpKind};

use crate::tokenizer::tokenize_complete;

/// Runs the full parser pipeline over the given source: tokenization, bracket grouping,
/// implicit-multiplication insertion, and precedence resolution.
pub fn parse(source: &str) -> Result<Expr, Error> {
    let tokens = tokenize_complete(source)?;
    let tokens = tokens.iter()
        .filter(|token| !token.is_whitespace())
        .cloned()
        .collect::<Vec<_>>();

    let grouped = group::group_tokens(&tokens)?;
    let normalized = implicit::insert_implicit_mul(grouped);
    resolve::resolve(normalized)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Strips spans so tests can compare structure without caring about exact offsets.
    #[derive(Debug, PartialEq)]
    enum Shape {
        Num(String),
        Name(String),
        Infix(OpKind, Vec<Shape>),
    }

    fn shape(expr: &Expr) -> Shape {
        match expr {
            Expr::Num(num) => Shape::Num(num.value.clone()),
            Expr::Name(sym) => Shape::Name(sym.name.clone()),
            Expr::Infix(infix) => Shape::Infix(
                infix.op.kind,
                infix.args.iter().map(shape).collect(),
            ),
        }
    }

    fn parse_shape(input: &str) -> Shape {
        shape(&parse(input).unwrap())
    }

    fn num(value: &str) -> Shape {
        Shape::Num(value.to_string())
    }

    fn name(value: &str) -> Shape {
        Shape::Name(value.to_string())
    }

    #[test]
    fn literal_num() {
        assert_eq!(parse_shape("16"), num("16"));
    }

    #[test]
    fn literal_float() {
        assert_eq!(parse_shape("3.14"), num("3.14"));
    }

    #[test]
    fn literal_symbol() {
        assert_eq!(parse_shape("asd"), name("asd"));
    }

    #[test]
    fn addition_left_nested() {
        assert_eq!(parse_shape("2+3+4"), Shape::Infix(OpKind::Add, vec![
            Shape::Infix(OpKind::Add, vec![num("2"), num("3")]),
            num("4"),
        ]));
    }

    #[test]
    fn multiplication_before_addition() {
        assert_eq!(parse_shape("a + b * c"), Shape::Infix(OpKind::Add, vec![
            name("a"),
            Shape::Infix(OpKind::Mul, vec![name("b"), name("c")]),
        ]));
    }

    #[test]
    fn division_before_multiplication() {
        assert_eq!(parse_shape("a * b / c"), Shape::Infix(OpKind::Mul, vec![
            name("a"),
            Shape::Infix(OpKind::Div, vec![name("b"), name("c")]),
        ]));
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(parse_shape("1 2 3"), Shape::Infix(OpKind::Mul, vec![
            Shape::Infix(OpKind::Mul, vec![num("1"), num("2")]),
            num("3"),
        ]));
    }

    #[test]
    fn implicit_multiplication_with_group() {
        assert_eq!(parse_shape("2(3 + 4)"), Shape::Infix(OpKind::Mul, vec![
            num("2"),
            Shape::Infix(OpKind::Add, vec![num("3"), num("4")]),
        ]));
    }

    #[test]
    fn implicit_operators_carry_an_empty_span() {
        let Expr::Infix(infix) = parse("a b").unwrap() else {
            panic!("expected an infix node");
        };
        assert_eq!(infix.op.kind, OpKind::Mul);
        assert!(infix.op.span.is_empty());
    }

    #[test]
    fn prefix_negation() {
        assert_eq!(parse_shape("-x"), Shape::Infix(OpKind::Neg, vec![name("x")]));
    }

    #[test]
    fn negation_resolves_before_addition() {
        assert_eq!(parse_shape("a + -b"), Shape::Infix(OpKind::Add, vec![
            name("a"),
            Shape::Infix(OpKind::Neg, vec![name("b")]),
        ]));
    }

    #[test]
    fn negation_resolves_before_multiplication() {
        // `-` binds tighter than `*`, so this is `(-a) * b`
        assert_eq!(parse_shape("-a * b"), Shape::Infix(OpKind::Mul, vec![
            Shape::Infix(OpKind::Neg, vec![name("a")]),
            name("b"),
        ]));
    }

    #[test]
    fn big_sum_keyword() {
        assert_eq!(parse_shape("sum(i n x)"), Shape::Infix(OpKind::BigSum, vec![
            Shape::Infix(OpKind::Mul, vec![
                Shape::Infix(OpKind::Mul, vec![name("i"), name("n")]),
                name("x"),
            ]),
        ]));
    }

    #[test]
    fn integral_keyword() {
        assert_eq!(parse_shape("int(0 1 x)"), Shape::Infix(OpKind::BigIntegral, vec![
            Shape::Infix(OpKind::Mul, vec![
                Shape::Infix(OpKind::Mul, vec![num("0"), num("1")]),
                name("x"),
            ]),
        ]));
    }

    #[test]
    fn bare_operator_is_an_error() {
        assert!(parse("+").is_err());
    }

    #[test]
    fn missing_after_operand() {
        assert!(parse("a +").is_err());
    }

    #[test]
    fn missing_before_operand() {
        assert!(parse("+ a").is_err());
    }

    #[test]
    fn doubled_operator() {
        assert!(parse("a + + b").is_err());
    }

    #[test]
    fn unconsumed_operands() {
        // `-` is prefix-only, so the group is left with `a` and `-b` side by side
        assert!(parse("a - b").is_err());
    }

    #[test]
    fn unbalanced_parentheses() {
        assert!(parse("(a + b").is_err());
    }
}
