//! The precedence resolver: converts each flat group into a strictly nested infix tree.
//!
//! Every operator token carries a static `(precedence, before, after)` triple declaring how many
//! operands it consumes on each side. The resolver repeatedly picks the leftmost operator with
//! the highest precedence in the flat element list, consumes exactly the declared operand counts
//! around it, and replaces the consumed span with a single resolved node. A flat group must
//! reduce to exactly one element.
//!
//! This is a single precedence class rather than classic precedence climbing: the bracket
//! grouper has already encoded all parenthesis structure, so only one flat list is resolved per
//! group level.

use braket_error::Error;
use crate::tokenizer::{Token, TokenKind};
use super::{
    error::kind,
    expr::{Expr, Infix, LitNum, LitSym, Op, OpKind},
    group::Group,
};

/// The static resolution table entry for an operator token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpInfo {
    /// The canonical symbol of the operator, used in error messages.
    pub symbol: &'static str,

    /// The kind of infix node the operator resolves to.
    pub kind: OpKind,

    /// The precedence of the operator; higher precedences resolve first.
    pub precedence: u16,

    /// The number of operands consumed before the operator.
    pub before: usize,

    /// The number of operands consumed after the operator.
    pub after: usize,
}

/// Returns the resolution table entry for the given token kind, or [`None`] if the token is not
/// an operator.
pub fn op_info(kind: TokenKind) -> Option<OpInfo> {
    match kind {
        TokenKind::Add => Some(OpInfo { symbol: "+", kind: OpKind::Add, precedence: 1, before: 1, after: 1 }),
        TokenKind::Mul => Some(OpInfo { symbol: "*", kind: OpKind::Mul, precedence: 100, before: 1, after: 1 }),
        TokenKind::Div => Some(OpInfo { symbol: "/", kind: OpKind::Div, precedence: 101, before: 1, after: 1 }),
        TokenKind::Sub => Some(OpInfo { symbol: "-", kind: OpKind::Neg, precedence: 500, before: 0, after: 1 }),
        TokenKind::Sum => Some(OpInfo { symbol: "sum", kind: OpKind::BigSum, precedence: 1000, before: 0, after: 1 }),
        TokenKind::Integral => Some(OpInfo { symbol: "int", kind: OpKind::BigIntegral, precedence: 1000, before: 0, after: 1 }),
        _ => None,
    }
}

/// An element of the flat list being resolved: either an already-resolved expression or a pending
/// operator token.
#[derive(Debug)]
enum Slot<'source> {
    Value(Expr),
    Op(Token<'source>, OpInfo),
}

/// Resolves a group tree into an expression.
pub fn resolve(group: Group) -> Result<Expr, Error> {
    match group {
        Group::Token(token) => resolve_token(token),
        Group::Paren { elems, span } => {
            let mut slots = Vec::with_capacity(elems.len());
            for elem in elems {
                match elem {
                    Group::Token(token) => match op_info(token.kind) {
                        Some(info) => slots.push(Slot::Op(token, info)),
                        None => slots.push(Slot::Value(resolve_token(token)?)),
                    },
                    elem => slots.push(Slot::Value(resolve(elem)?)),
                }
            }

            while let Some(idx) = next_op(&slots) {
                reduce(&mut slots, idx)?;
            }

            match slots.len() {
                1 => match slots.remove(0) {
                    Slot::Value(expr) => Ok(expr),
                    Slot::Op(..) => unreachable!("`next_op` leaves no operator slots behind"),
                },
                count => Err(Error::new(vec![span], kind::UnconsumedOperands { count })),
            }
        },
    }
}

/// Resolves a bare token outside any group. Operator tokens are an error here: they have no
/// group to supply their operands.
fn resolve_token(token: Token) -> Result<Expr, Error> {
    match token.kind {
        TokenKind::Num => Ok(Expr::Num(LitNum {
            value: token.lexeme.to_string(),
            span: token.span,
        })),
        TokenKind::Name => Ok(Expr::Name(LitSym {
            name: token.lexeme.to_string(),
            span: token.span,
        })),
        _ => Err(Error::new(
            vec![token.span.clone()],
            kind::BareOperator { op: token.lexeme.to_string() },
        )),
    }
}

/// Returns the index of the leftmost operator slot with the highest precedence, or [`None`] if no
/// operator slots remain.
fn next_op(slots: &[Slot]) -> Option<usize> {
    let mut best: Option<(usize, u16)> = None;
    for (idx, slot) in slots.iter().enumerate() {
        if let Slot::Op(_, info) = slot {
            match best {
                Some((_, precedence)) if precedence >= info.precedence => (),
                _ => best = Some((idx, info.precedence)),
            }
        }
    }
    best.map(|(idx, _)| idx)
}

/// Resolves the operator at `idx`, replacing it and its consumed operands with a single resolved
/// slot.
fn reduce(slots: &mut Vec<Slot>, idx: usize) -> Result<(), Error> {
    let (token_span, info) = match &slots[idx] {
        Slot::Op(token, info) => (token.span.clone(), *info),
        Slot::Value(_) => unreachable!("`next_op` only returns operator slots"),
    };

    let before_avail = slots[..idx].iter()
        .rev()
        .take_while(|slot| matches!(slot, Slot::Value(_)))
        .count()
        .min(info.before);
    if before_avail < info.before {
        return Err(Error::new(vec![token_span], kind::MissingOperand {
            op: info.symbol,
            needed: info.before,
            found: before_avail,
            before: true,
        }));
    }

    let after_avail = slots[idx + 1..].iter()
        .take_while(|slot| matches!(slot, Slot::Value(_)))
        .count()
        .min(info.after);
    if after_avail < info.after {
        return Err(Error::new(vec![token_span], kind::MissingOperand {
            op: info.symbol,
            needed: info.after,
            found: after_avail,
            before: false,
        }));
    }

    let start = idx - info.before;
    let args = slots.splice(start..=idx + info.after, std::iter::empty())
        .filter_map(|slot| match slot {
            Slot::Value(expr) => Some(expr),
            Slot::Op(..) => None,
        })
        .collect::<Vec<_>>();

    let span_start = args.first().map_or(token_span.start, |arg| arg.span().start.min(token_span.start));
    let span_end = args.last().map_or(token_span.end, |arg| arg.span().end.max(token_span.end));

    slots.insert(start, Slot::Value(Expr::Infix(Infix {
        op: Op {
            kind: info.kind,
            span: token_span,
        },
        args,
        span: span_start..span_end,
    })));

    Ok(())
}
