//! The implicit-multiplication inserter.
//!
//! Whenever two value-producing elements (numbers, identifiers, nested groups) appear next to
//! each other with no operator between them, a multiplication token is spliced in between. The
//! pass runs bottom-up, so nested groups are already normalized by the time their parent is
//! walked.

use crate::tokenizer::{Token, TokenKind};
use super::group::Group;

/// Inserts implicit multiplication tokens throughout the group tree.
pub fn insert_implicit_mul(group: Group) -> Group {
    match group {
        Group::Token(_) => group,
        Group::Paren { elems, span } => {
            let elems = elems.into_iter()
                .map(insert_implicit_mul)
                .collect::<Vec<_>>();

            let mut spliced = Vec::with_capacity(elems.len());
            for elem in elems {
                if let Some(last) = spliced.last() {
                    if Group::is_value(last) && elem.is_value() {
                        let gap = last.span().end;
                        spliced.push(Group::Token(Token {
                            span: gap..gap,
                            kind: TokenKind::Mul,
                            lexeme: "*",
                        }));
                    }
                }
                spliced.push(elem);
            }

            Group::Paren { elems: spliced, span }
        },
    }
}
