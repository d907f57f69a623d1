//! The bracket grouper: partitions the flat token sequence into a tree of groups at parenthesis
//! boundaries.
//!
//! The grouper validates that opening and closing parentheses balance before descending, so the
//! recursion below never runs off the end of the token list. Groups containing exactly one
//! element are collapsed into that element, and empty groups are a hard error.

use braket_error::Error;
use crate::tokenizer::{Token, TokenKind};
use std::ops::Range;
use super::error::kind;

/// A node in the group tree: either a single non-parenthesis token, or the contents of a
/// parenthesized region.
#[derive(Debug, Clone, PartialEq)]
pub enum Group<'source> {
    /// A single token.
    Token(Token<'source>),

    /// A parenthesized run of groups. The top-level formula is also represented as one of these,
    /// spanning the whole source.
    Paren {
        /// The elements of the group, in source order.
        elems: Vec<Group<'source>>,

        /// The region of the source code covered by the group, including its parentheses.
        span: Range<usize>,
    },
}

impl Group<'_> {
    /// Returns the region of the source code covered by this group.
    pub fn span(&self) -> Range<usize> {
        match self {
            Group::Token(token) => token.span.clone(),
            Group::Paren { span, .. } => span.clone(),
        }
    }

    /// Returns true if the group produces a value on its own: a number, an identifier, or a
    /// nested group.
    pub fn is_value(&self) -> bool {
        match self {
            Group::Token(token) => token.kind.is_value(),
            Group::Paren { .. } => true,
        }
    }
}

/// Partitions the given tokens (whitespace already removed) into a group tree.
pub fn group_tokens<'source>(tokens: &[Token<'source>]) -> Result<Group<'source>, Error> {
    let open = tokens.iter().filter(|token| token.kind == TokenKind::OpenParen).count();
    let close = tokens.iter().filter(|token| token.kind == TokenKind::CloseParen).count();
    let span = match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => first.span.start..last.span.end,
        _ => 0..0,
    };
    if open != close {
        return Err(Error::new(vec![span], kind::UnbalancedParens { open, close }));
    }
    let (elems, rest) = group_run(tokens)?;

    // equal counts do not guarantee proper nesting, e.g. `)(`
    if !rest.is_empty() {
        return Err(Error::new(vec![span], kind::UnbalancedParens { open, close }));
    }

    if elems.is_empty() {
        return Err(Error::new(vec![span], kind::EmptyGroup));
    }

    Ok(collapse(elems, span))
}

/// Collapses a singleton group into its only element.
fn collapse(mut elems: Vec<Group>, span: Range<usize>) -> Group {
    if elems.len() == 1 {
        elems.remove(0)
    } else {
        Group::Paren { elems, span }
    }
}

/// Consumes tokens until an unmatched closing parenthesis or the end of the input, returning the
/// collected groups and the remaining tokens (starting at the unmatched closing parenthesis, if
/// any).
fn group_run<'source, 'tokens>(
    mut tokens: &'tokens [Token<'source>],
) -> Result<(Vec<Group<'source>>, &'tokens [Token<'source>]), Error> {
    let mut elems = Vec::new();

    while let Some(token) = tokens.first() {
        match token.kind {
            TokenKind::OpenParen => {
                let open_span = token.span.clone();
                let (inner, rest) = group_run(&tokens[1..])?;

                // the count check in `group_tokens` guarantees `rest` starts with the matching
                // closing parenthesis
                let close = &rest[0];
                let span = open_span.start..close.span.end;
                if inner.is_empty() {
                    return Err(Error::new(vec![span], kind::EmptyGroup));
                }

                elems.push(collapse(inner, span));
                tokens = &rest[1..];
            },
            TokenKind::CloseParen => return Ok((elems, tokens)),
            _ => {
                elems.push(Group::Token(token.clone()));
                tokens = &tokens[1..];
            },
        }
    }

    Ok((elems, tokens))
}

#[cfg(test)]
mod tests {
    use crate::tokenizer::tokenize_complete;
    use pretty_assertions::assert_eq;
    use super::*;

    fn group(input: &str) -> Result<Group, Error> {
        let tokens = tokenize_complete(input).unwrap();
        let tokens = tokens.iter()
            .filter(|token| !token.is_whitespace())
            .cloned()
            .collect::<Vec<_>>();
        group_tokens(&tokens)
    }

    #[test]
    fn singleton_collapse() {
        // `((x))` collapses to the bare identifier token
        let grouped = group("((x))").unwrap();
        assert_eq!(grouped, Group::Token(Token {
            span: 2..3,
            kind: TokenKind::Name,
            lexeme: "x",
        }));
    }

    #[test]
    fn nested_groups() {
        let grouped = group("a (b c)").unwrap();
        let Group::Paren { elems, span } = grouped else {
            panic!("expected a top-level group");
        };
        assert_eq!(span, 0..7);
        assert_eq!(elems.len(), 2);
        assert!(matches!(&elems[0], Group::Token(token) if token.lexeme == "a"));
        assert!(matches!(&elems[1], Group::Paren { elems, .. } if elems.len() == 2));
    }

    #[test]
    fn unbalanced() {
        let err = group("(a + b").unwrap_err();
        assert_eq!(err.spans, vec![0..6]);
    }

    #[test]
    fn empty_group() {
        assert!(group("a ()").is_err());
        assert!(group("").is_err());
    }
}
