pub mod token;

use braket_error::Error;
use crate::parser::error::kind;
use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer.
///
/// A fragment that cannot be classified as a number, identifier, reserved symbol, or function
/// keyword is a tokenization error pointing at the offending region.
pub fn tokenize_complete(input: &str) -> Result<Box<[Token]>, Error> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(kind) => tokens.push(Token {
                span: lexer.span(),
                kind,
                lexeme: lexer.slice(),
            }),
            Err(()) => {
                return Err(Error::new(
                    vec![lexer.span()],
                    kind::InvalidFragment {
                        fragment: lexer.slice().to_string(),
                    },
                ));
            },
        }
    }

    Ok(tokens.into_boxed_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn basic_expr() {
        compare_tokens(
            "1 + 2",
            [
                (TokenKind::Num, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Num, "2"),
            ],
        );
    }

    #[test]
    fn division_synonym() {
        compare_tokens(
            "a:b / c",
            [
                (TokenKind::Name, "a"),
                (TokenKind::Div, ":"),
                (TokenKind::Name, "b"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Div, "/"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Name, "c"),
            ],
        );
    }

    #[test]
    fn keyword_vs_identifier() {
        compare_tokens(
            "sum interval int",
            [
                (TokenKind::Sum, "sum"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Name, "interval"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Integral, "int"),
            ],
        );
    }

    #[test]
    fn unclassifiable_fragment() {
        let err = tokenize_complete("3 + $").unwrap_err();
        assert_eq!(err.spans, vec![4..5]);
    }
}
