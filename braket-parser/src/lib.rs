//! Parser for the braket formula language.
//!
//! The language is a small, fixed grammar for physics formulas: numbers, identifiers, the
//! operators `+ - * / :` (`/` and `:` are synonymous), parentheses, and the function keywords
//! `sum` and `int`. Multiplication between two adjacent value-producing elements is implicit.
//!
//! Parsing is staged: the [`tokenizer`] produces a flat token sequence, and the [`parser`] runs
//! it through bracket grouping, implicit-multiplication insertion, and precedence resolution,
//! producing a [`parser::Expr`] tree with byte spans into the source.

pub mod parser;
pub mod tokenizer;
