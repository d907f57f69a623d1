//! Node model and rewrite engine for the braket formula language.
//!
//! The [`node`] module defines the typed, immutable expression tree produced by the parser
//! pipeline: a closed set of kinds, a static arity table checked at construction and at
//! deserialization, structural equivalence, numeric evaluation, and rendering.
//!
//! The [`rewrite`] module contains the structure-preserving transformations built on top of the
//! node model: numeric folding, sign extraction, distribution, factoring, term collection, peer
//! cancellation, complex-pair multiplication, macro expansion, and commutation-aware reordering
//! of operator products.

pub mod ctxt;
pub mod node;
pub mod rewrite;

pub use node::{Kind, Node, NodeError, NodeId};
