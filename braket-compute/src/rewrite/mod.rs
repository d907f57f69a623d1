//! The rewrite engine: pure tree-to-tree transformations over the node model.
//!
//! Each rule is a function taking a reference to a node and a [`StepCollector`], returning
//! `Some(new_tree)` when the rule applies and [`None`] when it does not. Rewrites never fail on
//! a well-formed tree: an inapplicable rewrite (including the guarded no-ops in
//! [`distribute`] and [`reorder`]) is simply [`None`].

pub mod collect;
pub mod complex;
pub mod distribute;
pub mod factor;
pub mod fold;
pub mod macros;
pub mod peer;
pub mod reorder;
pub mod sign;
pub mod step;
pub mod step_collector;

pub use step::Step;
pub use step_collector::StepCollector;
