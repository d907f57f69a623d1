//! The typed node model.
//!
//! A [`Node`] is an immutable tree element with a [`Kind`] tag from a closed set, a free-form
//! string payload, and an ordered list of children whose count is constrained by a static
//! per-kind arity table. Construction through [`Node::new`] and deserialization through
//! [`desc::NodeDesc`] both validate arity, so a well-formed tree can never carry an impossible
//! child count.
//!
//! Nodes are never mutated after construction. Algorithms that need local mutation first take an
//! explicitly owned working copy via [`Node::detached`], which also refreshes the identity of
//! every node in the copy so that no [`NodeId`] is ever aliased between two live trees.

pub mod builder;
pub mod desc;
pub mod order;
pub mod render;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// The distance under which two evaluated nodes are considered the same number.
pub const EQUIV_EPSILON: f64 = 1e-6;

/// The discriminant tag of a [`Node`], drawn from the closed algebraic vocabulary.
///
/// Every kind has a fixed arity range (see [`Kind::arity`]) and a fixed serialized tag (see
/// [`Kind::tag`]). Dispatch over kinds is always an exhaustive `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// A numeric literal. The payload is its decimal text.
    Num,

    /// A reference to a named variable. The payload is the name.
    Variable,

    /// A variable known to commute with every operator. The payload is the name.
    CommutableVariable,

    /// A named mathematical constant, such as `pi` or `e`.
    Constant,

    /// The imaginary unit `i`.
    ImaginaryUnit,

    /// A sum of two or more terms, rendered with surrounding brackets.
    BracketedSum,

    /// A product of two or more factors, rendered with surrounding brackets.
    BracketedMultiplication,

    /// A fraction with a numerator and a denominator.
    Fraction,

    /// The negation of its single child.
    Negation,

    /// A base raised to an exponent.
    Power,

    /// `e` raised to the single child.
    Exponential,

    Sin,
    Cos,
    Tan,

    /// A big-sum binder: index/lower bound, upper bound, and body.
    BigSum,

    /// A big-integral binder: lower bound, upper bound, and body.
    BigIntegral,

    /// A bra vector over its single child.
    Bra,

    /// A ket vector over its single child.
    Ket,

    /// An inner product of a bra child and a ket child.
    Braket,

    /// A matrix element: bra, operator, ket.
    Bracket,

    /// A fermionic creation operator. The payload is the degree of freedom.
    FermionicCreation,

    /// A fermionic annihilation operator. The payload is the degree of freedom.
    FermionicAnnihilation,

    /// A fermionic number operator. The payload is the degree of freedom.
    FermionicNumber,

    /// A bosonic creation operator. The payload is the degree of freedom.
    BosonicCreation,

    /// A bosonic annihilation operator. The payload is the degree of freedom.
    BosonicAnnihilation,

    /// A bosonic number operator. The payload is the degree of freedom.
    BosonicNumber,

    /// A hard-core-bosonic creation operator. The payload is the degree of freedom.
    HardCoreCreation,

    /// A hard-core-bosonic annihilation operator. The payload is the degree of freedom.
    HardCoreAnnihilation,

    /// A hard-core-bosonic number operator. The payload is the degree of freedom.
    HardCoreNumber,

    /// The commutator `[a, b]`.
    Commutator,

    /// The anticommutator `{a, b}`.
    AntiCommutator,

    /// A Kronecker delta over its two children. Equivalent under argument swap.
    KroneckerDelta,

    /// A complex number split into a real child and an imaginary child.
    ComplexPair,

    /// A structural container with no algebraic meaning of its own.
    Container,

    /// The equality relation between its two children.
    Equality,

    /// The less-than relation between its two children.
    Less,

    /// The greater-than relation between its two children.
    Greater,

    /// A marker for an intentionally empty argument slot.
    Empty,

    /// A leaf holding raw, uninterpreted LaTeX. The payload is the LaTeX text.
    RawLatex,

    /// A leaf holding plain text. The payload is the text.
    Str,

    /// A user-defined macro invocation. The payload is the trigger name; the children are the
    /// positional arguments.
    Macro,

    /// A numbered placeholder inside a macro output template. The payload is the argument index.
    PlaceHolder,
}

impl Kind {
    /// Returns the serialized tag of this kind, as it appears in the `type` field of the
    /// canonical node-description format.
    pub fn tag(self) -> &'static str {
        match self {
            Kind::Num => "num",
            Kind::Variable => "variable",
            Kind::CommutableVariable => "commutable_variable",
            Kind::Constant => "constant",
            Kind::ImaginaryUnit => "imaginary_unit",
            Kind::BracketedSum => "bracketed_sum",
            Kind::BracketedMultiplication => "bracketed_multiplication",
            Kind::Fraction => "fraction",
            Kind::Negation => "negation",
            Kind::Power => "power",
            Kind::Exponential => "exponential",
            Kind::Sin => "sin",
            Kind::Cos => "cos",
            Kind::Tan => "tan",
            Kind::BigSum => "big_sum",
            Kind::BigIntegral => "big_integral",
            Kind::Bra => "bra",
            Kind::Ket => "ket",
            Kind::Braket => "braket",
            Kind::Bracket => "bracket",
            Kind::FermionicCreation => "fermionic_creation",
            Kind::FermionicAnnihilation => "fermionic_annihilation",
            Kind::FermionicNumber => "fermionic_number",
            Kind::BosonicCreation => "bosonic_creation",
            Kind::BosonicAnnihilation => "bosonic_annihilation",
            Kind::BosonicNumber => "bosonic_number",
            Kind::HardCoreCreation => "hard_core_creation",
            Kind::HardCoreAnnihilation => "hard_core_annihilation",
            Kind::HardCoreNumber => "hard_core_number",
            Kind::Commutator => "commutator",
            Kind::AntiCommutator => "anti_commutator",
            Kind::KroneckerDelta => "kronecker_delta",
            Kind::ComplexPair => "complex_pair",
            Kind::Container => "container",
            Kind::Equality => "equality",
            Kind::Less => "less",
            Kind::Greater => "greater",
            Kind::Empty => "empty",
            Kind::RawLatex => "raw_latex",
            Kind::Str => "str",
            Kind::Macro => "macro",
            Kind::PlaceHolder => "place_holder",
        }
    }

    /// Returns the `(min, max)` child count of this kind. A `max` of [`None`] means unbounded.
    pub fn arity(self) -> (usize, Option<usize>) {
        match self {
            Kind::Num
            | Kind::Variable
            | Kind::CommutableVariable
            | Kind::Constant
            | Kind::ImaginaryUnit
            | Kind::FermionicCreation
            | Kind::FermionicAnnihilation
            | Kind::FermionicNumber
            | Kind::BosonicCreation
            | Kind::BosonicAnnihilation
            | Kind::BosonicNumber
            | Kind::HardCoreCreation
            | Kind::HardCoreAnnihilation
            | Kind::HardCoreNumber
            | Kind::Empty
            | Kind::RawLatex
            | Kind::Str
            | Kind::PlaceHolder => (0, Some(0)),
            Kind::Negation
            | Kind::Exponential
            | Kind::Sin
            | Kind::Cos
            | Kind::Tan
            | Kind::Bra
            | Kind::Ket => (1, Some(1)),
            Kind::Fraction
            | Kind::Power
            | Kind::Braket
            | Kind::Commutator
            | Kind::AntiCommutator
            | Kind::KroneckerDelta
            | Kind::ComplexPair
            | Kind::Equality
            | Kind::Less
            | Kind::Greater => (2, Some(2)),
            Kind::BigSum | Kind::BigIntegral | Kind::Bracket => (3, Some(3)),
            Kind::BracketedSum | Kind::BracketedMultiplication => (1, None),
            Kind::Container | Kind::Macro => (0, None),
        }
    }
}

/// An error produced by the node model itself, independent of any source code span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// A node was constructed or deserialized with a child count outside its kind's declared
    /// range.
    Arity {
        /// The serialized tag of the offending kind.
        kind: &'static str,

        /// The minimum number of children the kind accepts.
        min: usize,

        /// The maximum number of children the kind accepts, if bounded.
        max: Option<usize>,

        /// The number of children that were actually given.
        found: usize,
    },

    /// Recursive macro expansion exceeded the depth limit.
    MacroDepth {
        /// The trigger of the macro that was being expanded when the limit was hit.
        trigger: String,

        /// The depth limit.
        limit: usize,
    },

    /// A macro output template could not be parsed into a node tree.
    Template {
        /// The trigger of the macro the template belongs to.
        trigger: String,

        /// A description of the parse failure.
        message: String,
    },
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NodeError::Arity { kind, min, max, found } => match max {
                Some(max) if min == max => write!(
                    f,
                    "`{}` requires exactly {} children, but {} were given",
                    kind, min, found,
                ),
                Some(max) => write!(
                    f,
                    "`{}` requires between {} and {} children, but {} were given",
                    kind, min, max, found,
                ),
                None => write!(
                    f,
                    "`{}` requires at least {} children, but {} were given",
                    kind, min, found,
                ),
            },
            NodeError::MacroDepth { trigger, limit } => write!(
                f,
                "expanding `{}` exceeded the macro expansion depth limit of {}",
                trigger, limit,
            ),
            NodeError::Template { trigger, message } => write!(
                f,
                "the output template of `{}` is not a parseable formula: {}",
                trigger, message,
            ),
        }
    }
}

impl std::error::Error for NodeError {}

/// A process-unique identity token for one [`Node`].
///
/// Identity is used only for external addressing and batched edits; it never participates in
/// equivalence or structural equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Returns an identity never handed out before in this process.
    fn fresh() -> NodeId {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        NodeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable element of the expression tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) kind: Kind,
    pub(crate) value: String,
    pub(crate) children: Vec<Node>,
    pub(crate) id: NodeId,
}

/// Structural equality: same kind, same payload, structurally equal children. Identity is
/// ignored. For the looser algebraic comparison, see [`Node::equivalent`].
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.value == other.value && self.children == other.children
    }
}

impl Eq for Node {}

impl Node {
    /// Creates a new node, validating the child count against the kind's arity range.
    pub fn new(
        kind: Kind,
        value: impl Into<String>,
        children: Vec<Node>,
    ) -> Result<Node, NodeError> {
        let (min, max) = kind.arity();
        let found = children.len();
        if found < min || max.is_some_and(|max| found > max) {
            return Err(NodeError::Arity { kind: kind.tag(), min, max, found });
        }
        Ok(Node::raw(kind, value.into(), children))
    }

    /// Creates a node whose arity is already known to hold.
    fn raw(kind: Kind, value: String, children: Vec<Node>) -> Node {
        Node { kind, value, children, id: NodeId::fresh() }
    }

    /// Creates a node with the same kind and payload as `self` but the given children. The arity
    /// must already be known to hold.
    pub(crate) fn remade(&self, children: Vec<Node>) -> Node {
        Node::raw(self.kind, self.value.clone(), children)
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns an exclusively owned deep copy with a fresh identity at every node.
    ///
    /// This is the working copy any locally mutating algorithm must start from; it guarantees
    /// that no identity is shared between the copy and the original tree.
    pub fn detached(&self) -> Node {
        Node::raw(
            self.kind,
            self.value.clone(),
            self.children.iter().map(Node::detached).collect(),
        )
    }

    /// A numeric literal.
    pub fn num(value: impl Into<String>) -> Node {
        Node::raw(Kind::Num, value.into(), Vec::new())
    }

    /// A numeric literal from an evaluated value, formatted without a trailing `.0` when the
    /// value is integral.
    pub fn num_f64(value: f64) -> Node {
        Node::num(format_number(value))
    }

    /// A variable reference.
    pub fn variable(name: impl Into<String>) -> Node {
        Node::raw(Kind::Variable, name.into(), Vec::new())
    }

    /// A named constant, such as `pi` or `e`.
    pub fn constant(name: impl Into<String>) -> Node {
        Node::raw(Kind::Constant, name.into(), Vec::new())
    }

    /// The imaginary unit.
    pub fn imaginary_unit() -> Node {
        Node::raw(Kind::ImaginaryUnit, String::new(), Vec::new())
    }

    /// A sum of the given terms, downgraded when possible: an empty sum is the literal `0` and a
    /// one-term sum is the term itself.
    pub fn sum(mut terms: Vec<Node>) -> Node {
        match terms.len() {
            0 => Node::num("0"),
            1 => terms.remove(0),
            _ => Node::raw(Kind::BracketedSum, String::new(), terms),
        }
    }

    /// A product of the given factors, downgraded when possible: an empty product is the literal
    /// `1` and a one-factor product is the factor itself.
    pub fn product(mut factors: Vec<Node>) -> Node {
        match factors.len() {
            0 => Node::num("1"),
            1 => factors.remove(0),
            _ => Node::raw(Kind::BracketedMultiplication, String::new(), factors),
        }
    }

    /// The negation of the given node.
    pub fn negation(child: Node) -> Node {
        Node::raw(Kind::Negation, String::new(), vec![child])
    }

    /// A fraction.
    pub fn fraction(numerator: Node, denominator: Node) -> Node {
        Node::raw(Kind::Fraction, String::new(), vec![numerator, denominator])
    }

    /// A power.
    pub fn power(base: Node, exponent: Node) -> Node {
        Node::raw(Kind::Power, String::new(), vec![base, exponent])
    }

    /// A Kronecker delta over the two given arguments.
    pub fn delta(left: Node, right: Node) -> Node {
        Node::raw(Kind::KroneckerDelta, String::new(), vec![left, right])
    }

    /// A complex pair with the given real and imaginary parts.
    pub fn complex_pair(real: Node, imaginary: Node) -> Node {
        Node::raw(Kind::ComplexPair, String::new(), vec![real, imaginary])
    }

    /// A big-sum binder with its three positional slots.
    pub fn big_sum(slots: [Node; 3]) -> Node {
        Node::raw(Kind::BigSum, String::new(), slots.into())
    }

    /// A big-integral binder with its three positional slots.
    pub fn big_integral(slots: [Node; 3]) -> Node {
        Node::raw(Kind::BigIntegral, String::new(), slots.into())
    }

    /// A ladder or number operator of the given kind acting on the given degree of freedom.
    ///
    /// Only the nine creation/annihilation/number kinds are meaningful here; the arity table
    /// still applies, so this is restricted to leaf kinds.
    pub fn ladder(kind: Kind, dof: impl Into<String>) -> Node {
        debug_assert_eq!(kind.arity(), (0, Some(0)));
        Node::raw(kind, dof.into(), Vec::new())
    }

    /// The empty-argument marker.
    pub fn empty() -> Node {
        Node::raw(Kind::Empty, String::new(), Vec::new())
    }

    /// A macro-argument placeholder with the given index.
    pub fn placeholder(index: usize) -> Node {
        Node::raw(Kind::PlaceHolder, index.to_string(), Vec::new())
    }

    /// Returns true if this node is the numeric literal for the given value.
    pub fn is_num(&self, value: f64) -> bool {
        self.kind == Kind::Num
            && self.value.parse::<f64>().is_ok_and(|v| (v - value).abs() <= EQUIV_EPSILON)
    }

    /// Evaluates this node to a number, bottom-up from its children.
    ///
    /// Returns [`None`] when the node has no numeric meaning or when a required child is
    /// unknown. A product short-circuits to `0` as soon as any factor evaluates to `0`,
    /// regardless of the other factors.
    pub fn evaluate(&self) -> Option<f64> {
        match self.kind {
            Kind::Num => self.value.parse().ok(),
            Kind::Constant => match self.value.as_str() {
                "pi" => Some(std::f64::consts::PI),
                "e" => Some(std::f64::consts::E),
                _ => None,
            },
            Kind::BracketedSum => self.children.iter().map(Node::evaluate).sum(),
            Kind::BracketedMultiplication => {
                let factors = self.children.iter().map(Node::evaluate).collect::<Vec<_>>();
                if factors.iter().flatten().any(|&v| v == 0.0) {
                    return Some(0.0);
                }
                factors.into_iter().product()
            },
            Kind::Fraction => {
                let denominator = self.children[1].evaluate()?;
                if denominator == 0.0 {
                    None
                } else {
                    Some(self.children[0].evaluate()? / denominator)
                }
            },
            Kind::Negation => self.children[0].evaluate().map(|v| -v),
            Kind::Power => {
                let base = self.children[0].evaluate()?;
                let exponent = self.children[1].evaluate()?;
                Some(base.powf(exponent))
            },
            Kind::Exponential => self.children[0].evaluate().map(f64::exp),
            Kind::Sin => self.children[0].evaluate().map(f64::sin),
            Kind::Cos => self.children[0].evaluate().map(f64::cos),
            Kind::Tan => self.children[0].evaluate().map(f64::tan),
            Kind::KroneckerDelta => {
                let (left, right) = (&self.children[0], &self.children[1]);
                if left.equivalent(right) {
                    Some(1.0)
                } else if let (Some(a), Some(b)) = (left.evaluate(), right.evaluate()) {
                    Some(if (a - b).abs() <= EQUIV_EPSILON { 1.0 } else { 0.0 })
                } else {
                    None
                }
            },
            Kind::ComplexPair => {
                let imaginary = self.children[1].evaluate()?;
                if imaginary == 0.0 {
                    self.children[0].evaluate()
                } else {
                    None
                }
            },
            _ => None,
        }
    }

    /// Returns true if this node is algebraically equivalent to `other`.
    ///
    /// When both nodes evaluate to a number, equivalence is agreement within
    /// [`EQUIV_EPSILON`]. Otherwise the nodes must have the same kind, the same payload, and
    /// pairwise-equivalent children in order. Kronecker deltas are additionally equivalent under
    /// argument swap. Identity never participates.
    pub fn equivalent(&self, other: &Node) -> bool {
        if let (Some(a), Some(b)) = (self.evaluate(), other.evaluate()) {
            return (a - b).abs() <= EQUIV_EPSILON;
        }

        if self.kind != other.kind || self.value != other.value {
            return false;
        }

        if self.kind == Kind::KroneckerDelta {
            let (a, b) = (&self.children[0], &self.children[1]);
            let (c, d) = (&other.children[0], &other.children[1]);
            return (a.equivalent(c) && b.equivalent(d)) || (a.equivalent(d) && b.equivalent(c));
        }

        self.children.len() == other.children.len()
            && self.children.iter()
                .zip(&other.children)
                .all(|(a, b)| a.equivalent(b))
    }
}

/// Formats an evaluated value as a literal payload, dropping the fractional part when the value
/// is integral.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn arity_is_validated() {
        let err = Node::new(Kind::Fraction, "", vec![Node::num("1")]).unwrap_err();
        assert_eq!(err, NodeError::Arity {
            kind: "fraction",
            min: 2,
            max: Some(2),
            found: 1,
        });
    }

    #[test]
    fn sum_downgrades() {
        assert_eq!(Node::sum(vec![]), Node::num("0"));
        assert_eq!(Node::sum(vec![Node::variable("x")]), Node::variable("x"));
        assert_eq!(
            Node::sum(vec![Node::variable("x"), Node::num("2")]).kind(),
            Kind::BracketedSum,
        );
    }

    #[test]
    fn product_zero_short_circuit() {
        // the variable is unknown, but the zero factor decides the product
        let product = Node::product(vec![Node::num("0"), Node::variable("x")]);
        assert_eq!(product.evaluate(), Some(0.0));
    }

    #[test]
    fn constants_evaluate() {
        assert_float_absolute_eq!(
            Node::constant("pi").evaluate().unwrap(),
            std::f64::consts::PI
        );
        assert_eq!(Node::variable("pi_ish").evaluate(), None);
    }

    #[test]
    fn numeric_equivalence_within_epsilon() {
        let sum = Node::sum(vec![Node::num("2"), Node::num("2")]);
        assert!(sum.equivalent(&Node::num("4")));
        assert!(!sum.equivalent(&Node::num("4.001")));
    }

    #[test]
    fn delta_is_swap_symmetric() {
        let ab = Node::delta(Node::variable("a"), Node::variable("b"));
        let ba = Node::delta(Node::variable("b"), Node::variable("a"));
        assert!(ab.equivalent(&ba));

        let ac = Node::delta(Node::variable("a"), Node::variable("c"));
        assert!(!ab.equivalent(&ac));
    }

    #[test]
    fn same_dof_delta_evaluates_to_one() {
        let delta = Node::delta(Node::variable("i"), Node::variable("i"));
        assert_eq!(delta.evaluate(), Some(1.0));
    }

    #[test]
    fn detached_refreshes_identity() {
        let original = Node::sum(vec![Node::variable("x"), Node::num("1")]);
        let copy = original.detached();
        assert_eq!(original, copy);
        assert_ne!(original.id(), copy.id());
        assert_ne!(original.children()[0].id(), copy.children()[0].id());
    }
}
