/// A rewrite step applied to an expression. Each variant corresponds to one rule family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A fully numeric subtree was replaced by its literal value.
    Fold,

    /// The numeric children of a sum or product were combined into one literal.
    PartialFold,

    /// A sign was pulled out of a subtree, e.g. `a * -b = -(a * b)`.
    MinusPullout,

    /// `a*(b+c) = a*b + a*c`
    Distribute,

    /// `a*b + a*c = a*(b+c)`
    FactorLeft,

    /// `b*a + c*a = (b+c)*a`
    FactorRight,

    /// Equivalent summands were merged, e.g. `2x + 3x = 5x`.
    Collect,

    /// Two selected peers cancelled each other.
    PeerCancel,

    /// A product of complex pairs was expanded into real and imaginary parts.
    ComplexMultiply,

    /// A macro node was replaced by its substituted output template.
    MacroExpand,

    /// An operator string was brought into canonical order.
    Reorder,
}
