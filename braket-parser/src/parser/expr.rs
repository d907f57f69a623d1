use std::ops::Range;

/// A numeric literal, kept as the raw text it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct LitNum {
    /// The raw text of the number.
    pub value: String,

    /// The region of the source code that this literal originated from.
    pub span: Range<usize>,
}

/// An identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct LitSym {
    /// The name of the identifier.
    pub name: String,

    /// The region of the source code that this identifier originated from.
    pub span: Range<usize>,
}

/// The operation applied by an [`Infix`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Addition (`+`).
    Add,

    /// Multiplication (`*`), possibly inserted implicitly.
    Mul,

    /// Division (`/` or `:`).
    Div,

    /// Prefix negation (`-`).
    Neg,

    /// The `sum` binder keyword.
    BigSum,

    /// The `int` binder keyword.
    BigIntegral,
}

/// An operator attached to an [`Infix`] node.
#[derive(Debug, Clone, PartialEq)]
pub struct Op {
    /// The kind of operation.
    pub kind: OpKind,

    /// The region of the source code that this operator originated from. Multiplication
    /// operators inserted by the implicit-multiplication pass have an empty span at the
    /// insertion point.
    pub span: Range<usize>,
}

/// A resolved operator application. The before-arguments precede the after-arguments in `args`.
#[derive(Debug, Clone, PartialEq)]
pub struct Infix {
    /// The operator that produced this node.
    pub op: Op,

    /// The operands, in source order.
    pub args: Vec<Expr>,

    /// The region of the source code that this node originated from.
    pub span: Range<usize>,
}

/// A fully resolved expression, the output of the parser pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal.
    Num(LitNum),

    /// An identifier.
    Name(LitSym),

    /// A resolved operator application.
    Infix(Infix),
}

impl Expr {
    /// Returns the region of the source code that this expression originated from.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Num(num) => num.span.clone(),
            Expr::Name(sym) => sym.span.clone(),
            Expr::Infix(infix) => infix.span.clone(),
        }
    }
}
