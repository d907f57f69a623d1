//! Rendering of node trees to display text.
//!
//! Every kind has a fixed template: a prefix, an inter-child separator, and a suffix. The only
//! dynamic part is separator elision: in sums and products the separator before a negation child
//! is dropped, since the negation already renders its own leading `-`. A sum or product whose
//! every separator was elided also drops its surrounding brackets.

use std::fmt;
use super::{Kind, Node};

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            Kind::Num | Kind::Str => write!(f, "{}", self.value),
            Kind::Variable | Kind::CommutableVariable => write!(f, "{{{}}}", self.value),
            Kind::Constant => match self.value.as_str() {
                "pi" => write!(f, "\\pi"),
                other => write!(f, "{}", other),
            },
            Kind::ImaginaryUnit => write!(f, "i"),
            Kind::BracketedSum => write_chain(f, &self.children, " + "),
            Kind::BracketedMultiplication => write_chain(f, &self.children, " * "),
            Kind::Fraction => write!(f, "\\frac{{{}}}{{{}}}", self.children[0], self.children[1]),
            Kind::Negation => write!(f, "-{}", self.children[0]),
            Kind::Power => write!(f, "{{{}}}^{{{}}}", self.children[0], self.children[1]),
            Kind::Exponential => write!(f, "e^{{{}}}", self.children[0]),
            Kind::Sin => write!(f, "\\sin({})", self.children[0]),
            Kind::Cos => write!(f, "\\cos({})", self.children[0]),
            Kind::Tan => write!(f, "\\tan({})", self.children[0]),
            Kind::BigSum => write!(
                f,
                "\\sum_{{{}}}^{{{}}} {}",
                self.children[0], self.children[1], self.children[2],
            ),
            Kind::BigIntegral => write!(
                f,
                "\\int_{{{}}}^{{{}}} {}",
                self.children[0], self.children[1], self.children[2],
            ),
            Kind::Bra => write!(f, "\\langle {}|", self.children[0]),
            Kind::Ket => write!(f, "|{}\\rangle", self.children[0]),
            Kind::Braket => write!(f, "\\langle {}|{}\\rangle", self.children[0], self.children[1]),
            Kind::Bracket => write!(
                f,
                "\\langle {}|{}|{}\\rangle",
                self.children[0], self.children[1], self.children[2],
            ),
            Kind::FermionicCreation => write!(f, "c^{{\\dagger}}_{{{}}}", self.value),
            Kind::FermionicAnnihilation => write!(f, "c_{{{}}}", self.value),
            Kind::FermionicNumber => write!(f, "n^{{c}}_{{{}}}", self.value),
            Kind::BosonicCreation => write!(f, "a^{{\\dagger}}_{{{}}}", self.value),
            Kind::BosonicAnnihilation => write!(f, "a_{{{}}}", self.value),
            Kind::BosonicNumber => write!(f, "n^{{a}}_{{{}}}", self.value),
            Kind::HardCoreCreation => write!(f, "\\sigma^{{+}}_{{{}}}", self.value),
            Kind::HardCoreAnnihilation => write!(f, "\\sigma^{{-}}_{{{}}}", self.value),
            Kind::HardCoreNumber => write!(f, "n^{{\\sigma}}_{{{}}}", self.value),
            Kind::Commutator => write!(f, "[{}, {}]", self.children[0], self.children[1]),
            Kind::AntiCommutator => write!(f, "\\{{{}, {}\\}}", self.children[0], self.children[1]),
            Kind::KroneckerDelta => write!(
                f,
                "\\delta_{{{},{}}}",
                self.children[0], self.children[1],
            ),
            Kind::ComplexPair => write!(
                f,
                "({} + i {})",
                self.children[0], self.children[1],
            ),
            Kind::Container => {
                for (index, child) in self.children.iter().enumerate() {
                    if index > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", child)?;
                }
                Ok(())
            },
            Kind::Equality => write!(f, "{} = {}", self.children[0], self.children[1]),
            Kind::Less => write!(f, "{} < {}", self.children[0], self.children[1]),
            Kind::Greater => write!(f, "{} > {}", self.children[0], self.children[1]),
            Kind::Empty => write!(f, "\\square"),
            Kind::RawLatex => write!(f, "{}", self.value),
            Kind::Macro => {
                write!(f, "{}", self.value)?;
                for child in &self.children {
                    write!(f, "{{{}}}", child)?;
                }
                Ok(())
            },
            Kind::PlaceHolder => write!(f, "#{}", self.value),
        }
    }
}

/// Writes a bracketed chain of children with the given separator, eliding the separator before
/// negation children. When every separator is elided, the brackets are dropped too.
fn write_chain(f: &mut fmt::Formatter, children: &[Node], separator: &str) -> fmt::Result {
    let all_elided = children.len() > 1
        && children.iter().skip(1).all(|child| child.kind == Kind::Negation);

    if !all_elided {
        write!(f, "(")?;
    }
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            if child.kind == Kind::Negation {
                write!(f, " ")?;
            } else {
                write!(f, "{}", separator)?;
            }
        }
        write!(f, "{}", child)?;
    }
    if !all_elided {
        write!(f, ")")?;
    }
    Ok(())
}
