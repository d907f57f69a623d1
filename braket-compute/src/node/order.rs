//! The Orderable capability: sort keys and pairwise commutation rules.
//!
//! Factors inside a product are canonically ordered by a fixed class rank, with ties broken by
//! the degree-of-freedom name (for ladder operators) or the payload (for everything else).
//! Swapping two adjacent factors is not always free: [`commute`] encodes which pairs flip the
//! sign and which pairs spawn extra additive correction terms.

use super::{Kind, Node};

/// The primary ordering bucket of an orderable factor. Variants are declared in canonical order,
/// so the derived [`Ord`] is the class rank.
///
/// Within each ladder family the canonical order is creation, then annihilation, then number,
/// i.e. normal ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OrderClass {
    Numeric,
    ImaginaryUnit,
    Constant,
    CommutableVariable,
    Variable,
    Macro,
    FermionicCreation,
    FermionicAnnihilation,
    FermionicNumber,
    BosonicCreation,
    BosonicAnnihilation,
    BosonicNumber,
    HardCoreCreation,
    HardCoreAnnihilation,
    HardCoreNumber,
    Delta,
}

/// The sortable key of an orderable factor: its class, then a same-class tiebreaker. For ladder
/// operators the tiebreaker is the degree-of-freedom name.
pub type OrderKey = (OrderClass, String);

/// Returns the sort key of a factor, or [`None`] when the factor is not orderable. A
/// non-orderable factor breaks an operator string; it is never reordered against its neighbors.
pub fn order_key(node: &Node) -> Option<OrderKey> {
    let class = match node.kind() {
        Kind::Num => OrderClass::Numeric,
        Kind::ImaginaryUnit => OrderClass::ImaginaryUnit,
        Kind::Constant => OrderClass::Constant,
        Kind::CommutableVariable => OrderClass::CommutableVariable,
        Kind::Variable => OrderClass::Variable,
        Kind::Macro => OrderClass::Macro,
        Kind::FermionicCreation => OrderClass::FermionicCreation,
        Kind::FermionicAnnihilation => OrderClass::FermionicAnnihilation,
        Kind::FermionicNumber => OrderClass::FermionicNumber,
        Kind::BosonicCreation => OrderClass::BosonicCreation,
        Kind::BosonicAnnihilation => OrderClass::BosonicAnnihilation,
        Kind::BosonicNumber => OrderClass::BosonicNumber,
        Kind::HardCoreCreation => OrderClass::HardCoreCreation,
        Kind::HardCoreAnnihilation => OrderClass::HardCoreAnnihilation,
        Kind::HardCoreNumber => OrderClass::HardCoreNumber,
        Kind::KroneckerDelta => OrderClass::Delta,
        _ => return None,
    };

    let tiebreaker = match node.kind() {
        // a delta has no payload; its arguments decide ties
        Kind::KroneckerDelta => format!("{},{}", node.children()[0], node.children()[1]),
        _ => node.value().to_string(),
    };

    Some((class, tiebreaker))
}

/// One way of rewriting an adjacent out-of-order pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CommuteAlternative {
    /// Whether this alternative carries a sign flip.
    pub negate: bool,

    /// The factors replacing the original pair.
    pub factors: Vec<Node>,
}

impl CommuteAlternative {
    fn new(negate: bool, factors: Vec<Node>) -> CommuteAlternative {
        CommuteAlternative { negate, factors }
    }
}

/// Returns true if the two factors are a creation/annihilation pair of the given family, in
/// either order, acting on the same degree of freedom.
fn same_dof_ladder_pair(left: &Node, right: &Node, creation: Kind, annihilation: Kind) -> bool {
    let kinds = (left.kind(), right.kind());
    (kinds == (creation, annihilation) || kinds == (annihilation, creation))
        && left.value() == right.value()
}

/// Commutes two adjacent factors, returning the swapped pair and any extra additive terms.
///
/// The first element is always the swapped pair with its own sign flip; the remaining
/// alternatives are correction terms that replace the pair entirely.
///
/// - Two fermionic ladder operators anti-commute. A same-dof creation/annihilation pair also
///   emits a Kronecker delta.
/// - A same-dof bosonic creation/annihilation pair swaps without a sign flip and emits a
///   Kronecker delta.
/// - A same-dof hard-core pair anti-commutes and emits both a delta and a doubled delta-number
///   correction.
/// - Every other pairing is a plain swap.
pub fn commute(left: &Node, right: &Node) -> (CommuteAlternative, Vec<CommuteAlternative>) {
    let swapped = |negate| CommuteAlternative::new(negate, vec![right.detached(), left.detached()]);
    let dof_delta = || Node::delta(Node::variable(left.value()), Node::variable(right.value()));

    let fermionic = [Kind::FermionicCreation, Kind::FermionicAnnihilation];
    if fermionic.contains(&left.kind()) && fermionic.contains(&right.kind()) {
        let extras = if same_dof_ladder_pair(
            left,
            right,
            Kind::FermionicCreation,
            Kind::FermionicAnnihilation,
        ) {
            vec![CommuteAlternative::new(false, vec![dof_delta()])]
        } else {
            Vec::new()
        };
        return (swapped(true), extras);
    }

    if same_dof_ladder_pair(left, right, Kind::BosonicCreation, Kind::BosonicAnnihilation) {
        return (
            swapped(false),
            vec![CommuteAlternative::new(false, vec![dof_delta()])],
        );
    }

    if same_dof_ladder_pair(left, right, Kind::HardCoreCreation, Kind::HardCoreAnnihilation) {
        return (swapped(true), vec![
            CommuteAlternative::new(false, vec![dof_delta()]),
            CommuteAlternative::new(true, vec![
                Node::num("2"),
                dof_delta(),
                Node::ladder(Kind::HardCoreNumber, left.value()),
            ]),
        ]);
    }

    (swapped(false), Vec::new())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn class_rank_is_the_declaration_order()  {
        assert!(OrderClass::Numeric < OrderClass::Variable);
        assert!(OrderClass::Variable < OrderClass::FermionicCreation);
        assert!(OrderClass::FermionicCreation < OrderClass::FermionicAnnihilation);
        assert!(OrderClass::HardCoreNumber < OrderClass::Delta);
    }

    #[test]
    fn non_orderable_factors_have_no_key() {
        assert_eq!(order_key(&Node::power(Node::variable("x"), Node::num("2"))), None);
        assert!(order_key(&Node::variable("x")).is_some());
    }

    #[test]
    fn fermionic_pairs_anticommute() {
        let (swap, extras) = commute(
            &Node::ladder(Kind::FermionicCreation, "i"),
            &Node::ladder(Kind::FermionicCreation, "j"),
        );
        assert!(swap.negate);
        assert_eq!(swap.factors[0], Node::ladder(Kind::FermionicCreation, "j"));
        assert!(extras.is_empty());
    }

    #[test]
    fn same_dof_fermionic_pair_emits_a_delta() {
        let (swap, extras) = commute(
            &Node::ladder(Kind::FermionicAnnihilation, "i"),
            &Node::ladder(Kind::FermionicCreation, "i"),
        );
        assert!(swap.negate);
        assert_eq!(extras.len(), 1);
        assert!(!extras[0].negate);
        assert_eq!(
            extras[0].factors,
            vec![Node::delta(Node::variable("i"), Node::variable("i"))],
        );
    }

    #[test]
    fn bosonic_pair_commutes_with_a_delta() {
        let (swap, extras) = commute(
            &Node::ladder(Kind::BosonicAnnihilation, "k"),
            &Node::ladder(Kind::BosonicCreation, "k"),
        );
        assert!(!swap.negate);
        assert_eq!(extras.len(), 1);
    }

    #[test]
    fn hard_core_pair_emits_two_corrections() {
        let (swap, extras) = commute(
            &Node::ladder(Kind::HardCoreAnnihilation, "i"),
            &Node::ladder(Kind::HardCoreCreation, "i"),
        );
        assert!(swap.negate);
        assert_eq!(extras.len(), 2);
        assert!(!extras[0].negate);
        assert!(extras[1].negate);
        assert_eq!(extras[1].factors.len(), 3);
        assert_eq!(extras[1].factors[2], Node::ladder(Kind::HardCoreNumber, "i"));
    }

    #[test]
    fn unrelated_factors_swap_plainly() {
        let (swap, extras) = commute(
            &Node::variable("x"),
            &Node::num("2"),
        );
        assert!(!swap.negate);
        assert!(extras.is_empty());
    }

    #[test]
    fn different_dof_bosonic_pair_swaps_plainly() {
        let (swap, extras) = commute(
            &Node::ladder(Kind::BosonicAnnihilation, "k"),
            &Node::ladder(Kind::BosonicCreation, "q"),
        );
        assert!(!swap.negate);
        assert!(extras.is_empty());
    }
}
