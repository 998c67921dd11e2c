//! Composable operators that, given a box, return a box proven to contain
//! every feasible point of the input (spec §4.4). The taxonomy below
//! mirrors the spec's list: [`FwdBwd`]/[`Hc4`] for constraint propagation,
//! [`Compo`]/[`Union`]/[`FixPoint`] for combinators, [`Acid`] for adaptive
//! shaving, [`Precision`] for termination, [`ForAll`]/[`Exist`] for
//! quantifier elimination, and [`linear_relax::LinearRelaxFixPoint`] for the
//! LP-backed relaxation.

mod acid;
mod compo;
mod exist;
mod fixpoint;
mod forall;
mod fwdbwd;
mod hc4;
pub mod linear_relax;
mod precision;
mod union;

pub use acid::Acid;
pub use compo::Compo;
pub use exist::Exist;
pub use fixpoint::FixPoint;
pub use forall::ForAll;
pub use fwdbwd::FwdBwd;
pub use hc4::Hc4;
pub use linear_relax::LinearRelaxFixPoint;
pub use precision::Precision;
pub use union::Union;

use dyn_clone::DynClone;

use crate::interval_vector::IntervalVector;

/// Result of a flag-tracking contraction: `feasible` is `false` exactly
/// when the box was proven to contain no feasible point; `inactive` is
/// `true` when the entire input box was already proven feasible for every
/// constraint this contractor handles (spec §4.4's INACTIVE flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractOutput {
    pub feasible: bool,
    pub inactive: bool,
}

impl ContractOutput {
    pub fn feasible(inactive: bool) -> Self {
        Self {
            feasible: true,
            inactive,
        }
    }

    pub fn empty() -> Self {
        Self {
            feasible: false,
            inactive: false,
        }
    }
}

/// A contractor has `nb_var`; `contract` modifies `box` in place (possibly
/// to empty); `contract_ex` additionally reports the INACTIVE flag.
/// Implementations should override `contract_ex` — the default `contract`
/// delegates to it — rather than the other way around, since `inactive`
/// information is otherwise lost.
pub trait Contractor: DynClone {
    fn nb_var(&self) -> usize;

    fn contract_ex(&self, b: &mut IntervalVector) -> ContractOutput;

    fn contract(&self, b: &mut IntervalVector) -> bool {
        self.contract_ex(b).feasible
    }
}

dyn_clone::clone_trait_object!(Contractor);

pub type BoxedContractor = Box<dyn Contractor>;
