use super::{ContractOutput, Contractor};
use crate::interval_vector::IntervalVector;

/// Empties any box of max-diameter `<= eps` (used as a termination
/// contractor, not a feasibility one: it never certifies INACTIVE).
#[derive(Clone)]
pub struct Precision {
    eps: f64,
}

impl Precision {
    pub fn new(eps: f64) -> Self {
        Self { eps }
    }
}

impl Contractor for Precision {
    fn nb_var(&self) -> usize {
        0
    }

    fn contract_ex(&self, b: &mut IntervalVector) -> ContractOutput {
        if b.max_diam() <= self.eps {
            b.set_empty();
            ContractOutput::empty()
        } else {
            ContractOutput::feasible(false)
        }
    }
}
