use super::{BoxedContractor, ContractOutput, Contractor};
use crate::interval_vector::IntervalVector;

/// Calls each sub-contractor in order; INACTIVE is the AND over components
/// that ran without emptying.
#[derive(Clone)]
pub struct Compo {
    parts: Vec<BoxedContractor>,
}

impl Compo {
    pub fn new(parts: Vec<BoxedContractor>) -> Self {
        Self { parts }
    }
}

impl Contractor for Compo {
    fn nb_var(&self) -> usize {
        self.parts.first().map(|p| p.nb_var()).unwrap_or(0)
    }

    fn contract_ex(&self, b: &mut IntervalVector) -> ContractOutput {
        let mut inactive = true;
        for part in &self.parts {
            let out = part.contract_ex(b);
            if !out.feasible {
                return ContractOutput::empty();
            }
            inactive &= out.inactive;
        }
        ContractOutput::feasible(inactive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contractor::Precision;
    use crate::interval::Interval;

    #[test]
    fn empties_as_soon_as_one_component_empties() {
        let compo = Compo::new(vec![Box::new(Precision::new(1e-3)), Box::new(Precision::new(1e-3))]);
        let mut b = IntervalVector::new(vec![Interval::new(0.0, 1e-6)]);
        assert!(!compo.contract(&mut b));
    }

    #[test]
    fn survives_when_no_component_empties() {
        let compo = Compo::new(vec![Box::new(Precision::new(1e-9))]);
        let mut b = IntervalVector::new(vec![Interval::new(0.0, 1.0)]);
        assert!(compo.contract(&mut b));
    }
}
