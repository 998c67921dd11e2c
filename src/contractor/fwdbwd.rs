use super::{ContractOutput, Contractor};
use crate::constraint::NumConstraint;
use crate::interval_vector::IntervalVector;

/// One `backward` pass on a single constraint; the building block of
/// [`super::Hc4`].
#[derive(Clone)]
pub struct FwdBwd {
    constraint: NumConstraint,
}

impl FwdBwd {
    pub fn new(constraint: NumConstraint) -> Self {
        Self { constraint }
    }
}

impl Contractor for FwdBwd {
    fn nb_var(&self) -> usize {
        self.constraint.function().nb_var()
    }

    fn contract_ex(&self, b: &mut IntervalVector) -> ContractOutput {
        let before = b.clone();
        if !self.constraint.contract(b) {
            return ContractOutput::empty();
        }
        let inactive = self.constraint.is_satisfied(&before) == Some(true);
        ContractOutput::feasible(inactive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::RelOp;
    use crate::expr::{ExprBuilder, Function};
    use crate::interval::Interval;

    #[test]
    fn narrows_a_single_constraint() {
        let mut bld = ExprBuilder::new(1);
        let x = bld.var(0);
        let two = bld.konst(2.0);
        let f = bld.sub(x, two);
        let dag = bld.build();
        let c = NumConstraint::new(Function::scalar(dag, f), RelOp::Geq);
        let ctc = FwdBwd::new(c);

        let mut b = IntervalVector::new(vec![Interval::new(0.0, 10.0)]);
        assert!(ctc.contract(&mut b));
        assert!(b.get(0).lb() >= 2.0 - 1e-9);
    }

    #[test]
    fn reports_inactive_when_already_feasible() {
        let mut bld = ExprBuilder::new(1);
        let x = bld.var(0);
        let zero = bld.konst(0.0);
        let f = bld.sub(x, zero);
        let dag = bld.build();
        let c = NumConstraint::new(Function::scalar(dag, f), RelOp::Geq);
        let ctc = FwdBwd::new(c);

        let mut b = IntervalVector::new(vec![Interval::new(1.0, 2.0)]);
        let out = ctc.contract_ex(&mut b);
        assert!(out.inactive);
    }
}
