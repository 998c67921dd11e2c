use super::{BoxedContractor, ContractOutput, Contractor};
use crate::interval::{next_float, previous_float, Interval};
use crate::interval_vector::IntervalVector;

/// Adaptive shaving: probes each variable's lower and upper slice against
/// the wrapped contractor; a slice the contractor proves infeasible is
/// permanently cut off, then the wrapped contractor is re-run to
/// fixpoint on the shrunk box.
#[derive(Clone)]
pub struct Acid {
    inner: BoxedContractor,
    shave_ratio: f64,
}

impl Acid {
    pub fn new(inner: BoxedContractor, shave_ratio: f64) -> Self {
        Self { inner, shave_ratio }
    }

    /// Tries to cut a `shave_ratio`-wide slice off each end of dimension
    /// `i`. Returns `true` if either end was proven infeasible and
    /// removed.
    fn shave_var(&self, b: &mut IntervalVector, i: usize) -> bool {
        let mut gained = false;

        let iv = b.get(i);
        if iv.is_bisectable() {
            let width = iv.diam() * self.shave_ratio;
            let mut probe = b.clone();
            probe.set(i, Interval::new(iv.lb(), iv.lb() + width));
            if !self.inner.contract(&mut probe) {
                b.set(i, Interval::new(next_float(iv.lb() + width), iv.ub()));
                gained = true;
                if b.is_empty() {
                    return gained;
                }
            }
        }

        let iv = b.get(i);
        if iv.is_bisectable() {
            let width = iv.diam() * self.shave_ratio;
            let mut probe = b.clone();
            probe.set(i, Interval::new(iv.ub() - width, iv.ub()));
            if !self.inner.contract(&mut probe) {
                b.set(i, Interval::new(iv.lb(), previous_float(iv.ub() - width)));
                gained = true;
            }
        }

        gained
    }
}

impl Contractor for Acid {
    fn nb_var(&self) -> usize {
        self.inner.nb_var()
    }

    fn contract_ex(&self, b: &mut IntervalVector) -> ContractOutput {
        let first = self.inner.contract_ex(b);
        if !first.feasible {
            return ContractOutput::empty();
        }

        let mut gained_any = false;
        for i in 0..b.len() {
            if self.shave_var(b, i) {
                gained_any = true;
            }
            if b.is_empty() {
                return ContractOutput::empty();
            }
        }

        if !gained_any {
            return ContractOutput::feasible(first.inactive);
        }

        let second = self.inner.contract_ex(b);
        if !second.feasible {
            return ContractOutput::empty();
        }
        ContractOutput::feasible(first.inactive && second.inactive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{NumConstraint, RelOp};
    use crate::contractor::FwdBwd;
    use crate::expr::{ExprBuilder, Function};

    #[test]
    fn shaves_off_an_infeasible_slice() {
        let mut bld = ExprBuilder::new(1);
        let x = bld.var(0);
        let five = bld.konst(5.0);
        let f = bld.sub(x, five);
        let dag = bld.build();
        let ctc = FwdBwd::new(NumConstraint::new(Function::scalar(dag, f), RelOp::Geq));
        let acid = Acid::new(Box::new(ctc), 0.2);

        let mut b = IntervalVector::new(vec![Interval::new(0.0, 10.0)]);
        assert!(acid.contract(&mut b));
        assert!(b.get(0).lb() >= 5.0 - 1e-9);
    }
}
