use super::{BoxedContractor, ContractOutput, Contractor};
use crate::interval_vector::IntervalVector;

/// Repeats `c.contract(box)` while the box keeps shrinking by more than
/// `ratio`. Halts in at most `log(diam) / log(1/(1-ratio))` iterations
/// (spec §8).
#[derive(Clone)]
pub struct FixPoint {
    inner: BoxedContractor,
    ratio: f64,
    max_iter: usize,
}

impl FixPoint {
    pub fn new(inner: BoxedContractor, ratio: f64) -> Self {
        Self {
            inner,
            ratio,
            max_iter: 10_000,
        }
    }
}

fn max_relative_shrink(before: &IntervalVector, after: &IntervalVector) -> f64 {
    (0..before.len())
        .map(|i| {
            let d0 = before.get(i).diam();
            if d0 <= 0.0 || !d0.is_finite() {
                0.0
            } else {
                ((d0 - after.get(i).diam()) / d0).max(0.0)
            }
        })
        .fold(0.0, f64::max)
}

impl Contractor for FixPoint {
    fn nb_var(&self) -> usize {
        self.inner.nb_var()
    }

    fn contract_ex(&self, b: &mut IntervalVector) -> ContractOutput {
        let mut last_inactive = false;
        for _ in 0..self.max_iter {
            let before = b.clone();
            let out = self.inner.contract_ex(b);
            if !out.feasible {
                return ContractOutput::empty();
            }
            last_inactive = out.inactive;
            if out.inactive || max_relative_shrink(&before, b) <= self.ratio {
                break;
            }
        }
        ContractOutput::feasible(last_inactive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{NumConstraint, RelOp};
    use crate::contractor::FwdBwd;
    use crate::expr::{ExprBuilder, Function};
    use crate::interval::Interval;

    #[test]
    fn idempotent_once_at_fixpoint() {
        let mut bld = ExprBuilder::new(1);
        let x = bld.var(0);
        let zero = bld.konst(0.0);
        let f = bld.sub(x, zero);
        let dag = bld.build();
        let ctc = FwdBwd::new(NumConstraint::new(Function::scalar(dag, f), RelOp::Geq));
        let fp = FixPoint::new(Box::new(ctc), 0.01);

        let mut b = IntervalVector::new(vec![Interval::new(1.0, 2.0)]);
        assert!(fp.contract(&mut b));
        assert_eq!(b.get(0), Interval::new(1.0, 2.0));
    }
}
