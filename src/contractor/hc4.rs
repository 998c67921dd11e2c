use super::{ContractOutput, Contractor};
use crate::constraint::NumConstraint;
use crate::interval_vector::IntervalVector;
use crate::packing::waking_list::{JumpResult, WakingList};

/// Constraint propagation over a whole system: drives a [`WakingList`] over
/// the constraints, applying `backward` for each and feeding back whether
/// it shrank the box by more than `ratio` (spec §4.4).
#[derive(Clone)]
pub struct Hc4 {
    constraints: Vec<NumConstraint>,
    ratio: f64,
}

impl Hc4 {
    pub fn new(constraints: Vec<NumConstraint>, ratio: f64) -> Self {
        Self { constraints, ratio }
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

impl Contractor for Hc4 {
    fn nb_var(&self) -> usize {
        self.constraints
            .first()
            .map(|c| c.function().nb_var())
            .unwrap_or(0)
    }

    fn contract_ex(&self, b: &mut IntervalVector) -> ContractOutput {
        if self.constraints.is_empty() {
            return ContractOutput::feasible(true);
        }

        let mut waking = WakingList::new(self.constraints.len());
        let mut inactive = true;
        let mut candidate = waking.first_candidate();

        while let Some(c) = candidate {
            let before = b.clone();
            if !self.constraints[c].contract(b) {
                return ContractOutput::empty();
            }
            let satisfied = self.constraints[c].is_satisfied(&before) == Some(true);
            if !satisfied {
                inactive = false;
            }
            let shrank = max_relative_shrink(&before, b) > self.ratio;
            let jump = if !shrank {
                JumpResult::NoJump
            } else if c == 0 {
                JumpResult::MainJump
            } else {
                JumpResult::Jump
            };
            candidate = waking.next_candidate(jump);
        }

        ContractOutput::feasible(inactive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::RelOp;
    use crate::expr::{ExprBuilder, Function};
    use crate::interval::Interval;

    fn circle_and_line() -> Vec<NumConstraint> {
        let mut bld = ExprBuilder::new(2);
        let x = bld.var(0);
        let y = bld.var(1);
        let x2 = bld.sqr(x);
        let y2 = bld.sqr(y);
        let sum = bld.add(x2, y2);
        let one = bld.konst(1.0);
        let circle = bld.sub(sum, one);
        let line = bld.sub(x, y);
        let dag = bld.build();
        vec![
            NumConstraint::new(Function::scalar(dag.clone(), circle), RelOp::Eq),
            NumConstraint::new(Function::scalar(dag, line), RelOp::Eq),
        ]
    }

    #[test]
    fn propagates_both_constraints_to_a_tight_box() {
        let hc4 = Hc4::new(circle_and_line(), 0.0);
        let mut b = IntervalVector::new(vec![Interval::new(-2.0, 2.0), Interval::new(-2.0, 2.0)]);
        assert!(hc4.contract(&mut b));
        assert!(b.get(0).diam() < 4.0);
    }

    #[test]
    fn detects_global_infeasibility() {
        let hc4 = Hc4::new(circle_and_line(), 0.0);
        let mut b = IntervalVector::new(vec![Interval::new(5.0, 6.0), Interval::new(5.0, 6.0)]);
        assert!(!hc4.contract(&mut b));
    }
}
