use super::{BoxedContractor, ContractOutput, Contractor};
use crate::interval_vector::IntervalVector;

/// `box <- hull of {c_i.contract(box copy)}`; INACTIVE iff at least one
/// component is INACTIVE.
#[derive(Clone)]
pub struct Union {
    parts: Vec<BoxedContractor>,
}

impl Union {
    pub fn new(parts: Vec<BoxedContractor>) -> Self {
        assert!(!parts.is_empty(), "Union needs at least one branch");
        Self { parts }
    }
}

impl Contractor for Union {
    fn nb_var(&self) -> usize {
        self.parts[0].nb_var()
    }

    fn contract_ex(&self, b: &mut IntervalVector) -> ContractOutput {
        let mut hull: Option<IntervalVector> = None;
        let mut any_inactive = false;

        for part in &self.parts {
            let mut copy = b.clone();
            let out = part.contract_ex(&mut copy);
            if !out.feasible {
                continue;
            }
            any_inactive |= out.inactive;
            hull = Some(match hull {
                Some(h) => h.hull(&copy),
                None => copy,
            });
        }

        match hull {
            Some(h) => {
                *b = h;
                ContractOutput::feasible(any_inactive)
            }
            None => ContractOutput::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contractor::FwdBwd;
    use crate::constraint::{NumConstraint, RelOp};
    use crate::expr::{ExprBuilder, Function};
    use crate::interval::Interval;

    #[test]
    fn union_is_hull_of_branches() {
        let mut bld = ExprBuilder::new(1);
        let x = bld.var(0);
        let lo = bld.konst(-5.0);
        let hi = bld.konst(5.0);
        let left_expr = bld.sub(x, lo);
        let right_expr = bld.sub(x, hi);
        let dag = bld.build();

        let left_ctc = FwdBwd::new(NumConstraint::new(Function::scalar(dag.clone(), left_expr), RelOp::Leq));
        let right_ctc = FwdBwd::new(NumConstraint::new(Function::scalar(dag, right_expr), RelOp::Geq));
        let union = Union::new(vec![Box::new(left_ctc), Box::new(right_ctc)]);

        let mut b = IntervalVector::new(vec![Interval::new(-10.0, 10.0)]);
        assert!(union.contract(&mut b));
        assert_eq!(b.get(0), Interval::new(-10.0, 10.0));
    }
}
