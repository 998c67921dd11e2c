use super::{BoxedContractor, ContractOutput, Contractor};
use crate::interval_vector::IntervalVector;

fn split(full: &IntervalVector, mask: &[bool]) -> (IntervalVector, IntervalVector) {
    let mut vars = Vec::new();
    let mut params = Vec::new();
    for (i, &is_param) in mask.iter().enumerate() {
        if is_param {
            params.push(full.get(i));
        } else {
            vars.push(full.get(i));
        }
    }
    (IntervalVector::new(vars), IntervalVector::new(params))
}

fn combine(var_box: &IntervalVector, param_box: &IntervalVector, mask: &[bool]) -> IntervalVector {
    let mut comps = Vec::with_capacity(mask.len());
    let mut vi = 0;
    let mut pi = 0;
    for &is_param in mask {
        if is_param {
            comps.push(param_box.get(pi));
            pi += 1;
        } else {
            comps.push(var_box.get(vi));
            vi += 1;
        }
    }
    IntervalVector::new(comps)
}

/// Universal quantifier over the masked parameter subspace (spec §4.4):
/// recursively bisects parameters down to `eps`, propagating `inner`
/// through each bisected-parameter box; the result is the intersection of
/// the recovered variable boxes, since one variable assignment must work
/// for every parameter value.
#[derive(Clone)]
pub struct ForAll {
    inner: BoxedContractor,
    mask: Vec<bool>,
    eps: f64,
}

impl ForAll {
    pub fn new(inner: BoxedContractor, mask: Vec<bool>, eps: f64) -> Self {
        Self { inner, mask, eps }
    }

    fn recurse(&self, var_box: &IntervalVector, param_box: &IntervalVector) -> Option<IntervalVector> {
        let mut full = combine(var_box, param_box, &self.mask);
        if !self.inner.contract(&mut full) {
            return None;
        }
        let (new_var, new_param) = split(&full, &self.mask);

        if new_param.is_empty() || new_param.max_diam() <= self.eps {
            return Some(new_var);
        }

        let widest = new_param.widest_dim().expect("new_param is non-empty");
        let (p1, p2) = new_param.bisect(widest, 0.5);
        let r1 = self.recurse(&new_var, &p1);
        let r2 = self.recurse(&new_var, &p2);
        match (r1, r2) {
            (Some(a), Some(b)) => Some(a.intersection(&b)),
            _ => None,
        }
    }
}

impl Contractor for ForAll {
    fn nb_var(&self) -> usize {
        self.inner.nb_var()
    }

    fn contract_ex(&self, b: &mut IntervalVector) -> ContractOutput {
        let (var_box, param_box) = split(b, &self.mask);
        match self.recurse(&var_box, &param_box) {
            Some(result) => {
                *b = combine(&result, &param_box, &self.mask);
                if b.is_empty() {
                    ContractOutput::empty()
                } else {
                    ContractOutput::feasible(false)
                }
            }
            None => {
                b.set_empty();
                ContractOutput::empty()
            }
        }
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
    fn for_all_restricts_to_the_claimed_half_plane() {
        // a*t + b >= 0 for all t in [0, 1]; at t=0 this forces b >= 0.
        let mut bld = ExprBuilder::new(3);
        let a = bld.var(0);
        let b_var = bld.var(1);
        let t = bld.var(2);
        let at = bld.mul(a, t);
        let f = bld.add(at, b_var);
        let dag = bld.build();
        let ctc = FwdBwd::new(NumConstraint::new(Function::scalar(dag, f), RelOp::Geq));

        let forall = ForAll::new(Box::new(ctc), vec![false, false, true], 0.05);
        let mut full = IntervalVector::new(vec![
            Interval::new(-1.0, 1.0),
            Interval::new(-1.0, 1.0),
            Interval::new(0.0, 1.0),
        ]);
        assert!(forall.contract(&mut full));
        // eps bounds how close to exactly b >= 0 the recursion gets.
        assert!(full.get(1).lb() >= -0.1);
    }
}
