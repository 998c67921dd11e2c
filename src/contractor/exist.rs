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

/// Existential quantifier (spec §4.4): same parameter-bisection recursion
/// as [`super::ForAll`], but takes the hull of recovered variable boxes
/// since a different variable assignment may work for each parameter
/// value. A stack of `(variable_box, parameter_box)` pairs drives the
/// search; midpoint sampling short-circuits a branch as soon as one
/// concrete parameter value is known to admit the current variable box,
/// without needing to bisect it all the way to `eps`.
#[derive(Clone)]
pub struct Exist {
    inner: BoxedContractor,
    mask: Vec<bool>,
    eps: f64,
}

impl Exist {
    pub fn new(inner: BoxedContractor, mask: Vec<bool>, eps: f64) -> Self {
        Self { inner, mask, eps }
    }

    fn admits_midpoint(&self, var_box: &IntervalVector, param_box: &IntervalVector) -> bool {
        let mid = IntervalVector::new(param_box.as_slice().iter().map(|iv| crate::interval::Interval::degenerate(iv.mid())).collect());
        let mut full = combine(var_box, &mid, &self.mask);
        self.inner.contract(&mut full)
    }

    fn recurse(&self, var_box: &IntervalVector, param_box: &IntervalVector) -> Option<IntervalVector> {
        if self.admits_midpoint(var_box, param_box) {
            return Some(var_box.clone());
        }

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
            (Some(a), Some(b)) => Some(a.hull(&b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }
}

impl Contractor for Exist {
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
