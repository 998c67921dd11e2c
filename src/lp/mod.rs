//! Bridge to a simplex solver used by the linear-relaxation contractor
//! ([`crate::contractor::linear_relax`]). The bridge only builds the model
//! and extracts primal/dual/infeasibility-direction vectors; Neumaier–
//! Shcherbina rigor is applied by the caller, not here, so that swapping
//! the underlying [`SimplexBackend`] never changes that guarantee's logic.

pub mod simplex;

use faer::Mat;

/// Default cap on a variable's diameter before it's handed to the simplex
/// backend as a row bound. The teacher's linear-relaxation code declared
/// this constant separately in more than one place; this is the single
/// engine-wide default everything else should reference.
pub const DEFAULT_MAX_DIAM_BOX: f64 = 1e6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Optimal,
    Infeasible,
    Unknown,
    TimeOut,
    MaxIter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpRelOp {
    Leq,
    Eq,
    Geq,
}

/// A ranged row `lo <= coeffs . x <= hi`. Variable-bound rows (the bridge's
/// first `n_var` rows) are the identity case `coeffs = e_i`.
#[derive(Debug, Clone)]
pub struct LpRow {
    pub coeffs: Vec<f64>,
    pub lo: f64,
    pub hi: f64,
}

impl LpRow {
    pub fn from_op(coeffs: Vec<f64>, op: LpRelOp, rhs: f64) -> Self {
        let (lo, hi) = match op {
            LpRelOp::Leq => (f64::NEG_INFINITY, rhs),
            LpRelOp::Geq => (rhs, f64::INFINITY),
            LpRelOp::Eq => (rhs, rhs),
        };
        Self { coeffs, lo, hi }
    }
}

/// `min`/`max c^T x` subject to every row's range, the first `n_var` rows
/// being variable bounds.
#[derive(Debug, Clone)]
pub struct LpModel {
    pub n_var: usize,
    pub sense: Sense,
    pub obj: Vec<f64>,
    pub rows: Vec<LpRow>,
}

impl LpModel {
    pub fn new(n_var: usize) -> Self {
        let mut rows = Vec::with_capacity(n_var);
        for i in 0..n_var {
            let mut coeffs = vec![0.0; n_var];
            coeffs[i] = 1.0;
            rows.push(LpRow {
                coeffs,
                lo: f64::NEG_INFINITY,
                hi: f64::INFINITY,
            });
        }
        Self {
            n_var,
            sense: Sense::Min,
            obj: vec![0.0; n_var],
            rows,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub primal: Vec<f64>,
    /// One dual value per row (bound rows first, then caller-added rows).
    pub dual: Vec<f64>,
    pub objective: f64,
}

/// A pluggable simplex implementation. [`simplex::BoundedSimplex`] is the
/// one this crate ships.
pub trait SimplexBackend {
    fn solve(&mut self, model: &LpModel, max_iter: usize) -> (Status, Option<Solution>, Option<Vec<f64>>);
}

/// Holds one simplex instance with `nb_var + nb_ctr` rows (spec §4.6).
pub struct LpBridge<B: SimplexBackend> {
    model: LpModel,
    backend: B,
    max_iter: usize,
    last: Option<(Status, Option<Solution>, Option<Vec<f64>>)>,
}

impl<B: SimplexBackend> LpBridge<B> {
    pub fn new(n_var: usize, backend: B) -> Self {
        Self {
            model: LpModel::new(n_var),
            backend,
            max_iter: 500,
            last: None,
        }
    }

    pub fn n_var(&self) -> usize {
        self.model.n_var
    }

    pub fn n_rows(&self) -> usize {
        self.model.rows.len()
    }

    pub fn set_sense(&mut self, sense: Sense) {
        self.model.sense = sense;
    }

    pub fn set_var_obj(&mut self, i: usize, c: f64) {
        self.model.obj[i] = c;
    }

    pub fn set_bound_var(&mut self, i: usize, lb: f64, ub: f64) {
        self.model.rows[i].lo = lb;
        self.model.rows[i].hi = ub;
    }

    pub fn add_constraint(&mut self, row: Vec<f64>, op: LpRelOp, rhs: f64) {
        self.model.rows.push(LpRow::from_op(row, op, rhs));
    }

    /// Drops every row past `n_var`, undoing every `add_constraint` call.
    pub fn clean_constraints(&mut self) {
        self.model.rows.truncate(self.model.n_var);
    }

    pub fn solve(&mut self) -> Status {
        let (status, solution, farkas) = self.backend.solve(&self.model, self.max_iter);
        let status_copy = status;
        self.last = Some((status, solution, farkas));
        status_copy
    }

    pub fn primal(&self) -> Option<&[f64]> {
        self.last.as_ref()?.1.as_ref().map(|s| s.primal.as_slice())
    }

    /// One entry per row; `dual[i]` for `i < n_var` is the shadow price of
    /// variable `i`'s bound row.
    pub fn dual(&self) -> Option<&[f64]> {
        self.last.as_ref()?.1.as_ref().map(|s| s.dual.as_slice())
    }

    pub fn objective_value(&self) -> Option<f64> {
        self.last.as_ref()?.1.as_ref().map(|s| s.objective)
    }

    /// A Farkas-style infeasibility direction, populated only when the
    /// last `solve()` returned [`Status::Infeasible`].
    pub fn infeasibility_direction(&self) -> Option<&[f64]> {
        self.last.as_ref()?.2.as_deref()
    }

    pub fn coefficient_row(&self, row: usize) -> &[f64] {
        &self.model.rows[row].coeffs
    }

    pub fn rhs_range(&self, row: usize) -> (f64, f64) {
        (self.model.rows[row].lo, self.model.rows[row].hi)
    }

    /// Dense `(rows x n_var)` coefficient matrix.
    pub fn matrix(&self) -> Mat<f64> {
        let m = self.model.rows.len();
        let n = self.model.n_var;
        Mat::from_fn(m, n, |i, j| self.model.rows[i].coeffs[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp::simplex::BoundedSimplex;

    #[test]
    fn bridge_builds_identity_bound_rows() {
        let bridge = LpBridge::new(2, BoundedSimplex::new());
        assert_eq!(bridge.n_rows(), 2);
        assert_eq!(bridge.coefficient_row(0), &[1.0, 0.0]);
        assert_eq!(bridge.coefficient_row(1), &[0.0, 1.0]);
    }

    #[test]
    fn clean_constraints_drops_added_rows() {
        let mut bridge = LpBridge::new(1, BoundedSimplex::new());
        bridge.add_constraint(vec![1.0], LpRelOp::Leq, 3.0);
        assert_eq!(bridge.n_rows(), 2);
        bridge.clean_constraints();
        assert_eq!(bridge.n_rows(), 1);
    }
}
