use super::{Bisector, NoBisectableVariable, RoundRobin};
use crate::cell::Cell;
use crate::expr::Function;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmearMode {
    Max,
    Sum,
    SumRelative,
    MaxRelative,
}

/// Given the Jacobian `J(box)`, picks the variable maximizing a smear
/// impact score; falls back to [`RoundRobin`] when no variable is wider
/// than `eps`.
pub struct Smear<'a> {
    pub f: &'a Function,
    pub mode: SmearMode,
    pub eps: f64,
    pub ratio: f64,
    fallback: RoundRobin,
}

impl<'a> Smear<'a> {
    pub fn new(f: &'a Function, mode: SmearMode, eps: f64, ratio: f64) -> Self {
        Self {
            f,
            mode,
            eps,
            ratio,
            fallback: RoundRobin::new(eps, ratio),
        }
    }

    fn pick(&self, cell: &Cell) -> Option<usize> {
        let n = cell.b.len();
        let jac = self.f.jacobian(&cell.b);
        let m = jac.nrows();
        let diam: Vec<f64> = (0..n).map(|j| cell.b.get(j).diam()).collect();

        let candidates: Vec<usize> = (0..n)
            .filter(|&j| cell.b.get(j).is_bisectable() && diam[j] >= self.eps)
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let row_totals: Vec<f64> = (0..m)
            .map(|i| (0..n).fold(0.0, |acc, j| acc + jac.get(i, j).mag() * diam[j]))
            .collect();

        let score = |j: usize| -> f64 {
            match self.mode {
                SmearMode::Sum => (0..m).fold(0.0, |acc, i| acc + jac.get(i, j).mag() * diam[j]),
                SmearMode::Max => (0..m).fold(0.0, |acc, i| acc.max(jac.get(i, j).mag() * diam[j])),
                SmearMode::SumRelative => (0..m).fold(0.0, |acc, i| {
                    if row_totals[i] > 0.0 {
                        acc + jac.get(i, j).mag() * diam[j] / row_totals[i]
                    } else {
                        acc
                    }
                }),
                SmearMode::MaxRelative => (0..m).fold(0.0, |acc, i| {
                    if row_totals[i] > 0.0 {
                        acc.max(jac.get(i, j).mag() * diam[j] / row_totals[i])
                    } else {
                        acc
                    }
                }),
            }
        };

        candidates
            .into_iter()
            .max_by(|&a, &b| score(a).partial_cmp(&score(b)).unwrap_or(std::cmp::Ordering::Equal))
    }
}

impl<'a> Bisector for Smear<'a> {
    fn bisect(&self, cell: &Cell, next_left_id: usize, next_right_id: usize) -> Result<(Cell, Cell), NoBisectableVariable> {
        match self.pick(cell) {
            Some(i) => Ok(cell.bisect(next_left_id, next_right_id, i, self.ratio)),
            None => self.fallback.bisect(cell, next_left_id, next_right_id),
        }
    }
}
