use super::{Bisector, NoBisectableVariable};
use crate::cell::Cell;

/// Cycles through dimensions `>= eps` wide, remembering `last_var` between
/// calls on the same branch of the tree.
pub struct RoundRobin {
    pub eps: f64,
    pub ratio: f64,
}

impl RoundRobin {
    pub fn new(eps: f64, ratio: f64) -> Self {
        Self { eps, ratio }
    }

    fn pick(&self, cell: &Cell) -> Option<usize> {
        let n = cell.b.len();
        let start = cell.bisector_state.last_var.map(|v| (v + 1) % n).unwrap_or(0);
        (0..n)
            .map(|k| (start + k) % n)
            .find(|&i| cell.b.get(i).is_bisectable() && cell.b.get(i).diam() >= self.eps)
    }
}

impl Bisector for RoundRobin {
    fn bisect(&self, cell: &Cell, next_left_id: usize, next_right_id: usize) -> Result<(Cell, Cell), NoBisectableVariable> {
        let i = self.pick(cell).ok_or(NoBisectableVariable)?;
        let (mut left, mut right) = cell.bisect(next_left_id, next_right_id, i, self.ratio);
        left.bisector_state.last_var = Some(i);
        right.bisector_state.last_var = Some(i);
        Ok((left, right))
    }
}
