use super::{widest_above, Bisector, NoBisectableVariable};
use crate::cell::Cell;

/// Picks the dimension of maximal diameter above `eps`.
pub struct LargestFirst {
    pub eps: f64,
    pub ratio: f64,
}

impl LargestFirst {
    pub fn new(eps: f64, ratio: f64) -> Self {
        Self { eps, ratio }
    }
}

impl Bisector for LargestFirst {
    fn bisect(&self, cell: &Cell, next_left_id: usize, next_right_id: usize) -> Result<(Cell, Cell), NoBisectableVariable> {
        let i = widest_above(cell, self.eps).ok_or(NoBisectableVariable)?;
        Ok(cell.bisect(next_left_id, next_right_id, i, self.ratio))
    }
}
