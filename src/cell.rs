//! A node of the search tree: a box plus bisector/optimizer scratch state
//! (spec §3, "Cell").

use crate::interval::Interval;
use crate::interval_vector::IntervalVector;

/// Scratch state a bisector keeps between calls on the same branch of the
/// tree (e.g. round-robin's `last_var`).
#[derive(Debug, Clone, Copy, Default)]
pub struct BisectorState {
    pub last_var: Option<usize>,
}

/// Scratch state only meaningful to the optimizer's cells.
#[derive(Debug, Clone)]
pub struct OptimizerState {
    /// Proven range of the objective on this cell's box.
    pub pf: Interval,
    /// `true` once every point of `box` is proven to satisfy every
    /// constraint.
    pub pu: bool,
    /// Incumbent `loup` at the moment this cell was created.
    pub loup: f64,
    /// Back-pointer slots into the two heaps of a `DoubleHeap` frontier;
    /// `None` once removed from the corresponding heap.
    pub heap_pos: [Option<usize>; 2],
}

impl OptimizerState {
    pub fn new(pf: Interval, loup: f64) -> Self {
        Self {
            pf,
            pu: false,
            loup,
            heap_pos: [None, None],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub id: usize,
    pub b: IntervalVector,
    pub bisector_state: BisectorState,
    pub optimizer_state: Option<OptimizerState>,
}

impl Cell {
    pub fn root(id: usize, b: IntervalVector) -> Self {
        Self {
            id,
            b,
            bisector_state: BisectorState::default(),
            optimizer_state: None,
        }
    }

    /// Produces the two children of bisecting this cell along `i`, cloning
    /// bisector/optimizer scratch state into both (spec §4.8: "inherit
    /// `pf`, `pu`, and `loup` into the two children").
    pub fn bisect(&self, left_id: usize, right_id: usize, i: usize, ratio: f64) -> (Cell, Cell) {
        let (lb, rb) = self.b.bisect(i, ratio);
        let left = Cell {
            id: left_id,
            b: lb,
            bisector_state: self.bisector_state,
            optimizer_state: self.optimizer_state.clone(),
        };
        let right = Cell {
            id: right_id,
            b: rb,
            bisector_state: self.bisector_state,
            optimizer_state: self.optimizer_state.clone(),
        };
        (left, right)
    }
}
