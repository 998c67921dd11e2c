//! Strategies that split a box into two along a chosen dimension (spec
//! §4.5).

mod largest_first;
mod round_robin;
mod smear;

pub use largest_first::LargestFirst;
pub use round_robin::RoundRobin;
pub use smear::{Smear, SmearMode};

use derive_more::{Display, Error};

use crate::cell::Cell;

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("no variable is both wider than epsilon and bisectable")]
pub struct NoBisectableVariable;

/// A bisector returns `(left, right)` with `left.hull(right) == input` and
/// `left[i] ∩ right[i]` degenerate for exactly one `i`.
pub trait Bisector {
    fn bisect(&self, cell: &Cell, next_left_id: usize, next_right_id: usize) -> Result<(Cell, Cell), NoBisectableVariable>;
}

/// Picks the widest dimension at or above `eps`, returning `None` if none
/// qualifies. Shared by every bisector as the final arbiter of
/// "bisectable".
pub(crate) fn widest_above(cell: &Cell, eps: f64) -> Option<usize> {
    let b = &cell.b;
    (0..b.len())
        .filter(|&i| b.get(i).is_bisectable() && b.get(i).diam() > eps)
        .max_by(|&a, &c| {
            b.get(a)
                .diam()
                .partial_cmp(&b.get(c).diam())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}
