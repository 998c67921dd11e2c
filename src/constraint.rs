//! Numerical constraints: `f(x) op 0`.

use crate::expr::Function;
use crate::interval::Interval;
use crate::interval_vector::IntervalVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Lt,
    Leq,
    Eq,
    Geq,
    Gt,
}

impl RelOp {
    /// The feasible half-line for `f(x) op 0`, as an interval for `f(x)`.
    /// Strict inequalities use `next_float`/`previous_float` guards so a
    /// point exactly on the boundary is not admitted.
    pub fn feasible_region(&self) -> Interval {
        use crate::interval::{next_float, previous_float};
        match self {
            RelOp::Lt => Interval::new(f64::NEG_INFINITY, previous_float(0.0)),
            RelOp::Leq => Interval::new(f64::NEG_INFINITY, 0.0),
            RelOp::Eq => Interval::degenerate(0.0),
            RelOp::Geq => Interval::new(0.0, f64::INFINITY),
            RelOp::Gt => Interval::new(next_float(0.0), f64::INFINITY),
        }
    }

    /// The complement of [`RelOp::feasible_region`] — the forbidden region
    /// used by [`crate::packing::sweep`]. For inequalities this is a single
    /// half-line; an equality's true complement (everything but `{0}`)
    /// isn't representable as one interval, so `Eq` conservatively yields
    /// [`Interval::ALL_REALS`] (sweeping on equality constraints is not a
    /// supported use case — it is meant for the inequality packing
    /// constraints of spec scenario S4).
    pub fn forbidden_region(&self) -> Interval {
        use crate::interval::{next_float, previous_float};
        match self {
            RelOp::Lt => Interval::new(0.0, f64::INFINITY),
            RelOp::Leq => Interval::new(next_float(0.0), f64::INFINITY),
            RelOp::Eq => Interval::ALL_REALS,
            RelOp::Geq => Interval::new(f64::NEG_INFINITY, previous_float(0.0)),
            RelOp::Gt => Interval::new(f64::NEG_INFINITY, 0.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NumConstraint {
    f: Function,
    op: RelOp,
}

impl NumConstraint {
    pub fn new(f: Function, op: RelOp) -> Self {
        Self { f, op }
    }

    pub fn function(&self) -> &Function {
        &self.f
    }

    pub fn op(&self) -> RelOp {
        self.op
    }

    /// `f(x) op 0` evaluated in real arithmetic over `b`: `true` only if
    /// every point of `b` is feasible (a sound enclosure may be unsure —
    /// see [`NumConstraint::is_satisfied`]).
    pub fn eval(&self, b: &IntervalVector) -> Interval {
        self.f.eval(b)
    }

    /// Sound three-valued satisfaction test: `Some(true)` if every point of
    /// `b` satisfies the constraint, `Some(false)` if no point does,
    /// `None` if the enclosure cannot decide.
    pub fn is_satisfied(&self, b: &IntervalVector) -> Option<bool> {
        let image = self.eval(b);
        let feasible = self.op.feasible_region();
        if image.is_subset(&feasible) {
            Some(true)
        } else if image.intersection(&feasible).is_empty() {
            Some(false)
        } else {
            None
        }
    }

    /// HC4Revise through this constraint's operator: narrows `b` so every
    /// point maps into the feasible region. Returns `false` if `b` is
    /// proven infeasible.
    pub fn contract(&self, b: &mut IntervalVector) -> bool {
        self.f.backward(self.op.feasible_region(), b)
    }
}
