//! Inflation-based pruning for packing-style constraints (spec §4.3).
//!
//! Given a corner point of a box, projects each candidate constraint's
//! forbidden half-plane backward into a "forbidden box" around that corner,
//! then eats one face of the working box down to the complement of the
//! accepted projection.

use crate::constraint::NumConstraint;
use crate::interval::Interval;
use crate::interval_vector::IntervalVector;
use crate::packing::waking_list::{JumpResult, WakingList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStep {
    NoJump,
    Jump,
    MainJump,
}

impl From<SweepStep> for JumpResult {
    fn from(s: SweepStep) -> JumpResult {
        match s {
            SweepStep::NoJump => JumpResult::NoJump,
            SweepStep::Jump => JumpResult::Jump,
            SweepStep::MainJump => JumpResult::MainJump,
        }
    }
}

pub struct Sweep<'a> {
    constraints: &'a [NumConstraint],
    waking: WakingList,
    order: Vec<usize>,
    jump_ratio: f64,
}

impl<'a> Sweep<'a> {
    /// `order` is a permutation of `0..box.len()`; sweeping along
    /// `order[0]` produces a [`SweepStep::MainJump`].
    pub fn new(constraints: &'a [NumConstraint], order: Vec<usize>, jump_ratio: f64) -> Self {
        Self {
            waking: WakingList::new(constraints.len()),
            constraints,
            order,
            jump_ratio,
        }
    }

    /// Runs the sweep from corner `pt` against `working`, eating faces until
    /// either no candidate remains or the main face reaches `original`'s
    /// opposite bound. Returns the narrowed box.
    pub fn run(&mut self, pt: &[f64], original: &IntervalVector, mut working: IntervalVector) -> IntervalVector {
        let initial_diam: Vec<f64> = (0..working.len()).map(|i| original.get(i).diam()).collect();
        let mut main_face_done = false;

        let mut candidate = self.waking.first_candidate();
        while let Some(c) = candidate {
            if main_face_done {
                break;
            }
            let step = self.try_project(c, pt, &initial_diam, original, &mut working);
            candidate = self.waking.next_candidate(step.into());
            if step == SweepStep::MainJump {
                let dim = self.order[0];
                let reached_opposite = (working.get(dim).lb() - original.get(dim).lb()).abs() < f64::EPSILON
                    || (working.get(dim).ub() - original.get(dim).ub()).abs() < f64::EPSILON;
                if reached_opposite {
                    main_face_done = true;
                }
            }
        }
        working
    }

    fn try_project(
        &self,
        c: usize,
        pt: &[f64],
        initial_diam: &[f64],
        original: &IntervalVector,
        working: &mut IntervalVector,
    ) -> SweepStep {
        let constraint = &self.constraints[c];
        let point_box = IntervalVector::new(pt.iter().map(|&x| Interval::degenerate(x)).collect());
        let y = constraint.eval(&point_box);
        let forbidden = constraint.op().forbidden_region();
        if !forbidden.contains(y.mid()) {
            return SweepStep::NoJump;
        }

        let mut forbidden_box = original.clone();
        if !constraint.function().backward(forbidden, &mut forbidden_box) {
            return SweepStep::NoJump;
        }

        for i in 0..forbidden_box.len() {
            let min_width = self.jump_ratio * initial_diam[i];
            if forbidden_box.get(i).diam() < min_width {
                return SweepStep::NoJump;
            }
        }

        let dim = self.order.iter().position(|&d| {
            let f = forbidden_box.get(d);
            f.lb() > working.get(d).lb() + f64::EPSILON || f.ub() < working.get(d).ub() - f64::EPSILON
        });

        let dim = match dim {
            Some(d) => self.order[d],
            None => return SweepStep::NoJump,
        };

        let fb = forbidden_box.get(dim);
        let wb = working.get(dim);
        let complement = if (fb.lb() - wb.lb()).abs() < (wb.ub() - fb.ub()).abs() {
            Interval::new(crate::interval::next_float(fb.ub()), wb.ub())
        } else {
            Interval::new(wb.lb(), crate::interval::previous_float(fb.lb()))
        };
        working.set(dim, complement);

        if dim == self.order[0] {
            SweepStep::MainJump
        } else {
            SweepStep::Jump
        }
    }
}
