//! Branch-and-bound global optimizer (spec §4.8): maintains a certified
//! lower bound `uplo` and an incumbent upper bound `loup` while narrowing
//! a [`DoubleHeap`] frontier with an outer (`ctc_out`) and inner
//! (`ctc_in`) contractor pair plus gradient-based monotonicity pruning.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bisector::Bisector;
use crate::buffer::{CellBuffer, DoubleHeap};
use crate::callback::{Callback, Progress};
use crate::cell::{Cell, OptimizerState};
use crate::contractor::BoxedContractor;
use crate::expr::Function;
use crate::interval::Interval;
use crate::interval_vector::IntervalVector;
use crate::options::SearchOptions;
use crate::report::{OptimizerReport, PerfCounters};
use crate::solver::Hooks;
use crate::Status;

/// Outcome of a bounded local-descent attempt (the spec's `minimize`
/// abstract interface, `SUCCESS | FAIL`).
pub enum LocalSearchOutcome {
    Success { point: Vec<f64>, value: f64 },
    Fail,
}

/// An unconstrained-from-the-contractor's-perspective local minimizer the
/// optimizer uses to try to improve `loup` once a cell is proven feasible.
/// Kept behind a trait, as the engine proper is agnostic to which local
/// solver a host plugs in (spec §9: "the optimizer consumes it through the
/// abstract interface `minimize(start_point, out, tol, max_iter)`").
pub trait LocalSearch {
    fn minimize(&self, objective: &Function, bounds: &IntervalVector, start: Vec<f64>) -> LocalSearchOutcome;
}

/// Reference local search: projected gradient descent with halving step
/// size, clamped back onto `bounds` after every step.
pub struct ProjectedGradientDescent {
    pub max_iter: usize,
    pub initial_step: f64,
}

impl ProjectedGradientDescent {
    pub fn new() -> Self {
        Self {
            max_iter: 30,
            initial_step: 0.1,
        }
    }
}

impl Default for ProjectedGradientDescent {
    fn default() -> Self {
        Self::new()
    }
}

fn point_box(x: &[f64]) -> IntervalVector {
    IntervalVector::new(x.iter().map(|&v| Interval::degenerate(v)).collect())
}

impl LocalSearch for ProjectedGradientDescent {
    fn minimize(&self, objective: &Function, bounds: &IntervalVector, start: Vec<f64>) -> LocalSearchOutcome {
        let n = start.len();
        let mut x = start;
        let mut fx = objective.eval(&point_box(&x)).mid();
        let mut lr = self.initial_step;
        for _ in 0..self.max_iter {
            let grad = objective.gradient(&point_box(&x));
            let mut candidate = vec![0.0; n];
            for j in 0..n {
                let v = x[j] - lr * grad.get(j).mid();
                candidate[j] = v.clamp(bounds.get(j).lb(), bounds.get(j).ub());
            }
            let f_candidate = objective.eval(&point_box(&candidate)).mid();
            if f_candidate < fx {
                x = candidate;
                fx = f_candidate;
            } else {
                lr *= 0.5;
            }
        }
        LocalSearchOutcome::Success { point: x, value: fx }
    }
}

/// `min f(x)` over the feasible set certified by `ctc_out`/`ctc_in`.
/// `ctc_out` is any ordinary [`crate::contractor::Contractor`] over the
/// constraints; `ctc_in` contracts the box towards the *infeasible*
/// region, so [`IntervalVector::diff`] against its result recovers
/// sub-boxes proven entirely feasible.
pub struct Optimizer {
    objective: Function,
    ctc_out: BoxedContractor,
    ctc_in: BoxedContractor,
    bisector: Box<dyn Bisector>,
    local_search: Box<dyn LocalSearch>,
    options: SearchOptions,
    rng: StdRng,
}

impl Optimizer {
    pub fn new(
        objective: Function,
        ctc_out: BoxedContractor,
        ctc_in: BoxedContractor,
        bisector: Box<dyn Bisector>,
        options: SearchOptions,
    ) -> Self {
        Self {
            objective,
            ctc_out,
            ctc_in,
            bisector,
            local_search: Box::new(ProjectedGradientDescent::new()),
            options,
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// Swaps in a different local search strategy than the default
    /// [`ProjectedGradientDescent`].
    pub fn with_local_search(mut self, local_search: Box<dyn LocalSearch>) -> Self {
        self.local_search = local_search;
        self
    }

    /// Pins the local-search/random-feasibility-probe seed, for
    /// deterministic replay in tests.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn eval_pf(&self, b: &IntervalVector) -> Interval {
        self.objective.eval(b).intersection(&self.objective.eval_affine2(b))
    }

    fn ymax(&self, loup: f64) -> f64 {
        if !loup.is_finite() {
            return f64::INFINITY;
        }
        loup - (self.options.goal_rel_prec * loup.abs()).max(self.options.goal_abs_prec)
    }

    /// Singleton feasibility probe: `ctc_out` must leave the point
    /// unchanged (non-empty) and `ctc_in` must empty it (proving it lies
    /// outside the infeasible region it tracks).
    fn point_is_feasible(&self, x: &[f64]) -> bool {
        let mut probe = point_box(x);
        if !self.ctc_out.contract(&mut probe) {
            return false;
        }
        let mut probe2 = point_box(x);
        !self.ctc_in.contract(&mut probe2)
    }

    pub fn optimize(&mut self, initial_box: IntervalVector, loup_seed: Option<f64>, hooks: &mut Hooks) -> OptimizerReport {
        let start = std::time::Instant::now();
        let mut loup = loup_seed.unwrap_or(f64::INFINITY);
        let mut loup_point: Option<IntervalVector> = None;
        let mut uplo_of_epsboxes = f64::INFINITY;
        let mut buffer = DoubleHeap::new();
        let mut perf = PerfCounters::new();
        let mut next_id = 1usize;
        let mut nit = 0usize;
        let mut status = Status::Infeasible;

        hooks.terminator.initialize();

        let root_pf = self.eval_pf(&initial_box);
        let mut root = Cell::root(0, initial_box);
        root.optimizer_state = Some(OptimizerState::new(root_pf, loup));
        buffer.push(root);
        perf.nb_cells = 1;

        'outer: while let Some(mut cell) = buffer.pop() {
            nit += 1;

            if let Some(s) = hooks.terminator.terminate() {
                status = s;
                break;
            }
            if let Some(cap) = self.options.max_iter {
                if nit > cap {
                    status = Status::MaxIter;
                    break;
                }
            }

            let mut pf = self.eval_pf(&cell.b);
            let ymax = self.ymax(loup);
            pf = pf.intersection(&Interval::new(f64::NEG_INFINITY, ymax));
            if pf.is_empty() {
                continue;
            }

            perf.nb_contractions += 1;
            let out_result = self.ctc_out.contract_ex(&mut cell.b);
            if !out_result.feasible {
                continue;
            }
            let mut pu = out_result.inactive;

            let mut extra_feasible_boxes: Vec<IntervalVector> = Vec::new();
            let mut in_box = cell.b.clone();
            let in_result = self.ctc_in.contract_ex(&mut in_box);
            if !in_result.feasible {
                pu = true;
            } else if in_box.is_strict_subset(&cell.b) {
                extra_feasible_boxes = cell.b.diff(&in_box);
            }

            if pu {
                let x0 = cell.b.random(&mut self.rng);
                if let LocalSearchOutcome::Success { point, value } = self.local_search.minimize(&self.objective, &cell.b, x0) {
                    if value < loup {
                        loup = value;
                        loup_point = Some(point_box(&point));
                    }
                }
            } else {
                let x = cell.b.random(&mut self.rng);
                if self.point_is_feasible(&x) {
                    let fx = self.objective.eval(&point_box(&x)).mid();
                    if fx < loup {
                        loup = fx;
                        loup_point = Some(point_box(&x));
                    }
                }
            }
            for piece in &extra_feasible_boxes {
                let mid = piece.mid();
                let fx = self.objective.eval(&point_box(&mid)).mid();
                if fx < loup {
                    loup = fx;
                    loup_point = Some(point_box(&mid));
                }

                // Fully feasible by construction (the complement of
                // `ctc_in`'s contraction): pushed back with `pu` pre-set so
                // neither contractor runs on it again.
                let piece_pf = self.eval_pf(piece);
                let piece_cell = Cell {
                    id: next_id,
                    b: piece.clone(),
                    bisector_state: cell.bisector_state,
                    optimizer_state: Some(OptimizerState {
                        pf: piece_pf,
                        pu: true,
                        loup,
                        heap_pos: [None, None],
                    }),
                };
                next_id += 1;
                perf.nb_cells += 1;
                if piece_cell.b.max_diam() <= self.options.precision {
                    uplo_of_epsboxes = uplo_of_epsboxes.min(piece_pf.lb());
                } else {
                    buffer.push(piece_cell);
                }
            }

            if pu {
                let grad = self.objective.gradient(&cell.b);
                for j in 0..cell.b.len() {
                    let gj = grad.get(j);
                    if gj.lb() >= 0.0 {
                        cell.b.set(j, Interval::degenerate(cell.b.get(j).lb()));
                    } else if gj.ub() <= 0.0 {
                        cell.b.set(j, Interval::degenerate(cell.b.get(j).ub()));
                    }
                }
            }

            let new_ymax = self.ymax(loup);
            if new_ymax < ymax {
                buffer.contract(new_ymax);
            }

            hooks.callback.call(&Progress {
                nit,
                nb_cells_pending: buffer.len(),
                box_max_diam: cell.b.max_diam(),
                loup: Some(loup),
                uplo: Some(buffer.uplo().min(uplo_of_epsboxes)),
            });

            if cell.b.max_diam() <= self.options.precision {
                uplo_of_epsboxes = uplo_of_epsboxes.min(pf.lb());
                if uplo_of_epsboxes == f64::NEG_INFINITY {
                    status = Status::Unbounded;
                    break 'outer;
                }
                continue;
            }

            cell.optimizer_state = Some(OptimizerState { pf, pu, loup, heap_pos: [None, None] });

            match self.bisector.bisect(&cell, next_id, next_id + 1) {
                Ok((left, right)) => {
                    next_id += 2;
                    perf.nb_cells += 2;
                    buffer.push(left);
                    buffer.push(right);
                }
                Err(_) => {
                    uplo_of_epsboxes = uplo_of_epsboxes.min(pf.lb());
                    if uplo_of_epsboxes == f64::NEG_INFINITY {
                        status = Status::Unbounded;
                        break 'outer;
                    }
                }
            }
        }

        let uplo = buffer.uplo().min(uplo_of_epsboxes);
        if !matches!(status, Status::TimeOut | Status::MaxIter | Status::Interrupted | Status::Unbounded) {
            status = if buffer.is_empty() {
                if loup.is_finite() {
                    Status::Optimal
                } else {
                    Status::Infeasible
                }
            } else {
                Status::Feasible
            };
        }

        perf.elapsed = start.elapsed();
        OptimizerReport {
            status,
            loup,
            uplo,
            loup_box: loup_point,
            perf,
        }
    }
}
