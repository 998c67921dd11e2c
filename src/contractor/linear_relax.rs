//! Linear relaxation via corner-point affine bounds (spec §4.6), fed
//! through the [`crate::lp::LpBridge`]: each constraint's interval Jacobian
//! over the current box gives a slope that is exact at the midpoint, with
//! the Jacobian's radius times the box's radius bounding how far the true
//! function can stray from that affine approximation — an affine-form
//! (ART-style) underestimator/overestimator pair cheap enough to rebuild
//! every contraction pass. Every variable is then minimized and maximized
//! over the relaxed polytope to tighten its bound, one simplex solve per
//! direction per variable, each solve post-processed by Neumaier–Shcherbina
//! interval recomputation so a tightening is only ever accepted once it is
//! rigorously certified from the dual (an inexact simplex solution can
//! never leak into the box, only a conservative one can).

use super::{ContractOutput, Contractor};
use crate::constraint::{NumConstraint, RelOp};
use crate::interval::Interval;
use crate::interval_vector::IntervalVector;
use crate::lp::{LpBridge, LpRelOp, Sense, SimplexBackend, Status, DEFAULT_MAX_DIAM_BOX};

/// One affine enclosure `f(x) in [lo(x), hi(x)]` valid over the box the
/// gradient was evaluated on, both `lo` and `hi` sharing the same slopes.
struct AffineBound {
    slope: Vec<f64>,
    lo_rhs: f64,
    hi_rhs: f64,
}

fn affine_bound(constraint: &NumConstraint, b: &IntervalVector) -> AffineBound {
    let n = b.len();
    let mid = b.mid();
    let jac = constraint.function().gradient(b);
    let f_mid = constraint.function().eval(&IntervalVector::new(mid.iter().map(|&m| crate::interval::Interval::degenerate(m)).collect()));
    let f_mid = f_mid.mid();

    let slope: Vec<f64> = (0..n).map(|j| jac.get(j).mid()).collect();
    let err: f64 = (0..n)
        .map(|j| (jac.get(j).diam() / 2.0) * (b.get(j).diam() / 2.0))
        .sum();

    let dot_a_mid: f64 = (0..n).map(|j| slope[j] * mid[j]).sum();
    AffineBound {
        slope,
        lo_rhs: dot_a_mid - f_mid - err,
        hi_rhs: dot_a_mid - f_mid + err,
    }
}

#[derive(Clone)]
pub struct LinearRelaxFixPoint<B: SimplexBackend + Clone> {
    constraints: Vec<NumConstraint>,
    backend: B,
    ratio: f64,
    max_iter: usize,
    /// A face already within this distance of the last known primal point
    /// is skipped rather than re-solved.
    lp_tol: f64,
}

impl<B: SimplexBackend + Clone> LinearRelaxFixPoint<B> {
    pub fn new(constraints: Vec<NumConstraint>, backend: B) -> Self {
        Self {
            constraints,
            backend,
            ratio: 0.1,
            max_iter: 20,
            lp_tol: 1e-7,
        }
    }

    fn build_bridge(&self, b: &IntervalVector) -> LpBridge<B> {
        let n = b.len();
        let mut bridge = LpBridge::new(n, self.backend.clone());
        for i in 0..n {
            let iv = b.get(i);
            let mid = iv.mid();
            let lo = if iv.lb().is_finite() { iv.lb() } else { mid - DEFAULT_MAX_DIAM_BOX / 2.0 };
            let hi = if iv.ub().is_finite() { iv.ub() } else { mid + DEFAULT_MAX_DIAM_BOX / 2.0 };
            bridge.set_bound_var(i, lo, hi);
        }
        for c in &self.constraints {
            let affine = affine_bound(c, b);
            match c.op() {
                RelOp::Leq | RelOp::Lt => {
                    bridge.add_constraint(affine.slope.clone(), LpRelOp::Leq, affine.lo_rhs);
                }
                RelOp::Geq | RelOp::Gt => {
                    bridge.add_constraint(affine.slope.clone(), LpRelOp::Geq, affine.hi_rhs);
                }
                RelOp::Eq => {
                    bridge.add_constraint(affine.slope.clone(), LpRelOp::Leq, affine.lo_rhs);
                    bridge.add_constraint(affine.slope, LpRelOp::Geq, affine.hi_rhs);
                }
            }
        }
        bridge
    }

    fn tighten_once(&self, b: &mut IntervalVector) -> bool {
        let n = b.len();
        let mut faces: Vec<(usize, Sense)> = (0..n).flat_map(|i| [(i, Sense::Min), (i, Sense::Max)]).collect();
        let mut last_primal = b.mid();

        while !faces.is_empty() {
            // Achterberg heuristic: resolve the face whose bound sits
            // closest to the last primal point first — it's the cheapest
            // to re-derive from the current basis and the most likely to
            // already be tight.
            let (pos, _) = faces
                .iter()
                .copied()
                .enumerate()
                .min_by(|(_, (i1, s1)), (_, (i2, s2))| {
                    face_distance(&last_primal, b, *i1, *s1).partial_cmp(&face_distance(&last_primal, b, *i2, *s2)).unwrap()
                })
                .unwrap();
            let (i, sense) = faces.remove(pos);

            if face_distance(&last_primal, b, i, sense) <= self.lp_tol {
                continue;
            }

            let mut bridge = self.build_bridge(b);
            bridge.set_var_obj(i, 1.0);
            bridge.set_sense(sense);

            match bridge.solve() {
                Status::Optimal => {
                    if let Some(primal) = bridge.primal() {
                        last_primal = primal.to_vec();
                    }
                    let Some(lambda) = bridge.dual() else { continue };
                    let (lambda_b, at_lambda) = dual_contributions(&bridge, lambda, n);
                    let bound = neumaier_shcherbina_bound(b, lambda_b, &at_lambda, i);

                    let iv = b.get(i);
                    match sense {
                        Sense::Min => {
                            if bound.lb() > iv.lb() {
                                b.set(i, Interval::new(bound.lb().min(iv.ub()), iv.ub()));
                            }
                        }
                        Sense::Max => {
                            if bound.ub() < iv.ub() {
                                b.set(i, Interval::new(iv.lb(), bound.ub().max(iv.lb())));
                            }
                        }
                    }
                }
                Status::Infeasible => {
                    if let Some(lambda) = bridge.infeasibility_direction() {
                        let (lambda_b, at_lambda) = dual_contributions(&bridge, lambda, n);
                        if neumaier_shcherbina_certifies_infeasible(b, lambda_b, &at_lambda) {
                            b.set_empty();
                            return false;
                        }
                        // Not certified: the rigor rule forbids weakening
                        // the box on an uncertified result, so it's left
                        // unchanged.
                    }
                }
                Status::Unknown | Status::TimeOut | Status::MaxIter => {}
            }

            if b.is_empty() {
                return false;
            }
        }
        true
    }
}

/// Distance of the last known primal point from the bound a given face
/// would resolve, used to order faces for the Achterberg heuristic and to
/// decide whether a face is already within tolerance.
fn face_distance(primal: &[f64], b: &IntervalVector, i: usize, sense: Sense) -> f64 {
    let target = match sense {
        Sense::Min => b.get(i).lb(),
        Sense::Max => b.get(i).ub(),
    };
    if !target.is_finite() {
        return f64::INFINITY;
    }
    (primal[i] - target).abs()
}

/// `(λᵀb, Aᵀλ)` for the rows of `bridge`, with rows whose active bound (per
/// the sign of their dual) is non-finite dropped — equivalent to clamping
/// that dual entry to 0, per the rigor rule on unbounded rows.
fn dual_contributions<B: SimplexBackend>(bridge: &LpBridge<B>, lambda: &[f64], n: usize) -> (Interval, Vec<Interval>) {
    let mut lambda_b = Interval::degenerate(0.0);
    let mut at_lambda = vec![Interval::degenerate(0.0); n];
    for (row, &li) in lambda.iter().enumerate() {
        if li == 0.0 {
            continue;
        }
        let (lo, hi) = bridge.rhs_range(row);
        let bound = if li > 0.0 { hi } else { lo };
        if !bound.is_finite() {
            continue;
        }
        let li_iv = Interval::degenerate(li);
        lambda_b = lambda_b.add(&li_iv.mul(&Interval::degenerate(bound)));
        let coeffs = bridge.coefficient_row(row);
        for (j, &a_ij) in coeffs.iter().enumerate() {
            if a_ij == 0.0 {
                continue;
            }
            at_lambda[j] = at_lambda[j].add(&li_iv.mul(&Interval::degenerate(a_ij)));
        }
    }
    (lambda_b, at_lambda)
}

/// Neumaier–Shcherbina post-processing (spec §4.6 step 2): rigorously
/// recomputes `λᵀb − (Aᵀλ − c)ᵀx` in interval arithmetic, `c` being the
/// unit vector on `obj_index`, so an inexact simplex optimum never leaks a
/// bound tighter than what the dual actually certifies.
fn neumaier_shcherbina_bound(b: &IntervalVector, lambda_b: Interval, at_lambda: &[Interval], obj_index: usize) -> Interval {
    let mut cross = Interval::degenerate(0.0);
    for (j, &aj) in at_lambda.iter().enumerate() {
        let mut term = aj;
        if j == obj_index {
            term = term.sub(&Interval::degenerate(1.0));
        }
        cross = cross.add(&term.mul(&b.get(j)));
    }
    lambda_b.sub(&cross)
}

/// Neumaier–Shcherbina infeasibility certification (spec §4.6 step 3): the
/// Farkas direction certifies infeasibility only if `0` is provably outside
/// `(Aᵀλ)·box − λᵀb`; otherwise the result is ignored rather than trusted.
fn neumaier_shcherbina_certifies_infeasible(b: &IntervalVector, lambda_b: Interval, at_lambda: &[Interval]) -> bool {
    let mut cross = Interval::degenerate(0.0);
    for (j, &aj) in at_lambda.iter().enumerate() {
        cross = cross.add(&aj.mul(&b.get(j)));
    }
    let certificate = cross.sub(&lambda_b);
    !certificate.contains(0.0)
}

fn max_relative_shrink(before: &IntervalVector, after: &IntervalVector) -> f64 {
    (0..before.len())
        .map(|i| {
            let d0 = before.get(i).diam();
            if d0 <= 0.0 || !d0.is_finite() {
                0.0
            } else {
                ((d0 - after.get(i).diam()) / d0).max(0.0)
            }
        })
        .fold(0.0, f64::max)
}

impl<B: SimplexBackend + Clone + 'static> Contractor for LinearRelaxFixPoint<B> {
    fn nb_var(&self) -> usize {
        self.constraints.first().map(|c| c.function().nb_var()).unwrap_or(0)
    }

    fn contract_ex(&self, b: &mut IntervalVector) -> ContractOutput {
        if self.constraints.is_empty() {
            return ContractOutput::feasible(true);
        }
        for _ in 0..self.max_iter {
            let before = b.clone();
            if !self.tighten_once(b) {
                return ContractOutput::empty();
            }
            if max_relative_shrink(&before, b) <= self.ratio {
                break;
            }
        }
        ContractOutput::feasible(false)
    }
}
