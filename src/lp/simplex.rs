//! Reference [`SimplexBackend`]: a dense-tableau, bounded-variable primal
//! simplex with a Big-M phase-1/phase-2 merge. Every row is a ranged
//! constraint `lo <= row . x <= hi`; after a per-row sign flip and a
//! per-variable lower-bound shift, the only columns that carry a finite
//! upper bound are the slacks, so the ratio test only ever needs to
//! consider a bound-flip on those.

use super::{LpModel, Sense, SimplexBackend, Solution, Status};

#[derive(Clone)]
pub struct BoundedSimplex {
    big_m: f64,
    bound_clamp: f64,
    tol: f64,
}

impl BoundedSimplex {
    pub fn new() -> Self {
        Self {
            big_m: 1e7,
            bound_clamp: 1e8,
            tol: 1e-9,
        }
    }
}

impl Default for BoundedSimplex {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp(x: f64, bound: f64) -> f64 {
    if x.is_finite() {
        x.clamp(-bound, bound)
    } else if x > 0.0 {
        bound
    } else {
        -bound
    }
}

impl SimplexBackend for BoundedSimplex {
    fn solve(&mut self, model: &LpModel, max_iter: usize) -> (Status, Option<Solution>, Option<Vec<f64>>) {
        let n = model.n_var;
        let m = model.rows.len();
        if n == 0 || m == 0 {
            return (Status::Unknown, None, None);
        }
        let bc = self.bound_clamp;

        let var_lb: Vec<f64> = (0..n).map(|j| clamp(model.rows[j].lo, bc)).collect();
        for j in 0..n {
            if var_lb[j] > clamp(model.rows[j].hi, bc) + self.tol {
                return (Status::Infeasible, None, None);
            }
        }

        // columns: [0, n) structural (shifted), [n, n+m) slack, [n+m, n+2m) artificial
        let ntot = n + 2 * m;
        let sense_sign = match model.sense {
            Sense::Min => 1.0,
            Sense::Max => -1.0,
        };

        let mut sign = vec![1.0; m];
        let mut tableau = vec![vec![0.0; ntot + 1]; m + 1];
        let mut upper = vec![f64::INFINITY; ntot];

        for i in 0..m {
            let row = &model.rows[i];
            let lo = clamp(row.lo, bc);
            let hi = clamp(row.hi, bc);
            if lo > hi + self.tol {
                return (Status::Infeasible, None, None);
            }
            let c0: f64 = (0..n).map(|j| row.coeffs[j] * var_lb[j]).sum();
            let lo_p = lo - c0;
            let hi_p = hi - c0;
            let s = if lo_p < 0.0 { -1.0 } else { 1.0 };
            sign[i] = s;
            upper[n + i] = (hi_p - lo_p).max(0.0);

            let r = i + 1;
            for j in 0..n {
                tableau[r][j] = s * row.coeffs[j];
            }
            tableau[r][n + i] = -s;
            tableau[r][n + m + i] = 1.0;
            tableau[r][ntot] = s * lo_p;
        }

        let mut cost = vec![0.0; ntot];
        for j in 0..n {
            cost[j] = sense_sign * model.obj[j];
        }
        for i in 0..m {
            cost[n + m + i] = self.big_m;
        }
        tableau[0][..ntot].copy_from_slice(&cost);

        let mut basis: Vec<usize> = (0..m).map(|i| n + m + i).collect();
        for i in 0..m {
            let r = i + 1;
            let factor = tableau[0][basis[i]];
            if factor != 0.0 {
                for col in 0..=ntot {
                    tableau[0][col] -= factor * tableau[r][col];
                }
            }
        }

        let mut at_upper = vec![false; ntot];

        let basic_value = |tableau: &[Vec<f64>], at_upper: &[bool], r: usize, basis: &[usize]| -> f64 {
            let mut v = tableau[r][ntot];
            for (k, &up) in upper.iter().enumerate() {
                if at_upper[k] && k != basis[r - 1] {
                    v -= up * tableau[r][k];
                }
            }
            v
        };

        let iter_cap = max_iter.max(1);
        let bland_threshold = iter_cap - iter_cap / 4;
        let mut status = Status::MaxIter;

        for iter in 0..iter_cap {
            let use_bland = iter >= bland_threshold;

            let mut enter: Option<(usize, f64, f64)> = None;
            for j in 0..ntot {
                if basis.contains(&j) {
                    continue;
                }
                let d = tableau[0][j];
                let (eligible, dir) = if at_upper[j] { (d > self.tol, -1.0) } else { (d < -self.tol, 1.0) };
                if !eligible {
                    continue;
                }
                let score = d.abs();
                let better = match enter {
                    None => true,
                    Some((ec, _, es)) => {
                        if use_bland {
                            j < ec
                        } else {
                            score > es
                        }
                    }
                };
                if better {
                    enter = Some((j, dir, score));
                }
            }

            let (e, dir, _) = match enter {
                Some(v) => v,
                None => {
                    status = Status::Optimal;
                    break;
                }
            };

            let mut best_t = if upper[e].is_finite() { upper[e] } else { f64::INFINITY };
            let mut leave_row: Option<usize> = None;
            let mut leave_at_upper = false;

            for r in 1..=m {
                let coeff = tableau[r][e];
                let delta = -coeff * dir;
                if delta.abs() <= self.tol {
                    continue;
                }
                let v = basic_value(&tableau, &at_upper, r, &basis);
                let bcol = basis[r - 1];
                let t = if delta < 0.0 {
                    v / (-delta)
                } else if upper[bcol].is_finite() {
                    (upper[bcol] - v) / delta
                } else {
                    continue;
                };
                let t = t.max(0.0);
                if t < best_t - self.tol {
                    best_t = t;
                    leave_row = Some(r);
                    leave_at_upper = delta > 0.0;
                } else if t < best_t + self.tol {
                    if let Some(lr) = leave_row {
                        if bcol > basis[lr - 1] {
                            leave_row = Some(r);
                            leave_at_upper = delta > 0.0;
                            best_t = best_t.min(t);
                        }
                    }
                }
            }

            if !best_t.is_finite() {
                status = Status::Unknown;
                break;
            }

            match leave_row {
                None => {
                    at_upper[e] = !at_upper[e];
                }
                Some(r) => {
                    let pivot = tableau[r][e];
                    for col in 0..=ntot {
                        tableau[r][col] /= pivot;
                    }
                    for rr in 0..=m {
                        if rr == r {
                            continue;
                        }
                        let factor = tableau[rr][e];
                        if factor != 0.0 {
                            let pivot_row = tableau[r].clone();
                            for col in 0..=ntot {
                                tableau[rr][col] -= factor * pivot_row[col];
                            }
                        }
                    }
                    let leaving = basis[r - 1];
                    at_upper[leaving] = leave_at_upper;
                    basis[r - 1] = e;
                    at_upper[e] = false;
                }
            }
        }

        let mut value = vec![0.0; ntot];
        for (j, v) in value.iter_mut().enumerate() {
            *v = if at_upper[j] { upper[j] } else { 0.0 };
        }
        for r in 1..=m {
            value[basis[r - 1]] = basic_value(&tableau, &at_upper, r, &basis);
        }

        let artificial_mass: f64 = (0..m).map(|i| value[n + m + i].max(0.0)).sum();
        if artificial_mass > 1e-6 {
            let lambda: Vec<f64> = (0..m).map(|i| sense_sign * tableau[0][n + i]).collect();
            return (Status::Infeasible, None, Some(lambda));
        }

        if matches!(status, Status::Unknown) {
            return (Status::Unknown, None, None);
        }
        if matches!(status, Status::MaxIter) {
            return (Status::MaxIter, None, None);
        }

        let primal: Vec<f64> = (0..n).map(|j| value[j] + var_lb[j]).collect();
        let objective: f64 = (0..n).map(|j| model.obj[j] * primal[j]).sum();
        let dual: Vec<f64> = (0..m).map(|i| sense_sign * tableau[0][n + i]).collect();

        (Status::Optimal, Some(Solution { primal, dual, objective }), None)
    }
}
