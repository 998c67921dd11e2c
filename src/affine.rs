//! Affine arithmetic enclosure.
//!
//! `x in c + sum_i coeffs[i] * e_i + err * [-1, 1]` where each `e_i in
//! [-1, 1]` is an independent noise symbol shared across a whole evaluation
//! (so correlated quantities, e.g. `x - x`, cancel exactly) and `err`
//! collects the radius of every operation this crate cannot represent
//! linearly (products, nonlinear unary ops). Spec §3 leaves the affine
//! parameterization open ("the core never depends on which is in use"); this
//! is this crate's single concrete parameterization, reachable only through
//! [`AffineForm::to_interval`] (`eval_affine2`).

use crate::interval::{next_float, previous_float, Interval};

#[derive(Debug, Clone)]
pub struct AffineForm {
    center: f64,
    /// Dense coefficient vector, one slot per noise symbol in the shared
    /// evaluation; index `i` is the coefficient of variable `i`'s own noise
    /// symbol when this form was seeded from a box.
    coeffs: Vec<f64>,
    /// Independent extra radius accumulated by any operation not
    /// represented exactly in the linear part (always >= 0).
    err: f64,
}

impl AffineForm {
    pub fn constant(value: f64, n_symbols: usize) -> Self {
        Self {
            center: value,
            coeffs: vec![0.0; n_symbols],
            err: 0.0,
        }
    }

    /// Seeds the affine form for variable `i` of an `n`-variable box with
    /// domain `domain`: its own fresh noise symbol carries the full radius.
    pub fn variable(i: usize, n: usize, domain: Interval) -> Self {
        let mut coeffs = vec![0.0; n];
        coeffs[i] = domain.diam() / 2.0;
        Self {
            center: domain.mid(),
            coeffs,
            err: 0.0,
        }
    }

    fn n_symbols(&self) -> usize {
        self.coeffs.len()
    }

    fn align(&mut self, other: &mut AffineForm) {
        let n = self.n_symbols().max(other.n_symbols());
        self.coeffs.resize(n, 0.0);
        other.coeffs.resize(n, 0.0);
    }

    pub fn radius(&self) -> f64 {
        self.coeffs.iter().fold(0.0, |acc, c| acc + c.abs()) + self.err.abs()
    }

    pub fn to_interval(&self) -> Interval {
        let r = self.radius();
        Interval::new(previous_float(self.center - r), next_float(self.center + r))
    }

    pub fn neg(&self) -> AffineForm {
        AffineForm {
            center: -self.center,
            coeffs: self.coeffs.iter().map(|c| -c).collect(),
            err: self.err,
        }
    }

    pub fn add(&self, other: &AffineForm) -> AffineForm {
        let mut a = self.clone();
        let mut b = other.clone();
        a.align(&mut b);
        AffineForm {
            center: a.center + b.center,
            coeffs: a
                .coeffs
                .iter()
                .zip(b.coeffs.iter())
                .map(|(x, y)| x + y)
                .collect(),
            err: a.err + b.err,
        }
    }

    pub fn sub(&self, other: &AffineForm) -> AffineForm {
        self.add(&other.neg())
    }

    pub fn add_scalar(&self, c: f64) -> AffineForm {
        let mut r = self.clone();
        r.center += c;
        r
    }

    pub fn scale(&self, k: f64) -> AffineForm {
        AffineForm {
            center: self.center * k,
            coeffs: self.coeffs.iter().map(|c| c * k).collect(),
            err: self.err * k.abs(),
        }
    }

    /// Affine x affine multiplication. The bilinear cross term is not
    /// representable linearly; its magnitude is bounded and folded into
    /// `err`, which keeps the result a sound (if not maximally tight)
    /// enclosure.
    pub fn mul(&self, other: &AffineForm) -> AffineForm {
        let mut a = self.clone();
        let mut b = other.clone();
        a.align(&mut b);

        let coeffs: Vec<f64> = a
            .coeffs
            .iter()
            .zip(b.coeffs.iter())
            .map(|(x, y)| a.center * y + b.center * x)
            .collect();

        let radius_a: f64 = a.coeffs.iter().fold(0.0, |acc, c| acc + c.abs());
        let radius_b: f64 = b.coeffs.iter().fold(0.0, |acc, c| acc + c.abs());
        let cross = radius_a * radius_b;
        let err = a.err * (b.center.abs() + radius_b)
            + b.err * (a.center.abs() + radius_a)
            + a.err * b.err
            + cross;

        AffineForm {
            center: a.center * b.center,
            coeffs,
            err: err.abs(),
        }
    }

    /// Linearizes a unary nonlinear op using the natural interval range of
    /// the input (min-range approximation): the affine result is the
    /// constant enclosure `eval(to_interval())` promoted to an affine form
    /// with no linear part, which is sound but not tight. Used for
    /// transcendental ops (sqrt, sin, exp, ...).
    pub fn unary_enclosure(&self, eval: impl Fn(Interval) -> Interval) -> AffineForm {
        let image = eval(self.to_interval());
        AffineForm::constant(image.mid(), self.n_symbols()).add(&AffineForm {
            center: 0.0,
            coeffs: vec![0.0; self.n_symbols()],
            err: image.diam() / 2.0,
        })
    }
}
