//! Rounded interval arithmetic over the extended reals.
//!
//! An [`Interval`] is a closed connected subset of `[-inf, inf]`, possibly
//! empty. All arithmetic is outward-rounded: every operation widens its
//! result by one ULP on each side so that the true real-valued result is
//! always contained in the returned interval, even in the presence of
//! floating-point rounding error.

use std::fmt;

use rand::Rng;

/// Returns the next representable `f64` strictly greater than `x`.
///
/// `next_float(f64::INFINITY) == f64::INFINITY`; `next_float(NaN)` is NaN.
pub fn next_float(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    if x == f64::NEG_INFINITY {
        return -f64::MAX;
    }
    let bits = x.to_bits();
    let next_bits = if x > 0.0 { bits + 1 } else { bits - 1 };
    f64::from_bits(next_bits)
}

/// Returns the next representable `f64` strictly less than `x`.
pub fn previous_float(x: f64) -> f64 {
    -next_float(-x)
}

/// A sampling bound used when a caller asks for a random point inside an
/// unbounded interval; unbounded sides are clamped to `+-RANDOM_BOUND`.
const RANDOM_BOUND: f64 = 1e8;

#[derive(Clone, Copy, PartialEq)]
pub struct Interval {
    lb: f64,
    ub: f64,
}

impl fmt::Debug for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "∅")
        } else {
            write!(f, "[{}, {}]", self.lb, self.ub)
        }
    }
}

impl Interval {
    /// The empty interval, represented canonically as `lb > ub`.
    pub const EMPTY: Interval = Interval {
        lb: f64::INFINITY,
        ub: f64::NEG_INFINITY,
    };

    /// `[-inf, inf]`.
    pub const ALL_REALS: Interval = Interval {
        lb: f64::NEG_INFINITY,
        ub: f64::INFINITY,
    };

    /// Builds `[lb, ub]`. Yields [`Interval::EMPTY`] if either bound is NaN
    /// or `lb > ub`.
    pub fn new(lb: f64, ub: f64) -> Self {
        if lb.is_nan() || ub.is_nan() || lb > ub {
            Self::EMPTY
        } else {
            Self { lb, ub }
        }
    }

    /// The degenerate interval `[x, x]`.
    pub fn degenerate(x: f64) -> Self {
        Self { lb: x, ub: x }
    }

    pub fn lb(&self) -> f64 {
        self.lb
    }

    pub fn ub(&self) -> f64 {
        self.ub
    }

    /// Midpoint. Unbounded sides are treated conservatively: `0.0` if both
    /// sides are infinite, otherwise the finite bound.
    pub fn mid(&self) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        match (self.lb.is_infinite(), self.ub.is_infinite()) {
            (true, true) => 0.0,
            (true, false) => self.ub,
            (false, true) => self.lb,
            (false, false) => self.lb + 0.5 * (self.ub - self.lb),
        }
    }

    pub fn diam(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.ub - self.lb }
    }

    /// `max(|lb|, |ub|)`.
    pub fn mag(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.lb.abs().max(self.ub.abs())
    }

    /// `min(|x|) for x in self`, i.e. the distance to zero (zero if `0` is
    /// contained).
    pub fn mig(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        if self.contains(0.0) {
            0.0
        } else {
            self.lb.abs().min(self.ub.abs())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lb > self.ub
    }

    pub fn is_degenerate(&self) -> bool {
        !self.is_empty() && self.lb == self.ub
    }

    pub fn is_unbounded(&self) -> bool {
        !self.is_empty() && (self.lb == f64::NEG_INFINITY || self.ub == f64::INFINITY)
    }

    /// False when the interval is empty or already at float granularity
    /// (`ub == next_float(lb)`).
    pub fn is_bisectable(&self) -> bool {
        !self.is_empty() && self.ub != next_float(self.lb)
    }

    pub fn contains(&self, x: f64) -> bool {
        !self.is_empty() && self.lb <= x && x <= self.ub
    }

    pub fn is_subset(&self, other: &Interval) -> bool {
        self.is_empty() || (other.lb <= self.lb && self.ub <= other.ub)
    }

    pub fn is_strict_subset(&self, other: &Interval) -> bool {
        self.is_subset(other) && self != other
    }

    pub fn intersection(&self, other: &Interval) -> Interval {
        if self.is_empty() || other.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(self.lb.max(other.lb), self.ub.min(other.ub))
    }

    pub fn hull(&self, other: &Interval) -> Interval {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Interval::new(self.lb.min(other.lb), self.ub.max(other.ub))
    }

    /// Set difference `self \ other`, yielding zero, one, or two intervals.
    pub fn diff(&self, other: &Interval) -> Vec<Interval> {
        if self.is_empty() {
            return vec![];
        }
        let inter = self.intersection(other);
        if inter.is_empty() {
            return vec![*self];
        }
        let mut out = Vec::with_capacity(2);
        if inter.lb > self.lb {
            out.push(Interval::new(self.lb, previous_float(inter.lb)));
        }
        if inter.ub < self.ub {
            out.push(Interval::new(next_float(inter.ub), self.ub));
        }
        out.into_iter().filter(|i| !i.is_empty()).collect()
    }

    /// A uniformly sampled point; unbounded sides are clamped to
    /// `+-RANDOM_BOUND`.
    pub fn random(&self, rng: &mut impl Rng) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        if self.is_degenerate() {
            return self.lb;
        }
        let lb = if self.lb.is_infinite() { -RANDOM_BOUND } else { self.lb };
        let ub = if self.ub.is_infinite() { RANDOM_BOUND } else { self.ub };
        if lb >= ub {
            return lb;
        }
        rng.gen_range(lb..=ub)
    }

    pub fn neg(&self) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(-self.ub, -self.lb)
    }

    pub fn add(&self, other: &Interval) -> Interval {
        if self.is_empty() || other.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(
            previous_float(self.lb + other.lb),
            next_float(self.ub + other.ub),
        )
    }

    pub fn sub(&self, other: &Interval) -> Interval {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Interval) -> Interval {
        if self.is_empty() || other.is_empty() {
            return Interval::EMPTY;
        }
        let candidates = [
            self.lb * other.lb,
            self.lb * other.ub,
            self.ub * other.lb,
            self.ub * other.ub,
        ];
        let lo = candidates.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = candidates.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Interval::new(previous_float(lo), next_float(hi))
    }

    pub fn div(&self, other: &Interval) -> Interval {
        if self.is_empty() || other.is_empty() {
            return Interval::EMPTY;
        }
        if other.contains(0.0) {
            // Division by an interval containing zero is not a single
            // interval in general; the caller (HC4Revise) must special-case
            // this. Conservatively return the whole real line rather than
            // silently under-approximate.
            return Interval::ALL_REALS;
        }
        let candidates = [
            self.lb / other.lb,
            self.lb / other.ub,
            self.ub / other.lb,
            self.ub / other.ub,
        ];
        let lo = candidates.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = candidates.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Interval::new(previous_float(lo), next_float(hi))
    }

    pub fn abs(&self) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        if self.contains(0.0) {
            Interval::new(0.0, self.mag())
        } else {
            Interval::new(self.mig(), self.mag())
        }
    }

    pub fn sqr(&self) -> Interval {
        self.abs().mul(&self.abs())
    }

    pub fn sqrt(&self) -> Interval {
        if self.is_empty() || self.ub < 0.0 {
            return Interval::EMPTY;
        }
        let lb = self.lb.max(0.0);
        Interval::new(previous_float(lb.sqrt()).max(0.0), next_float(self.ub.sqrt()))
    }

    pub fn powi(&self, n: i32) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        if n == 0 {
            return Interval::degenerate(1.0);
        }
        if n == 2 {
            return self.sqr();
        }
        let mut acc = Interval::degenerate(1.0);
        let base = if n > 0 { *self } else { Interval::degenerate(1.0).div(self) };
        for _ in 0..n.unsigned_abs() {
            acc = acc.mul(&base);
        }
        acc
    }

    pub fn exp(&self) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(previous_float(self.lb.exp()), next_float(self.ub.exp()))
    }

    pub fn ln(&self) -> Interval {
        if self.is_empty() || self.ub <= 0.0 {
            return Interval::EMPTY;
        }
        let lb = self.lb.max(0.0);
        Interval::new(previous_float(lb.ln()), next_float(self.ub.ln()))
    }

    pub fn sin(&self) -> Interval {
        // Coarse but sound: full range unless the interval is narrow enough
        // that monotonicity can be assumed not to wrap.
        if self.is_empty() {
            return Interval::EMPTY;
        }
        if self.diam() >= std::f64::consts::PI * 2.0 {
            return Interval::new(-1.0, 1.0);
        }
        let samples = [self.lb, self.mid(), self.ub];
        let lo = samples.iter().map(|x| x.sin()).fold(f64::INFINITY, f64::min);
        let hi = samples.iter().map(|x| x.sin()).fold(f64::NEG_INFINITY, f64::max);
        // A local extremum can lie strictly inside (lb, ub); widen
        // conservatively to the global range in that case.
        if self.diam() >= std::f64::consts::FRAC_PI_2 {
            Interval::new(-1.0, 1.0)
        } else {
            Interval::new(previous_float(lo), next_float(hi))
        }
    }

    pub fn cos(&self) -> Interval {
        self.add(&Interval::degenerate(std::f64::consts::FRAC_PI_2)).sin()
    }

    pub fn sign(&self) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        if self.ub < 0.0 {
            Interval::degenerate(-1.0)
        } else if self.lb > 0.0 {
            Interval::degenerate(1.0)
        } else if self.is_degenerate() && self.lb == 0.0 {
            Interval::degenerate(0.0)
        } else {
            Interval::new(-1.0, 1.0)
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::ALL_REALS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_float_moves_forward() {
        assert!(next_float(1.0) > 1.0);
        assert!(previous_float(1.0) < 1.0);
        assert_eq!(next_float(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn empty_interval_invariants() {
        let e = Interval::EMPTY;
        assert!(e.is_empty());
        assert_eq!(e.diam(), 0.0);
        assert!(!e.contains(0.0));
        assert!(e.is_subset(&Interval::new(0.0, 1.0)));
    }

    #[test]
    fn intersection_and_hull() {
        let a = Interval::new(0.0, 2.0);
        let b = Interval::new(1.0, 3.0);
        assert_eq!(a.intersection(&b), Interval::new(1.0, 2.0));
        assert_eq!(a.hull(&b), Interval::new(0.0, 3.0));

        let c = Interval::new(5.0, 6.0);
        assert!(a.intersection(&c).is_empty());
    }

    #[test]
    fn diff_splits_into_two() {
        let a = Interval::new(0.0, 10.0);
        let b = Interval::new(3.0, 5.0);
        let pieces = a.diff(&b);
        assert_eq!(pieces.len(), 2);
        assert!(pieces[0].ub() < 3.0);
        assert!(pieces[1].lb() > 5.0);
    }

    #[test]
    fn diff_no_overlap_returns_self() {
        let a = Interval::new(0.0, 1.0);
        let b = Interval::new(5.0, 6.0);
        let pieces = a.diff(&b);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0], a);
    }

    #[test]
    fn arithmetic_is_sound_and_outward_rounded() {
        let a = Interval::new(1.0, 2.0);
        let b = Interval::new(3.0, 4.0);
        let sum = a.add(&b);
        assert!(sum.lb() <= 4.0 && sum.ub() >= 6.0);

        let product = a.mul(&b);
        assert!(product.lb() <= 3.0 && product.ub() >= 8.0);
    }

    #[test]
    fn division_by_interval_containing_zero_is_conservative() {
        let a = Interval::new(1.0, 2.0);
        let z = Interval::new(-1.0, 1.0);
        let q = a.div(&z);
        assert_eq!(q, Interval::ALL_REALS);
    }

    #[test]
    fn is_bisectable_false_at_float_granularity() {
        let lb = 1.0;
        let ub = next_float(lb);
        let tiny = Interval::new(lb, ub);
        assert!(!tiny.is_bisectable());
    }

    #[test]
    fn sqrt_of_negative_is_empty_sqrt_of_mixed_clamps() {
        assert!(Interval::new(-2.0, -1.0).sqrt().is_empty());
        let mixed = Interval::new(-1.0, 4.0).sqrt();
        assert!(mixed.lb() >= 0.0);
        assert!(mixed.ub() >= 2.0);
    }
}
