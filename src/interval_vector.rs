//! Boxes: fixed-length Cartesian products of [`Interval`]s.

use rand::Rng;

use crate::interval::Interval;

#[derive(Debug, Clone, PartialEq)]
pub struct IntervalVector {
    components: Vec<Interval>,
}

impl IntervalVector {
    pub fn new(components: Vec<Interval>) -> Self {
        let mut v = Self { components };
        v.canonicalize();
        v
    }

    pub fn constant(n: usize, value: Interval) -> Self {
        Self::new(vec![value; n])
    }

    pub fn empty(n: usize) -> Self {
        Self::new(vec![Interval::EMPTY; n])
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty_vec(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, i: usize) -> Interval {
        self.components[i]
    }

    pub fn set(&mut self, i: usize, value: Interval) {
        self.components[i] = value;
        if value.is_empty() {
            self.set_empty();
        }
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.components
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.components.iter()
    }

    /// A box is empty iff any component is empty. Invariant maintained on
    /// every mutation: setting one component empty marks the whole vector
    /// empty.
    pub fn is_empty(&self) -> bool {
        self.components.iter().any(|c| c.is_empty())
    }

    fn canonicalize(&mut self) {
        if self.components.iter().any(|c| c.is_empty()) {
            self.set_empty();
        }
    }

    pub fn set_empty(&mut self) {
        for c in &mut self.components {
            *c = Interval::EMPTY;
        }
    }

    pub fn max_diam(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.components
            .iter()
            .map(|c| c.diam())
            .fold(0.0, f64::max)
    }

    pub fn min_diam(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.components
            .iter()
            .map(|c| c.diam())
            .fold(f64::INFINITY, f64::min)
    }

    /// Index of the widest component.
    pub fn widest_dim(&self) -> Option<usize> {
        if self.is_empty() || self.components.is_empty() {
            return None;
        }
        self.components
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.diam().partial_cmp(&b.1.diam()).unwrap())
            .map(|(i, _)| i)
    }

    pub fn volume(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.components.iter().map(|c| c.diam()).product()
    }

    pub fn mid(&self) -> Vec<f64> {
        self.components.iter().map(|c| c.mid()).collect()
    }

    pub fn contains(&self, point: &[f64]) -> bool {
        if self.is_empty() || point.len() != self.components.len() {
            return false;
        }
        self.components
            .iter()
            .zip(point.iter())
            .all(|(c, &x)| c.contains(x))
    }

    pub fn is_subset(&self, other: &IntervalVector) -> bool {
        if self.is_empty() {
            return true;
        }
        if other.is_empty() || self.components.len() != other.components.len() {
            return false;
        }
        self.components
            .iter()
            .zip(other.components.iter())
            .all(|(a, b)| a.is_subset(b))
    }

    pub fn is_strict_subset(&self, other: &IntervalVector) -> bool {
        self.is_subset(other) && self != other
    }

    pub fn intersection(&self, other: &IntervalVector) -> IntervalVector {
        assert_eq!(self.components.len(), other.components.len());
        IntervalVector::new(
            self.components
                .iter()
                .zip(other.components.iter())
                .map(|(a, b)| a.intersection(b))
                .collect(),
        )
    }

    pub fn hull(&self, other: &IntervalVector) -> IntervalVector {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        assert_eq!(self.components.len(), other.components.len());
        IntervalVector::new(
            self.components
                .iter()
                .zip(other.components.iter())
                .map(|(a, b)| a.hull(b))
                .collect(),
        )
    }

    /// Splits dimension `i` at `lb + ratio * diam`: `left = [lb, split]`,
    /// `right = [split, ub]`, all other dimensions unchanged.
    pub fn bisect(&self, i: usize, ratio: f64) -> (IntervalVector, IntervalVector) {
        debug_assert!(ratio > 0.0 && ratio < 1.0);
        let comp = self.components[i];
        let split = comp.lb() + ratio * comp.diam();
        let mut left = self.clone();
        let mut right = self.clone();
        left.components[i] = Interval::new(comp.lb(), split);
        right.components[i] = Interval::new(split, comp.ub());
        (left, right)
    }

    /// Set difference, producing up to `2n` boxes: for each dimension in
    /// turn, split off the part of `self` outside `other` in that
    /// dimension, then recurse into the part of `self` that overlaps
    /// `other` in all dimensions processed so far.
    pub fn diff(&self, other: &IntervalVector) -> Vec<IntervalVector> {
        if self.is_empty() {
            return vec![];
        }
        if other.is_empty() {
            return vec![self.clone()];
        }
        assert_eq!(self.components.len(), other.components.len());
        let n = self.components.len();
        let mut result = Vec::new();
        let mut remaining = self.clone();

        for i in 0..n {
            let pieces = remaining.components[i].diff(&other.components[i]);
            for piece in &pieces {
                let mut b = remaining.clone();
                b.components[i] = *piece;
                if !b.is_empty() {
                    result.push(b);
                }
            }
            let inter = remaining.components[i].intersection(&other.components[i]);
            if inter.is_empty() {
                return result;
            }
            remaining.components[i] = inter;
        }
        result
    }

    pub fn random(&self, rng: &mut impl Rng) -> Vec<f64> {
        self.components.iter().map(|c| c.random(rng)).collect()
    }
}

impl std::ops::Index<usize> for IntervalVector {
    type Output = Interval;
    fn index(&self, i: usize) -> &Interval {
        &self.components[i]
    }
}

impl std::ops::IndexMut<usize> for IntervalVector {
    fn index_mut(&mut self, i: usize) -> &mut Interval {
        &mut self.components[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(pairs: &[(f64, f64)]) -> IntervalVector {
        IntervalVector::new(pairs.iter().map(|&(a, b)| Interval::new(a, b)).collect())
    }

    #[test]
    fn empty_propagates() {
        let mut b = iv(&[(0.0, 1.0), (0.0, 1.0)]);
        b.set(0, Interval::EMPTY);
        assert!(b.is_empty());
        assert!(b.get(1).is_empty());
    }

    #[test]
    fn bisect_hull_recovers_input() {
        let b = iv(&[(0.0, 2.0), (0.0, 4.0)]);
        let (left, right) = b.bisect(1, 0.25);
        assert_eq!(left.hull(&right), b);
        assert!(left.get(1).ub() == right.get(1).lb());
        assert_eq!(left.get(0), right.get(0));
    }

    #[test]
    fn diff_covers_complement() {
        let b = iv(&[(0.0, 10.0), (0.0, 10.0)]);
        let hole = iv(&[(3.0, 5.0), (3.0, 5.0)]);
        let pieces = b.diff(&hole);
        assert!(!pieces.is_empty());
        for p in &pieces {
            assert!(p.is_subset(&b));
        }
        // the center of the hole is not covered by any piece
        assert!(!pieces.iter().any(|p| p.contains(&[4.0, 4.0])));
    }

    #[test]
    fn random_point_is_contained() {
        let b = iv(&[(-1.0, 1.0), (2.0, 3.0)]);
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let p = b.random(&mut rng);
            assert!(b.contains(&p));
        }
    }
}
