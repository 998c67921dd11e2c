//! Plain builder-pattern option structs for the search and optimization
//! loops, in place of a registry-driven options DSL: every field has a
//! sensible default and a `with_*` setter that consumes and returns `self`,
//! matching [`crate::system::SystemBuilder`]'s style.

use crate::bisector::SmearMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BisectorKind {
    RoundRobin,
    LargestFirst,
    Smear(SmearMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Stack,
    Fifo,
    DoubleHeap,
}

/// Options shared by the feasibility search ([`crate::solver`]) and the
/// optimizer ([`crate::optimizer`]).
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub precision: f64,
    pub fixpoint_ratio: f64,
    pub bisection_ratio: f64,
    pub bisector: BisectorKind,
    pub buffer: BufferKind,
    pub acid_shave_ratio: Option<f64>,
    pub use_linear_relax: bool,
    pub time_limit_secs: Option<u64>,
    pub max_iter: Option<usize>,
    pub max_solutions: Option<usize>,
    pub handle_interrupt: bool,
    /// Relative term of the optimizer's `ymax` threshold: `loup - max(rel *
    /// |loup|, abs)`.
    pub goal_rel_prec: f64,
    /// Absolute term of the same threshold.
    pub goal_abs_prec: f64,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self {
            precision: 1e-8,
            fixpoint_ratio: 0.1,
            bisection_ratio: 0.5,
            bisector: BisectorKind::RoundRobin,
            buffer: BufferKind::Stack,
            acid_shave_ratio: None,
            use_linear_relax: false,
            time_limit_secs: None,
            max_iter: None,
            max_solutions: None,
            handle_interrupt: false,
            goal_rel_prec: 1e-3,
            goal_abs_prec: 1e-7,
        }
    }

    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_fixpoint_ratio(mut self, ratio: f64) -> Self {
        self.fixpoint_ratio = ratio;
        self
    }

    pub fn with_bisection_ratio(mut self, ratio: f64) -> Self {
        self.bisection_ratio = ratio;
        self
    }

    pub fn with_bisector(mut self, bisector: BisectorKind) -> Self {
        self.bisector = bisector;
        self
    }

    pub fn with_buffer(mut self, buffer: BufferKind) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_acid_shave_ratio(mut self, ratio: f64) -> Self {
        self.acid_shave_ratio = Some(ratio);
        self
    }

    pub fn with_linear_relax(mut self, enabled: bool) -> Self {
        self.use_linear_relax = enabled;
        self
    }

    pub fn with_time_limit_secs(mut self, secs: u64) -> Self {
        self.time_limit_secs = Some(secs);
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    pub fn with_max_solutions(mut self, max_solutions: usize) -> Self {
        self.max_solutions = Some(max_solutions);
        self
    }

    pub fn with_interrupt_handling(mut self, enabled: bool) -> Self {
        self.handle_interrupt = enabled;
        self
    }

    pub fn with_goal_rel_prec(mut self, rel: f64) -> Self {
        self.goal_rel_prec = rel;
        self
    }

    pub fn with_goal_abs_prec(mut self, abs: f64) -> Self {
        self.goal_abs_prec = abs;
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_permissive() {
        let opts = SearchOptions::new();
        assert!(opts.time_limit_secs.is_none());
        assert!(opts.max_iter.is_none());
        assert_eq!(opts.bisector, BisectorKind::RoundRobin);
    }

    #[test]
    fn builder_overrides_stick() {
        let opts = SearchOptions::new().with_precision(1e-4).with_max_solutions(10);
        assert_eq!(opts.precision, 1e-4);
        assert_eq!(opts.max_solutions, Some(10));
    }
}
