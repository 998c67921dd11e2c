//! A branch-and-contract engine for interval constraint satisfaction and
//! global optimization: an [`expr`] expression DAG evaluated over
//! [`interval`]/[`affine`] enclosures, narrowed by [`contractor`]
//! operators, driving a [`bisector`]-and-[`buffer`] search
//! ([`solver`]/[`optimizer`]) over the box built by [`system`].

pub mod affine;
pub mod bisector;
pub mod buffer;
pub mod callback;
pub mod cell;
pub mod constraint;
pub mod contractor;
pub mod error;
pub mod expr;
pub mod interval;
pub mod interval_matrix;
pub mod interval_vector;
pub mod lp;
pub mod optimizer;
pub mod options;
pub mod packing;
pub mod report;
pub mod solver;
pub mod system;
pub mod terminators;

/// Outcome of a search or optimization run.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Status {
    #[default]
    /// The solver is still running.
    InProgress,
    /// A global optimum (within the requested precision) was certified.
    Optimal,
    /// At least one feasible point was found — a feasibility search result,
    /// or an optimization run stopped before the `loup`/`uplo` gap closed.
    Feasible,
    /// The problem was proven to have no feasible point.
    Infeasible,
    /// The problem is unbounded.
    Unbounded,
    /// The enclosure could not decide feasibility anywhere explored.
    Unknown,
    /// The solver stopped due to a time limit.
    TimeOut,
    /// The solver stopped due to an iteration limit.
    MaxIter,
    /// The solver was interrupted (e.g., by Ctrl-C).
    Interrupted,
}
