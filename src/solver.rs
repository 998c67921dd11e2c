//! Feasibility search (spec §4.7): pop a cell from the frontier, contract
//! it, and either file it as a solution (at or below `precision`), bisect
//! it back onto the frontier, or drop it as proven empty.

use crate::bisector::Bisector;
use crate::buffer::{CellBuffer, DoubleHeap, Fifo, Stack};
use crate::callback::{Callback, Progress};
use crate::cell::Cell;
use crate::contractor::BoxedContractor;
use crate::interval_vector::IntervalVector;
use crate::options::{BufferKind, SearchOptions};
use crate::report::{PerfCounters, SearchReport};
use crate::terminators::Terminator;
use crate::Status;

/// Bundles the two side channels a search run reports through, separate
/// from its [`SearchOptions`] since both are usually constructed once and
/// reused across several `solve` calls with different options.
pub struct Hooks {
    pub callback: Box<dyn Callback>,
    pub terminator: Box<dyn Terminator>,
}

fn make_buffer(kind: BufferKind) -> Box<dyn CellBuffer> {
    match kind {
        BufferKind::Stack => Box::new(Stack::new()),
        BufferKind::Fifo => Box::new(Fifo::new()),
        BufferKind::DoubleHeap => Box::new(DoubleHeap::new()),
    }
}

/// Drives one [`BoxedContractor`] and one [`Bisector`] over a frontier
/// chosen by [`SearchOptions::buffer`]. `Bisector` isn't `DynClone` (unlike
/// `Contractor`), so it's held as a bare boxed trait object rather than
/// threaded through a cloneable generic parameter.
pub struct Solver {
    contractor: BoxedContractor,
    bisector: Box<dyn Bisector>,
    options: SearchOptions,
}

impl Solver {
    pub fn new(contractor: BoxedContractor, bisector: Box<dyn Bisector>, options: SearchOptions) -> Self {
        Self {
            contractor,
            bisector,
            options,
        }
    }

    pub fn solve(&mut self, initial_box: IntervalVector, hooks: &mut Hooks) -> SearchReport {
        let start = std::time::Instant::now();
        let mut buffer = make_buffer(self.options.buffer);
        let mut solutions = Vec::new();
        let mut perf = PerfCounters::new();
        let mut next_id = 1usize;
        let mut status = Status::Infeasible;
        let mut nit = 0usize;

        hooks.terminator.initialize();
        buffer.push(Cell::root(0, initial_box));
        perf.nb_cells = 1;

        while let Some(mut cell) = buffer.pop() {
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
            if let Some(cap) = self.options.max_solutions {
                if solutions.len() >= cap {
                    status = Status::Feasible;
                    break;
                }
            }

            perf.nb_contractions += 1;
            if !self.contractor.contract(&mut cell.b) {
                continue;
            }

            let diam = cell.b.max_diam();
            hooks.callback.call(&Progress {
                nit,
                nb_cells_pending: buffer.len(),
                box_max_diam: diam,
                loup: None,
                uplo: None,
            });

            if diam <= self.options.precision {
                solutions.push(cell.b.clone());
                status = Status::Feasible;
                continue;
            }

            match self.bisector.bisect(&cell, next_id, next_id + 1) {
                Ok((left, right)) => {
                    next_id += 2;
                    perf.nb_cells += 2;
                    buffer.push(left);
                    buffer.push(right);
                }
                Err(_) => {
                    // too narrow to split further along any dimension, but
                    // still above precision: keep it as an uncertain solution.
                    solutions.push(cell.b.clone());
                    status = Status::Feasible;
                }
            }
        }

        if buffer.is_empty() && !matches!(status, Status::TimeOut | Status::MaxIter | Status::Interrupted) {
            status = if solutions.is_empty() {
                Status::Infeasible
            } else {
                Status::Feasible
            };
        }

        perf.elapsed = start.elapsed();
        SearchReport {
            status,
            solutions,
            perf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bisector::RoundRobin;
    use crate::callback::NoOpCallback;
    use crate::contractor::{ContractOutput, Contractor};
    use crate::interval::Interval;
    use crate::terminators::TimeOutTerminator;

    /// A contractor that rejects any box entirely outside `[0, 1]` on every
    /// dimension, and otherwise does nothing — exercises the
    /// bisect-until-precision path without pretending to be a real solver.
    #[derive(Clone)]
    struct UnitBoxOnly;

    impl Contractor for UnitBoxOnly {
        fn nb_var(&self) -> usize {
            1
        }

        fn contract_ex(&self, b: &mut IntervalVector) -> ContractOutput {
            let unit = Interval::new(0.0, 1.0);
            for i in 0..b.len() {
                let inter = b.get(i).intersection(&unit);
                if inter.is_empty() {
                    b.set_empty();
                    return ContractOutput::empty();
                }
                b.set(i, inter);
            }
            ContractOutput::feasible(false)
        }
    }

    fn hooks() -> Hooks {
        Hooks {
            callback: Box::new(NoOpCallback {}),
            terminator: Box::new(TimeOutTerminator::new(3600)),
        }
    }

    #[test]
    fn bisects_down_to_precision_and_collects_solutions() {
        let options = SearchOptions::new().with_precision(0.3);
        let mut solver = Solver::new(Box::new(UnitBoxOnly), Box::new(RoundRobin::new(1e-9, 0.5)), options);
        let initial = IntervalVector::new(vec![Interval::new(0.0, 1.0)]);
        let report = solver.solve(initial, &mut hooks());

        assert_eq!(report.status, Status::Feasible);
        assert!(!report.solutions.is_empty());
        for sol in &report.solutions {
            assert!(sol.max_diam() <= 0.3 + 1e-9);
        }
    }

    #[test]
    fn proves_infeasible_when_contractor_empties_every_cell() {
        let options = SearchOptions::new().with_precision(0.1);
        let mut solver = Solver::new(Box::new(UnitBoxOnly), Box::new(RoundRobin::new(1e-9, 0.5)), options);
        let initial = IntervalVector::new(vec![Interval::new(5.0, 6.0)]);
        let report = solver.solve(initial, &mut hooks());

        assert_eq!(report.status, Status::Infeasible);
        assert!(report.solutions.is_empty());
    }

    #[test]
    fn respects_max_solutions_cap() {
        let options = SearchOptions::new().with_precision(1e-3).with_max_solutions(2);
        let mut solver = Solver::new(Box::new(UnitBoxOnly), Box::new(RoundRobin::new(1e-9, 0.5)), options);
        let initial = IntervalVector::new(vec![Interval::new(0.0, 1.0)]);
        let report = solver.solve(initial, &mut hooks());

        assert_eq!(report.solutions.len(), 2);
    }
}
