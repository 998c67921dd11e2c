//! Human-readable summaries of a search or optimization run (spec §6).

use std::time::Duration;

use crate::interval_vector::IntervalVector;
use crate::Status;

#[derive(Debug, Clone)]
pub struct PerfCounters {
    pub nb_cells: usize,
    pub nb_contractions: usize,
    pub elapsed: Duration,
}

impl PerfCounters {
    pub fn new() -> Self {
        Self {
            nb_cells: 0,
            nb_contractions: 0,
            elapsed: Duration::ZERO,
        }
    }
}

impl Default for PerfCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Feasibility search outcome.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub status: Status,
    pub solutions: Vec<IntervalVector>,
    pub perf: PerfCounters,
}

/// Global optimization outcome: `loup`/`uplo` are the spec's best-known
/// objective value and certified lower bound.
#[derive(Debug, Clone)]
pub struct OptimizerReport {
    pub status: Status,
    pub loup: f64,
    pub uplo: f64,
    pub loup_box: Option<IntervalVector>,
    pub perf: PerfCounters,
}

/// One-line human-readable summary, e.g. for CLI output.
pub fn report(status: Status, nb_solutions: usize) -> String {
    format!("status={:?} solutions={}", status, nb_solutions)
}

pub fn report_perf(perf: &PerfCounters) -> String {
    format!(
        "cells={} contractions={} elapsed={:.3}s",
        perf.nb_cells,
        perf.nb_contractions,
        perf.elapsed.as_secs_f64()
    )
}

impl SearchReport {
    pub fn summary(&self) -> String {
        format!("{}\n{}", report(self.status, self.solutions.len()), report_perf(&self.perf))
    }
}

impl OptimizerReport {
    pub fn summary(&self) -> String {
        format!(
            "status={:?} loup={:.6e} uplo={:.6e} gap={:.3e}\n{}",
            self.status,
            self.loup,
            self.uplo,
            (self.loup - self.uplo).abs(),
            report_perf(&self.perf)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_summary_mentions_status_and_count() {
        let r = SearchReport {
            status: Status::Feasible,
            solutions: vec![],
            perf: PerfCounters::new(),
        };
        assert!(r.summary().contains("Feasible"));
        assert!(r.summary().contains("solutions=0"));
    }

    #[test]
    fn optimizer_summary_reports_gap() {
        let r = OptimizerReport {
            status: Status::Optimal,
            loup: 1.0,
            uplo: 0.9,
            loup_box: None,
            perf: PerfCounters::new(),
        };
        assert!(r.summary().contains("gap="));
    }
}
