//! Callback hooks invoked once per bisected cell during search/optimization.

use crate::options::SearchOptions;

/// A snapshot handed to [`Callback::call`] after each cell is processed.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    pub nit: usize,
    pub nb_cells_pending: usize,
    pub box_max_diam: f64,
    pub loup: Option<f64>,
    pub uplo: Option<f64>,
}

/// Hook invoked once per cell for logging, monitoring, or early stopping.
pub trait Callback {
    /// Creates a new callback from search/optimizer options.
    fn new(options: &SearchOptions) -> Self
    where
        Self: Sized;

    /// Called after each cell is popped and processed.
    fn call(&mut self, progress: &Progress);
}

/// A callback that does nothing. Use when no per-iteration output is needed.
pub struct NoOpCallback {}

impl Callback for NoOpCallback {
    fn new(_options: &SearchOptions) -> Self {
        Self {}
    }

    fn call(&mut self, _progress: &Progress) {
        // Do nothing
    }
}

/// Prints the frontier size and current bounds to stdout each iteration.
pub struct ConvergenceOutput {}

impl Callback for ConvergenceOutput {
    fn new(_options: &SearchOptions) -> Self {
        Self {}
    }

    fn call(&mut self, progress: &Progress) {
        let txt = format!(
            "| {:6} | pending {:<6} | diam {:<10.3e} | loup {:<12} | uplo {:<12} |",
            progress.nit,
            progress.nb_cells_pending,
            progress.box_max_diam,
            progress.loup.map(|v| format!("{v:.6e}")).unwrap_or_else(|| "-".into()),
            progress.uplo.map(|v| format!("{v:.6e}")).unwrap_or_else(|| "-".into()),
        );
        println!("{}", txt);
    }
}
