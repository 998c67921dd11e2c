//! Crate-wide error type. `EmptyBox`, `NoBisectableVariable`, and search
//! time-outs are typed control-flow values returned directly from the
//! functions that can produce them ([`crate::bisector::NoBisectableVariable`],
//! [`crate::Status::TimeOut`]) rather than folded in here — this type is for
//! failures that abort construction or an LP call outright.

use derive_more::{Display, Error};

use crate::packing::int_list::IntListError;
use crate::system::SyntaxError;

#[derive(Debug, Display, Error)]
pub enum CoreError {
    #[display("{_0}")]
    Syntax(SyntaxError),
    #[display("{_0}")]
    IntList(IntListError),
    #[display("LP bridge failed to produce a solution (status was not Optimal or Infeasible)")]
    LpBridgeFailure,
}

impl From<SyntaxError> for CoreError {
    fn from(e: SyntaxError) -> Self {
        CoreError::Syntax(e)
    }
}

impl From<IntListError> for CoreError {
    fn from(e: IntListError) -> Self {
        CoreError::IntList(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_and_displays_a_syntax_error() {
        let err: CoreError = SyntaxError::NoVariables.into();
        assert!(err.to_string().contains("no variables"));
    }
}
