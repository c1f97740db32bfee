use std::io;

pub type Result<T> = std::result::Result<T, Error>;

/// Streams named in [`Error::Io`] that belong to the solver.
pub(crate) const SOLVER_INPUT: &str = "solver input";
pub(crate) const SOLVER_OUTPUT: &str = "solver output";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed input: first line must be a line count, but got {0:?}")]
    InvalidHeader(String),

    #[error("Malformed input: declared {declared} lines, but found {actual}")]
    LineCountMismatch { declared: usize, actual: usize },

    #[error("Protocol violation: solver sent {received} of {expected} responses")]
    ProtocolViolation { expected: usize, received: usize },

    #[error("Reference output is empty: nothing to normalize the score by")]
    EmptyReference,

    #[error("I/O error on {0}: {1}")]
    Io(&'static str, #[source] io::Error),
}

impl Error {
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidHeader(_) | Self::LineCountMismatch { .. }
        )
    }

    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::ProtocolViolation { .. })
    }

    /// The solver broke the exchange (unreadable output, a failed write to
    /// it) rather than the judge side.
    pub fn is_solver_fault(&self) -> bool {
        matches!(self, Self::Io(SOLVER_INPUT | SOLVER_OUTPUT, _))
    }
}
