//! Error types shared across the solver.

use std::fmt;

/// Errors produced by tour construction, optimizer setup, and the driver.
#[derive(Debug, Clone)]
pub enum SolverError {
    /// The greedy builder got stuck mid-tour or could not close the cycle.
    /// No partial tour is ever returned.
    NoFeasibleTour { reason: String },
    /// Optimizer preconditions violated at construction time.
    InvalidConfig { reason: String },
    /// Driver-side file error (city-name file, output files).
    Io(String),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::NoFeasibleTour { reason } => {
                write!(f, "no feasible tour: {}", reason)
            }
            SolverError::InvalidConfig { reason } => {
                write!(f, "invalid configuration: {}", reason)
            }
            SolverError::Io(msg) => write!(f, "i/o error: {}", msg),
        }
    }
}

impl std::error::Error for SolverError {}

impl From<std::io::Error> for SolverError {
    fn from(e: std::io::Error) -> Self {
        SolverError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = SolverError::NoFeasibleTour {
            reason: "stuck at Lyon".to_string(),
        };
        assert!(e.to_string().contains("no feasible tour"));
        assert!(e.to_string().contains("Lyon"));
    }
}
