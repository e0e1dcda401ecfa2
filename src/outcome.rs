//! The tri-state result model for randomized checks.

use crate::error::CheckError;

/// A failed trial, carrying the primary error plus any errors suppressed
/// by it when failures were merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    error: CheckError,
    suppressed: Vec<CheckError>,
}

impl Failure {
    /// A failure with no suppressed errors.
    pub fn new(error: CheckError) -> Self {
        Self {
            error,
            suppressed: Vec::new(),
        }
    }

    /// The primary error.
    pub fn error(&self) -> &CheckError {
        &self.error
    }

    /// Errors folded into this failure by later merges, oldest first.
    pub fn suppressed(&self) -> &[CheckError] {
        &self.suppressed
    }

    fn absorb(mut self, other: Failure) -> Self {
        self.suppressed.push(other.error);
        self.suppressed.extend(other.suppressed);
        self
    }
}

/// The outcome of one trial, or of several trials merged.
///
/// A result is either a failure, or a tally of how many trials ran and how
/// many of those were skipped. Merging is associative with `ok`-style
/// tallies as the accumulating case: tallies add up component-wise, a
/// failure wins over any tally, and when two failures meet the first is
/// kept and the second is recorded as suppressed.
#[derive(Debug, Clone, PartialEq)]
pub enum TestResult {
    Failure(Failure),
    Outcome { skipped: u32, total: u32 },
}

impl TestResult {
    /// One passing trial.
    pub fn ok() -> Self {
        TestResult::Outcome {
            skipped: 0,
            total: 1,
        }
    }

    /// One skipped trial.
    pub fn skipped() -> Self {
        TestResult::Outcome {
            skipped: 1,
            total: 1,
        }
    }

    /// One failed trial.
    pub fn failure(error: CheckError) -> Self {
        TestResult::Failure(Failure::new(error))
    }

    /// Shorthand for a failure with a plain message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::failure(CheckError::check_failed(message))
    }

    /// Whether this result is a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, TestResult::Failure(_))
    }

    /// Combine this result with the result of a subsequent trial.
    pub fn merge(self, other: TestResult) -> TestResult {
        match (self, other) {
            (
                TestResult::Outcome { skipped, total },
                TestResult::Outcome {
                    skipped: other_skipped,
                    total: other_total,
                },
            ) => TestResult::Outcome {
                skipped: skipped + other_skipped,
                total: total + other_total,
            },
            (TestResult::Failure(first), TestResult::Failure(second)) => {
                TestResult::Failure(first.absorb(second))
            }
            (failure @ TestResult::Failure(_), _) => failure,
            (_, failure @ TestResult::Failure(_)) => failure,
        }
    }
}
