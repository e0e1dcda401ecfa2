//! Error types for check execution and generator resolution.

use std::fmt;

/// Error carried by a failed trial or a failed run.
///
/// Recoverable conditions are modeled here; fatal construction misuse
/// (an empty one-of universe, a probability outside `[0, 1]`, an empty
/// range, an exhausted filter) panics at the offending call site instead,
/// because it signals a broken test setup rather than a failing property.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckError {
    /// The user check signaled a failure or raised an error.
    CheckFailed {
        message: String,
        context: Option<String>,
    },

    /// A completed run skipped more trials than the configured budget allows.
    SkipBudgetExceeded {
        skipped: u32,
        allowed: u32,
        total: u32,
    },

    /// No generator could be resolved for a declared parameter shape.
    UnresolvableShape { shape: String },
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::CheckFailed { message, context } => {
                write!(f, "Check failed: {}", message)?;
                if let Some(ctx) = context {
                    write!(f, " (context: {})", ctx)?;
                }
                Ok(())
            }
            CheckError::SkipBudgetExceeded {
                skipped,
                allowed,
                total,
            } => {
                write!(
                    f,
                    "Skip budget exceeded: {} of {} trials skipped (allowed: {})",
                    skipped, total, allowed
                )
            }
            CheckError::UnresolvableShape { shape } => {
                write!(f, "No generator registered for shape: {}", shape)
            }
        }
    }
}

impl std::error::Error for CheckError {}

impl CheckError {
    /// Create a simple check failure.
    pub fn check_failed(message: impl Into<String>) -> Self {
        Self::CheckFailed {
            message: message.into(),
            context: None,
        }
    }

    /// Create a check failure with additional context.
    pub fn check_failed_with_context(
        message: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::CheckFailed {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create the synthetic error reported when a run exceeds its skip budget.
    pub fn skip_budget_exceeded(skipped: u32, allowed: u32, total: u32) -> Self {
        Self::SkipBudgetExceeded {
            skipped,
            allowed,
            total,
        }
    }

    /// Create an unresolvable-shape error for the given shape description.
    pub fn unresolvable_shape(shape: impl Into<String>) -> Self {
        Self::UnresolvableShape {
            shape: shape.into(),
        }
    }
}
