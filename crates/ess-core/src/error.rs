//! Error handling for the ESS workspace
//!
//! One shared error type for the synthesis and streaming crates. Every
//! failure here is a contract violation meant to halt the affected stream;
//! there is no retry policy anywhere.

use core::fmt;

/// Result type alias for ESS operations
pub type EssResult<T> = Result<T, EssError>;

/// Error type for all ESS operations
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EssError {
    /// Invalid box settings, fatal at initialize time
    Configuration {
        /// Description of the configuration problem
        message: String,
    },

    /// Stimulation label missing from the injected label table
    UnknownLabel {
        /// The label that could not be resolved
        label: String,
    },

    /// Caller passed an argument outside the component contract
    InvalidArgument {
        /// Description of the argument problem
        reason: String,
    },

    /// A signal chunk's declared start does not continue the stream
    ChunkDiscontinuity {
        /// End time recorded for the previous chunk
        expected: f64,
        /// Start time declared by the offending chunk
        actual: f64,
    },

    /// Internal transform or reshape failure
    Processing {
        /// Description of the processing failure
        message: String,
    },
}

impl fmt::Display for EssError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EssError::Configuration { message } => {
                write!(f, "Configuration error: {}", message)
            }
            EssError::UnknownLabel { label } => {
                write!(f, "Unknown stimulation label: {}", label)
            }
            EssError::InvalidArgument { reason } => {
                write!(f, "Invalid argument: {}", reason)
            }
            EssError::ChunkDiscontinuity { expected, actual } => {
                write!(
                    f,
                    "Chunk discontinuity: expected start {}s, chunk declared {}s",
                    expected, actual
                )
            }
            EssError::Processing { message } => {
                write!(f, "Processing error: {}", message)
            }
        }
    }
}

impl std::error::Error for EssError {}

/// Convenience macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::error::EssError::Configuration {
            message: format!($($arg)*),
        }
    };
}

/// Convenience macro for creating invalid-argument errors
#[macro_export]
macro_rules! argument_error {
    ($($arg:tt)*) => {
        $crate::error::EssError::InvalidArgument {
            reason: format!($($arg)*),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = EssError::ChunkDiscontinuity {
            expected: 0.5,
            actual: 0.75,
        };
        let display = format!("{}", error);
        assert!(display.contains("discontinuity"));
        assert!(display.contains("0.5"));
        assert!(display.contains("0.75"));
    }

    #[test]
    fn test_error_equality() {
        let error1 = EssError::UnknownLabel {
            label: "target".to_string(),
        };
        let error2 = EssError::UnknownLabel {
            label: "target".to_string(),
        };
        assert_eq!(error1, error2);
    }

    #[test]
    fn test_error_macros() {
        let error = config_error!("needs exactly {} settings", 2);
        assert_eq!(
            error,
            EssError::Configuration {
                message: "needs exactly 2 settings".to_string()
            }
        );

        let error = argument_error!("channel count must be positive");
        assert!(matches!(error, EssError::InvalidArgument { .. }));
    }
}
