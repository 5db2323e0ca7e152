//! Exit codes for the um-core CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0: success
//! - 10-19: user/environment errors (recoverable by user action)
//! - 20-29: internal errors

use um_common::ErrorCategory;

/// Exit codes for um-core operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success: report produced
    Clean = 0,

    // ========================================================================
    // User / Environment Errors (10-19)
    // ========================================================================
    /// Invalid arguments or sampling settings
    ArgsError = 10,

    /// Observation input is empty or malformed
    InputError = 11,

    /// Model or sampling configuration is missing or invalid
    ConfigError = 12,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Inference failed (degenerate model, internal error)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code is an internal error (codes 20-29).
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Get the code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Exit code for a top-level error.
    pub fn for_error(err: &um_common::Error) -> Self {
        match err {
            um_common::Error::InvalidSampling(_) | um_common::Error::ZeroSamples { .. } => {
                ExitCode::ArgsError
            }
            _ => match err.category() {
                ErrorCategory::Input => ExitCode::InputError,
                ErrorCategory::Config => ExitCode::ConfigError,
                ErrorCategory::Inference => ExitCode::InternalError,
                ErrorCategory::Io => ExitCode::IoError,
            },
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::ArgsError.as_i32(), 10);
        assert_eq!(ExitCode::InputError.as_i32(), 11);
        assert_eq!(ExitCode::ConfigError.as_i32(), 12);
        assert_eq!(ExitCode::InternalError.as_i32(), 20);
        assert_eq!(ExitCode::IoError.as_i32(), 21);
    }

    #[test]
    fn ranges() {
        assert!(!ExitCode::Clean.is_internal_error());
        assert!(!ExitCode::ConfigError.is_internal_error());
        assert!(ExitCode::InternalError.is_internal_error());
        assert!(!ExitCode::InputError.is_internal_error());
        assert!(ExitCode::IoError.is_internal_error());
    }

    #[test]
    fn errors_map_to_codes() {
        assert_eq!(
            ExitCode::for_error(&um_common::Error::EmptyObservations),
            ExitCode::InputError
        );
        assert_eq!(
            ExitCode::for_error(&um_common::Error::InvalidSymbol {
                position: 0,
                symbol: 'x'
            }),
            ExitCode::InputError
        );
        assert_eq!(
            ExitCode::for_error(&um_common::Error::ZeroSamples {
                algorithm: "gibbs".into()
            }),
            ExitCode::ArgsError
        );
        assert_eq!(
            ExitCode::for_error(&um_common::Error::InvalidModel("x".into())),
            ExitCode::ConfigError
        );
        assert_eq!(
            ExitCode::for_error(&um_common::Error::Degenerate("x".into())),
            ExitCode::InternalError
        );
        assert_eq!(
            ExitCode::for_error(&um_common::Error::Internal("x".into())),
            ExitCode::InternalError
        );
    }

    #[test]
    fn display_includes_name_and_code() {
        assert_eq!(ExitCode::InputError.to_string(), "ERR_INPUT (11)");
    }
}
