//! Fatal error classification
//!
//! The closed set of error kinds the capture pipeline recognizes. Raw codes
//! match the host runtime's fatal error codes so records stay comparable with
//! what the host itself reports.

use serde::{Deserialize, Serialize};

/// Classification of a captured runtime error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Fatal run-time error
    Error,
    /// Compile-time parse error
    Parse,
    /// Fatal error during engine startup
    CoreError,
    /// Fatal compile-time error
    CompileError,
    /// User-triggered fatal error
    UserError,
    /// Anything outside the fatal set
    Unknown,
}

impl ErrorKind {
    /// Raw numeric code as reported by the host runtime
    pub fn code(&self) -> u32 {
        match self {
            ErrorKind::Error => 1,
            ErrorKind::Parse => 4,
            ErrorKind::CoreError => 16,
            ErrorKind::CompileError => 64,
            ErrorKind::UserError => 256,
            ErrorKind::Unknown => 0,
        }
    }

    /// Map a raw host code back to a kind
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => ErrorKind::Error,
            4 => ErrorKind::Parse,
            16 => ErrorKind::CoreError,
            64 => ErrorKind::CompileError,
            256 => ErrorKind::UserError,
            _ => ErrorKind::Unknown,
        }
    }

    /// Human-readable label used in alert bodies and the log viewer
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Error => "E_ERROR",
            ErrorKind::Parse => "E_PARSE",
            ErrorKind::CoreError => "E_CORE_ERROR",
            ErrorKind::CompileError => "E_COMPILE_ERROR",
            ErrorKind::UserError => "E_USER_ERROR",
            ErrorKind::Unknown => "FATAL",
        }
    }

    /// Is this one of the kinds that terminates the process?
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ErrorKind::Error
                | ErrorKind::Parse
                | ErrorKind::CoreError
                | ErrorKind::CompileError
                | ErrorKind::UserError
        )
    }
}
