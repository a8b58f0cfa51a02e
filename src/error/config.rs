//! Configuration errors

use super::OpackError;

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> OpackError {
    OpackError::ConfigInvalid {
        message: message.into(),
    }
}

/// Creates a conflicting options error
pub fn conflict(message: impl Into<String>) -> OpackError {
    OpackError::ConfigConflict {
        message: message.into(),
    }
}

/// Creates a PROJECT file parse error
pub fn project_parse_failed(path: impl Into<String>, reason: impl Into<String>) -> OpackError {
    OpackError::ProjectParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
