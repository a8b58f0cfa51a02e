//! File system errors

use super::OpackError;

/// Creates a file read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> OpackError {
    OpackError::FileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> OpackError {
    OpackError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a directory creation error
pub fn dir_create_failed(path: impl Into<String>, reason: impl Into<String>) -> OpackError {
    OpackError::DirCreateFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> OpackError {
    OpackError::IoError {
        message: message.into(),
    }
}
