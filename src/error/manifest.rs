//! Manifest and version parse errors

use super::OpackError;

/// Creates an invalid semantic version error
pub fn version_invalid(version: impl Into<String>, reason: impl Into<String>) -> OpackError {
    OpackError::VersionInvalid {
        version: version.into(),
        reason: reason.into(),
    }
}

/// Creates a manifest parse error; `source_name` identifies the stream or file
pub fn parse_failed(source_name: impl Into<String>, reason: impl Into<String>) -> OpackError {
    OpackError::ManifestParseFailed {
        source_name: source_name.into(),
        reason: reason.into(),
    }
}

/// Creates a base descriptor parse error
pub fn base_parse_failed(path: impl Into<String>, reason: impl Into<String>) -> OpackError {
    OpackError::BaseParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
