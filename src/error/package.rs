//! Package record errors

use super::OpackError;

/// Creates a package manifest parse error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> OpackError {
    OpackError::PackageParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid package manifest error
pub fn invalid(message: impl Into<String>) -> OpackError {
    OpackError::PackageInvalid {
        message: message.into(),
    }
}

/// Creates a missing default channel error
pub fn default_channel_missing(package: impl Into<String>, channel: impl Into<String>) -> OpackError {
    OpackError::DefaultChannelMissing {
        package: package.into(),
        channel: channel.into(),
    }
}
