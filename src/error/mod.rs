//! Error types and handling for opack
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`config`]: Run configuration errors (detected before any side effect)
//! - [`manifest`]: Manifest, base descriptor and version parse errors
//! - [`package`]: Package record consistency errors
//! - [`fs`]: File system errors

pub mod config;
pub mod fs;
pub mod manifest;
pub mod package;

pub use config::{conflict as config_conflict, invalid as config_invalid};
pub use fs::{
    dir_create_failed, io_error, read_failed as file_read_failed,
    write_failed as file_write_failed,
};
pub use manifest::{
    base_parse_failed, parse_failed as manifest_parse_failed, version_invalid,
};
pub use package::{
    default_channel_missing, invalid as package_invalid, parse_failed as package_parse_failed,
};

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for opack operations
#[derive(Error, Diagnostic, Debug)]
pub enum OpackError {
    // Configuration errors
    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(opack::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Conflicting options: {message}")]
    #[diagnostic(
        code(opack::config::conflict),
        help("Remove one of the conflicting options and run again")
    )]
    ConfigConflict { message: String },

    #[error("Failed to parse PROJECT file: {path}: {reason}")]
    #[diagnostic(code(opack::config::project_parse_failed))]
    ProjectParseFailed { path: String, reason: String },

    // Parse errors
    #[error("Invalid semantic version '{version}': {reason}")]
    #[diagnostic(
        code(opack::manifest::version_invalid),
        help("Versions must follow semantic versioning, e.g. 0.0.1 or 1.2.3-rc.1")
    )]
    VersionInvalid { version: String, reason: String },

    #[error("Failed to parse manifest from {source_name}: {reason}")]
    #[diagnostic(code(opack::manifest::parse_failed))]
    ManifestParseFailed { source_name: String, reason: String },

    #[error("Error reading ClusterServiceVersion base {path}: {reason}")]
    #[diagnostic(
        code(opack::manifest::base_parse_failed),
        help("Fix or remove the base file; without it an empty ClusterServiceVersion is used")
    )]
    BaseParseFailed { path: String, reason: String },

    // Package record errors
    #[error("Failed to parse package manifest {path}: {reason}")]
    #[diagnostic(code(opack::package::parse_failed))]
    PackageParseFailed { path: String, reason: String },

    #[error("Invalid package manifest: {message}")]
    #[diagnostic(code(opack::package::invalid))]
    PackageInvalid { message: String },

    #[error("Default channel '{channel}' does not exist in package '{package}'")]
    #[diagnostic(
        code(opack::package::default_channel_missing),
        help("Pass --channel together with --default-channel to create it")
    )]
    DefaultChannelMissing { package: String, channel: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(opack::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(opack::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to create directory: {path}: {reason}")]
    #[diagnostic(code(opack::fs::dir_create_failed))]
    DirCreateFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(opack::fs::io_error))]
    IoError { message: String },
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, OpackError>;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_error_contains {
        ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
            #[test]
            fn $test_name() {
                let err = $err;
                let error_string = err.to_string();
                $(
                    assert!(error_string.contains($contains),
                        "Error message should contain '{}', got: {}",
                        $contains,
                        error_string
                    );
                )+
            }
        };
    }

    #[test]
    fn test_error_code() {
        let err = config_conflict("--output-dir cannot be set if writing to stdout");
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("opack::config::conflict".to_string())
        );
    }

    test_error_contains!(
        test_io_error,
        io_error("Failed to read stdin: broken pipe"),
        "IO error",
        "broken pipe"
    );

    test_error_contains!(
        test_config_invalid,
        config_invalid("--version must be set"),
        "Invalid configuration",
        "--version must be set"
    );

    test_error_contains!(
        test_version_invalid,
        version_invalid("1.x", "unexpected character"),
        "Invalid semantic version '1.x'"
    );

    test_error_contains!(
        test_manifest_parse_failed,
        manifest_parse_failed("deploy/role.yaml (document 2)", "missing kind"),
        "deploy/role.yaml (document 2)",
        "missing kind"
    );

    test_error_contains!(
        test_base_parse_failed,
        base_parse_failed("config/manifests/bases/memcached.clusterserviceversion.yaml", "bad"),
        "Error reading ClusterServiceVersion base"
    );

    test_error_contains!(
        test_default_channel_missing,
        default_channel_missing("memcached-operator", "beta"),
        "Default channel 'beta'",
        "memcached-operator"
    );

    test_error_contains!(
        test_dir_create_failed,
        dir_create_failed("/read-only/0.0.1", "permission denied"),
        "Failed to create directory",
        "/read-only/0.0.1"
    );

    #[test]
    fn test_file_write_failed() {
        let err = file_write_failed("/path/to/file.yaml", "disk full");
        assert!(matches!(err, OpackError::FileWriteFailed { .. }));
        assert!(err.to_string().contains("Failed to write file"));
    }

    #[test]
    fn test_package_parse_failed_code() {
        let err = package_parse_failed("memcached.package.yaml", "expected a mapping");
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("opack::package::parse_failed".to_string())
        );
    }
}
