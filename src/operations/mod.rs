//! High-level operations behind the CLI commands
//!
//! - GenerateOperation: collect manifests, merge the ClusterServiceVersion,
//!   update the package manifest and write everything out

pub mod generate;

pub use generate::{GenerateOperation, GenerateReport};
