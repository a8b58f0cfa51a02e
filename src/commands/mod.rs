//! Command implementations for the opack CLI

pub mod completions;
pub mod generate;
pub mod version;
