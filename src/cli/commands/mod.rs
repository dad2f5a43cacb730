//! Command implementations for the paperlens CLI
//!
//! Each command has its own module/file. Every `run` receives the
//! configuration loaded from `--config` (or defaults) and applies its own
//! flag overrides on top.

pub mod config;
pub mod eval;
pub mod similarity;
pub mod spans;

// Re-export argument types for parser
pub use config::ConfigArgs;
pub use eval::EvalArgs;
pub use similarity::SimilarityArgs;
pub use spans::SpansArgs;
