//! Utility modules for the transformation engine.

pub mod errors;

// Re-exports
pub use errors::*;
