//! QOTD SDK
//!
//! Shared types and error taxonomy for the qotd engine.
//! Nothing in this crate performs I/O.

/// Error types and handling
pub mod errors;

/// Question and theme types
pub mod types;

// Re-export commonly used types
pub use errors::{EngineError, QotdErrorExt};
pub use types::{HistoryEntry, ThemeContext, ThemeSource};
