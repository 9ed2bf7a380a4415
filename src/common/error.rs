//! Error types for rust_navigation
//!
//! Planning itself never fails with an error: an unreachable goal is an
//! ordinary `None`. These errors cover building a planner and loading its
//! configuration.

use thiserror::Error;

/// Main error type for navigation components
#[derive(Debug, Error)]
pub enum NavigationError {
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Rendering a figure failed
    #[error("Plot error: {0}")]
    Plot(String),
}

/// Result type alias for navigation operations
pub type NavigationResult<T> = Result<T, NavigationError>;
