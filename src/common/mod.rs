//! Common types, traits, and error definitions for rust_navigation
//!
//! This module provides the geometry, obstacle and planner interfaces
//! shared by the planners in this crate.

pub mod types;
pub mod obstacle;
pub mod traits;
pub mod error;

pub use types::*;
pub use obstacle::*;
pub use traits::*;
pub use error::*;
