//! Utility modules for rust_navigation

pub mod visualization;

pub use visualization::{colors, plot_scene, PathStyle, PointStyle, Visualizer};
