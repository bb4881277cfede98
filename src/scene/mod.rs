//! Scene model: shapes, their boundary physics, and scene configuration.

/// Pairwise velocity exchange between overlapping shapes.
pub mod collision;
/// JSON-loadable scene configuration.
pub mod config;
/// Square and disc shapes with move/render/reflect behavior.
pub mod shape;
