//! Subtitle chunking, layout and rasterization.

/// Character-budget chunking of narration text.
pub mod chunk;
/// Measurement-driven word wrap and line placement.
pub mod layout;
/// Parley + `vello_cpu` overlay rasterizer.
pub mod raster;
/// Subtitle typography parameters.
pub mod style;
