//! Request-level orchestration.

/// Pipeline config and render requests.
pub mod config;
/// Session tying chunking, scheduling, rasterization and rendering together.
pub mod session;
