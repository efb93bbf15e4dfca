//! Render driver and media engines.
//!
//! The typed [`crate::CompositionGraph`] is turned into engine syntax only here.

/// Render driver: input checks, engine invocation, failure reporting.
pub mod driver;
/// Engine capability trait, controls and the recording engine.
pub mod engine;
/// `ffmpeg`-backed engine and graph serialization.
pub mod ffmpeg;
