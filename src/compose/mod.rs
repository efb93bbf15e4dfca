/// Typed composition graph and render description.
pub mod graph;
