/// Word-proportional subtitle timing.
pub mod schedule;
