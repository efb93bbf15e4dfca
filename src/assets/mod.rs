/// Background resolution (color vs. still image).
pub mod background;
/// Solid color parsing.
pub mod color;
/// Audio probing through `ffprobe`.
pub mod media;
