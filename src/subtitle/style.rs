use crate::foundation::core::Resolution;

/// Typography and placement parameters for subtitle overlays.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SubtitleStyle {
    /// Font size (px) used when the frame is taller than wide.
    pub portrait_font_size: f32,
    /// Font size (px) used for landscape and square frames.
    pub landscape_font_size: f32,
    /// Line advance as a multiple of the font size.
    pub line_height_factor: f32,
    /// Horizontal padding on each side, as a fraction of the frame width.
    pub side_padding_ratio: f32,
    /// Gap (px) between the bottom of the text block and the frame's bottom edge.
    pub bottom_margin_px: f32,
    /// Text color, straight-alpha RGBA8.
    pub color: [u8; 4],
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            portrait_font_size: 28.0,
            landscape_font_size: 32.0,
            line_height_factor: 1.25,
            side_padding_ratio: 0.08,
            bottom_margin_px: 60.0,
            color: [255, 255, 255, 255],
        }
    }
}

impl SubtitleStyle {
    /// Font size for a frame of the given size.
    pub fn font_size_for(&self, res: Resolution) -> f32 {
        if res.is_portrait() {
            self.portrait_font_size
        } else {
            self.landscape_font_size
        }
    }

    /// Widest a line of text may be on a frame of the given width.
    pub fn max_line_width(&self, frame_width: u32) -> f32 {
        let w = frame_width as f32;
        w - 2.0 * (self.side_padding_ratio * w)
    }
}
