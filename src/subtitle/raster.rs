use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::Resolution;
use crate::foundation::error::{NarrataError, NarrataResult};
use crate::subtitle::layout::{SubtitleLayout, TextMeasure, layout_subtitle};
use crate::subtitle::style::SubtitleStyle;

/// Well-known sans-serif font locations probed when no font is configured.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Font file bytes shared by every rasterizer of a render.
#[derive(Clone, Debug)]
pub struct SubtitleFont {
    source: PathBuf,
    bytes: Arc<Vec<u8>>,
}

impl SubtitleFont {
    /// Load a TrueType/OpenType font from disk.
    pub fn from_path(path: impl AsRef<Path>) -> NarrataResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read font '{}'", path.display()))?;
        if bytes.is_empty() {
            return Err(NarrataError::input(format!(
                "font file '{}' is empty",
                path.display()
            )));
        }
        Ok(Self {
            source: path.to_path_buf(),
            bytes: Arc::new(bytes),
        })
    }

    /// Load `explicit` when given, otherwise the first installed well-known system font.
    pub fn discover(explicit: Option<&Path>) -> NarrataResult<Self> {
        if let Some(p) = explicit {
            return Self::from_path(p);
        }
        let found = SYSTEM_FONT_CANDIDATES
            .iter()
            .map(Path::new)
            .find(|p| p.is_file())
            .ok_or_else(|| {
                NarrataError::input(
                    "no subtitle font configured and no known system font found; set font_path",
                )
            })?;
        tracing::debug!(font = %found.display(), "using system font for subtitles");
        Self::from_path(found)
    }

    /// Path the font was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Raw font bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn shared_bytes(&self) -> Arc<dyn AsRef<[u8]> + Send + Sync> {
        self.bytes.clone()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TextBrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

/// Parley contexts plus the registered family of one font.
struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
}

impl TextLayoutEngine {
    fn new(font: &SubtitleFont) -> NarrataResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::new(font.shared_bytes()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            NarrataError::input(format!(
                "no font families registered from '{}'",
                font.source().display()
            ))
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| NarrataError::input("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl TextMeasure for TextLayoutEngine {
    fn measure_width(&mut self, text: &str, font_size: f32) -> NarrataResult<f32> {
        if text.is_empty() {
            return Ok(0.0);
        }
        Ok(self
            .layout_line(text, font_size, TextBrushRgba8::default())
            .width())
    }
}

/// A rendered subtitle overlay: frame-sized, transparent except for the text.
#[derive(Clone, Debug)]
pub struct SubtitleImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Straight-alpha RGBA8, row-major, tightly packed.
    pub data: Vec<u8>,
}

impl SubtitleImage {
    /// Encode as PNG at `path`, creating parent directories.
    pub fn save_png(&self, path: &Path) -> NarrataResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create overlay dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    /// Return `true` when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }
}

/// CPU subtitle rasterizer backed by Parley shaping and `vello_cpu`.
///
/// One instance per worker; instances share nothing mutable.
pub struct SubtitleRasterizer {
    style: SubtitleStyle,
    engine: TextLayoutEngine,
    font: vello_cpu::peniko::FontData,
}

impl SubtitleRasterizer {
    /// Create a rasterizer for `font` with `style`.
    pub fn new(font: &SubtitleFont, style: SubtitleStyle) -> NarrataResult<Self> {
        let engine = TextLayoutEngine::new(font)?;
        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::new(font.shared_bytes()),
            0,
        );
        Ok(Self {
            style,
            engine,
            font: data,
        })
    }

    /// Wrap and place `text` without drawing it.
    pub fn layout(&mut self, text: &str, res: Resolution) -> NarrataResult<SubtitleLayout> {
        layout_subtitle(text, res, &self.style, &mut self.engine)
    }

    /// Render `text` into a transparent `width x height` overlay.
    pub fn rasterize(&mut self, text: &str, width: u32, height: u32) -> NarrataResult<SubtitleImage> {
        let w: u16 = width
            .try_into()
            .map_err(|_| NarrataError::input("overlay width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| NarrataError::input("overlay height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(NarrataError::input("overlay width/height must be non-zero"));
        }

        let placed = self.layout(text, Resolution { width, height })?;
        let [r, g, b, a] = self.style.color;
        let brush = TextBrushRgba8 { r, g, b, a };

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        for line in &placed.lines {
            let layout = self.engine.layout_line(&line.text, placed.font_size, brush);
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                line.x as f64,
                line.y as f64,
            )));
            for pline in layout.lines() {
                for item in pline.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                    let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&self.font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        }

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        let mut data = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        Ok(SubtitleImage {
            width,
            height,
            data,
        })
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/subtitle/raster.rs"]
mod tests;
