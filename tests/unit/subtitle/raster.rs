use super::*;

fn system_font() -> Option<SubtitleFont> {
    SubtitleFont::discover(None).ok()
}

#[test]
fn unpremultiply_restores_straight_color() {
    let mut px = vec![128u8, 0, 0, 128, 10, 20, 30, 255, 0, 0, 0, 0];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[255, 0, 0, 128]);
    assert_eq!(&px[4..8], &[10, 20, 30, 255]);
    assert_eq!(&px[8..12], &[0, 0, 0, 0]);
}

#[test]
fn missing_font_file_is_reported() {
    let err = SubtitleFont::from_path("definitely/not/a/font.ttf").unwrap_err();
    assert!(err.to_string().contains("failed to read font"));
}

#[test]
fn rasterized_overlay_is_frame_sized_and_transparent_above_text() {
    let Some(font) = system_font() else {
        eprintln!("skipping: no system font available");
        return;
    };
    let mut r = SubtitleRasterizer::new(&font, SubtitleStyle::default()).unwrap();
    let img = r.rasterize("Hello subtitles", 1280, 720).unwrap();
    assert_eq!((img.width, img.height), (1280, 720));
    assert_eq!(img.data.len(), 1280 * 720 * 4);
    assert!(!img.is_blank());

    // Nothing is drawn in the top half of the frame.
    let top_half = &img.data[..(1280 * 360 * 4)];
    assert!(top_half.chunks_exact(4).all(|px| px[3] == 0));
}

#[test]
fn measured_lines_fit_padded_width() {
    let Some(font) = system_font() else {
        eprintln!("skipping: no system font available");
        return;
    };
    let mut r = SubtitleRasterizer::new(&font, SubtitleStyle::default()).unwrap();
    let text = "A long narrated sentence that certainly needs to wrap across more than one \
                line when it is placed onto a portrait frame for a vertical video";
    let layout = r.layout(text, Resolution { width: 720, height: 1280 }).unwrap();
    assert!(layout.lines.len() > 1);
    for line in &layout.lines {
        assert!(line.width <= 720.0 * 0.84 + 0.5, "{line:?}");
    }
}

#[test]
fn zero_sized_overlay_is_rejected() {
    let Some(font) = system_font() else {
        eprintln!("skipping: no system font available");
        return;
    };
    let mut r = SubtitleRasterizer::new(&font, SubtitleStyle::default()).unwrap();
    assert!(r.rasterize("x", 0, 720).is_err());
}
