use super::*;

const HD: Resolution = Resolution {
    width: 1280,
    height: 720,
};

fn iv(a: f64, b: f64) -> TimeInterval {
    TimeInterval::new(a, b).unwrap()
}

fn black() -> BackgroundDescriptor {
    BackgroundDescriptor::SolidColor(ColorValue::Named("black".into()))
}

fn overlays(n: usize) -> Vec<PathBuf> {
    (0..n).map(|i| PathBuf::from(format!("sub_{i}.png"))).collect()
}

#[test]
fn color_background_prepares_at_exact_resolution() {
    let spec = build(
        &black(),
        HD,
        &overlays(1),
        &[iv(0.0, 4.0)],
        Path::new("a.mp3"),
        Path::new("out.mp4"),
    )
    .unwrap();

    assert_eq!(
        spec.manifest.entries()[0],
        InputEntry {
            source: InputSource::Color {
                color: ColorValue::Named("black".into()),
                resolution: HD,
            },
            role: InputRole::Background,
        }
    );
    assert_eq!(
        spec.graph.stages[0],
        Stage::Passthrough {
            input: StreamRef::InputVideo(0),
            output: BASE_LABEL.into(),
        }
    );
}

#[test]
fn overlays_chain_sequentially_in_chunk_order() {
    let windows = [iv(0.0, 2.0), iv(2.0, 5.0), iv(5.0, 10.0)];
    let spec = build(
        &black(),
        HD,
        &overlays(3),
        &windows,
        Path::new("a.mp3"),
        Path::new("out.mp4"),
    )
    .unwrap();

    assert_eq!(spec.manifest.len(), 5);
    assert_eq!(spec.manifest.index_of(InputRole::Audio), Some(1));
    assert_eq!(spec.manifest.index_of(InputRole::Subtitle(2)), Some(4));
    assert_eq!(spec.graph.audio_input, 1);
    assert!(spec.graph.shortest);

    let expected = vec![
        Stage::Passthrough {
            input: StreamRef::InputVideo(0),
            output: "base".into(),
        },
        Stage::Overlay {
            base: StreamRef::Label("base".into()),
            overlay: StreamRef::InputVideo(2),
            gate: windows[0],
            output: "v0".into(),
        },
        Stage::Overlay {
            base: StreamRef::Label("v0".into()),
            overlay: StreamRef::InputVideo(3),
            gate: windows[1],
            output: "v1".into(),
        },
        Stage::Overlay {
            base: StreamRef::Label("v1".into()),
            overlay: StreamRef::InputVideo(4),
            gate: windows[2],
            output: "v".into(),
        },
    ];
    assert_eq!(spec.graph.stages, expected);
    assert_eq!(spec.graph.video_out, VIDEO_OUT_LABEL);
    assert_eq!(spec.overlays.len(), 3);
    assert_eq!(spec.overlays[1].interval, windows[1]);
}

#[test]
fn image_background_is_fitted_and_padded() {
    let dir = PathBuf::from("target").join("unit_compose_graph");
    std::fs::create_dir_all(&dir).unwrap();
    let bg_path = dir.join("bg.png");
    image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]))
        .save(&bg_path)
        .unwrap();

    let spec = build(
        &BackgroundDescriptor::StaticImage(bg_path.clone()),
        HD,
        &overlays(1),
        &[iv(0.0, 1.0)],
        Path::new("a.mp3"),
        Path::new("out.mp4"),
    )
    .unwrap();

    assert_eq!(
        spec.manifest.entries()[0].source,
        InputSource::StillImage { path: bg_path }
    );
    assert_eq!(
        spec.graph.stages[0],
        Stage::FitPad {
            input: StreamRef::InputVideo(0),
            resolution: HD,
            output: "base".into(),
        }
    );
}

#[test]
fn missing_image_background_fails_with_input_error() {
    let err = build(
        &BackgroundDescriptor::StaticImage(PathBuf::from("nope/bg.jpg")),
        HD,
        &overlays(1),
        &[iv(0.0, 1.0)],
        Path::new("a.mp3"),
        Path::new("out.mp4"),
    )
    .unwrap_err();
    assert!(matches!(err, NarrataError::Input(_)));
}

#[test]
fn mismatched_overlay_and_interval_counts_are_rejected() {
    assert!(
        build(
            &black(),
            HD,
            &overlays(2),
            &[iv(0.0, 1.0)],
            Path::new("a.mp3"),
            Path::new("out.mp4"),
        )
        .is_err()
    );
}

#[test]
fn manifest_lists_every_file_the_engine_reads() {
    let spec = build(
        &black(),
        HD,
        &overlays(2),
        &[iv(0.0, 1.0), iv(1.0, 2.0)],
        Path::new("a.mp3"),
        Path::new("out.mp4"),
    )
    .unwrap();
    let files: Vec<&Path> = spec.manifest.file_paths().collect();
    assert_eq!(
        files,
        vec![
            Path::new("a.mp3"),
            Path::new("sub_0.png"),
            Path::new("sub_1.png")
        ]
    );
}
