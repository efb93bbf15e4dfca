use super::*;
use crate::assets::background::BackgroundKind;
use crate::assets::media::KnownDuration;
use crate::encode::engine::RecordingEngine;
use crate::foundation::core::AspectRatio;

fn session_in(dir: &Path) -> Option<NarrationSession> {
    let config = PipelineConfig {
        work_dir: dir.to_path_buf(),
        threads: Some(2),
        ..PipelineConfig::default()
    };
    match NarrationSession::new(config) {
        Ok(s) => Some(s),
        Err(e) => {
            eprintln!("skipping: {e}");
            None
        }
    }
}

fn fixture(name: &str) -> (PathBuf, RenderRequest) {
    let dir = PathBuf::from("target").join("unit_pipeline_session").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let audio = dir.join("voice.mp3");
    std::fs::write(&audio, b"fake audio").unwrap();
    let req = RenderRequest {
        text: "One two three four five six seven eight nine ten eleven twelve thirteen fourteen fifteen sixteen seventeen eighteen nineteen twenty".into(),
        audio_path: audio,
        aspect_ratio: AspectRatio::Landscape,
        background_type: BackgroundKind::Color,
        background_value: "#102030".into(),
        output_path: None,
    };
    (dir, req)
}

#[test]
fn overlay_names_sort_in_chunk_order() {
    assert_eq!(overlay_file_name(0), "subtitle_000.png");
    assert_eq!(overlay_file_name(12), "subtitle_012.png");
    assert!(overlay_file_name(9) < overlay_file_name(10));
}

#[test]
fn thread_pool_honours_thread_count() {
    let pool = build_thread_pool(Some(3)).unwrap();
    assert_eq!(pool.current_num_threads(), 3);
}

#[test]
fn prepare_writes_one_overlay_per_chunk() {
    let (dir, req) = fixture("prepare");
    let Some(session) = session_in(&dir) else {
        return;
    };
    let prepared = session.prepare(&req, &KnownDuration(10.0)).unwrap();

    assert!(prepared.chunks.len() >= 2);
    assert_eq!(prepared.intervals.len(), prepared.chunks.len());
    assert_eq!(prepared.spec.overlays.len(), prepared.chunks.len());
    assert_eq!(prepared.intervals.last().unwrap().end, 10.0);
    for (i, overlay) in prepared.spec.overlays.iter().enumerate() {
        assert_eq!(overlay.path, prepared.overlay_dir.join(overlay_file_name(i)));
        assert!(overlay.path.is_file());
        let (w, h) = image::image_dimensions(&overlay.path).unwrap();
        assert_eq!((w, h), (1280, 720));
    }
    assert_eq!(
        prepared.spec.output_path,
        dir.join(format!("{}.mp4", prepared.render_id))
    );
}

#[test]
fn render_hands_spec_to_engine_once() {
    let (dir, req) = fixture("render");
    let Some(session) = session_in(&dir) else {
        return;
    };
    let mut engine = RecordingEngine::new();
    let out = session
        .render(&req, &KnownDuration(6.0), &mut engine, &RenderControl::default())
        .unwrap();
    assert!(out.is_file());
    assert_eq!(engine.calls().len(), 1);
}

#[test]
fn invalid_duration_stops_before_rasterizing() {
    let (dir, req) = fixture("bad_duration");
    let Some(session) = session_in(&dir) else {
        return;
    };
    let err = session.prepare(&req, &KnownDuration(0.0)).unwrap_err();
    assert!(matches!(err, NarrataError::Scheduling(_)));
    let leftovers: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn repeated_requests_get_separate_storage() {
    let (dir, req) = fixture("repeated");
    let Some(session) = session_in(&dir) else {
        return;
    };
    let first = session.prepare(&req, &KnownDuration(4.0)).unwrap();
    let second = session.prepare(&req, &KnownDuration(4.0)).unwrap();

    assert_ne!(first.render_id, second.render_id);
    assert_ne!(first.overlay_dir, second.overlay_dir);
    assert_ne!(first.spec.output_path, second.spec.output_path);

    std::fs::remove_dir_all(&second.overlay_dir).unwrap();
    for overlay in &first.spec.overlays {
        assert!(overlay.path.is_file());
    }
}

#[test]
fn unusable_font_is_an_internal_error() {
    let (dir, req) = fixture("bad_font");
    let font = dir.join("broken.ttf");
    std::fs::write(&font, b"definitely not an sfnt table").unwrap();
    let config = PipelineConfig {
        work_dir: dir.clone(),
        font_path: Some(font),
        threads: Some(2),
        ..PipelineConfig::default()
    };
    let session = NarrationSession::new(config).unwrap();

    let err = session.prepare(&req, &KnownDuration(4.0)).unwrap_err();
    assert!(matches!(err, NarrataError::Other(_)), "{err:?}");
    assert!(err.to_string().contains("initialize subtitle rasterizer"));
}
