use super::*;

fn request_json(audio: &str) -> String {
    format!(
        r#"{{
            "text": "Hello world from the narrator",
            "audio_path": "{audio}",
            "aspect_ratio": "9:16",
            "background_type": "color",
            "background_value": "navy"
        }}"#
    )
}

fn audio_fixture(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_pipeline_config");
    std::fs::create_dir_all(&dir).unwrap();
    let p = dir.join(name);
    std::fs::write(&p, b"fake audio").unwrap();
    p
}

#[test]
fn empty_config_uses_defaults() {
    let cfg = PipelineConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, PipelineConfig::default());
    assert_eq!(cfg.max_chars, 80);
    assert_eq!(cfg.work_dir, PathBuf::from("tmp"));
    assert!(cfg.render_control().timeout.is_none());
}

#[test]
fn config_overrides_and_timeout() {
    let cfg =
        PipelineConfig::from_reader(r#"{"max_chars": 40, "timeout_secs": 9}"#.as_bytes()).unwrap();
    assert_eq!(cfg.max_chars, 40);
    assert_eq!(cfg.render_control().timeout, Some(Duration::from_secs(9)));
}

#[test]
fn config_rejects_zero_budget_and_threads() {
    assert!(matches!(
        PipelineConfig::from_reader(r#"{"max_chars": 0}"#.as_bytes()),
        Err(NarrataError::Input(_))
    ));
    assert!(PipelineConfig::from_reader(r#"{"threads": 0}"#.as_bytes()).is_err());
    assert!(matches!(
        PipelineConfig::from_reader("not json".as_bytes()),
        Err(NarrataError::Serde(_))
    ));
}

#[test]
fn request_parses_from_json() {
    let req: RenderRequest = serde_json::from_str(&request_json("a.mp3")).unwrap();
    assert_eq!(req.aspect_ratio, AspectRatio::Portrait);
    assert_eq!(req.background_type, BackgroundKind::Color);
    assert!(req.output_path.is_none());
}

#[test]
fn content_hash_is_stable_and_content_sensitive() {
    let a: RenderRequest = serde_json::from_str(&request_json("a.mp3")).unwrap();
    let b = a.clone();
    assert_eq!(a.content_hash(), b.content_hash());
    assert_eq!(a.content_hash().len(), 16);

    let mut c = a.clone();
    c.text.push('!');
    assert_ne!(a.content_hash(), c.content_hash());
}

#[test]
fn render_ids_are_fresh_per_call() {
    let req: RenderRequest = serde_json::from_str(&request_json("a.mp3")).unwrap();
    let ids: Vec<String> = (0..64).map(|_| req.new_render_id()).collect();
    for id in &ids {
        assert!(id.starts_with(&format!("{}-", req.content_hash())));
    }
    let unique: std::collections::HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn output_path_defaults_under_work_dir() {
    let mut req: RenderRequest = serde_json::from_str(&request_json("a.mp3")).unwrap();
    let id = req.new_render_id();
    let out = req.resolve_output_path(Path::new("work"), &id);
    assert_eq!(out, Path::new("work").join(format!("{id}.mp4")));

    req.output_path = Some(PathBuf::from("custom/out.mp4"));
    assert_eq!(
        req.resolve_output_path(Path::new("work"), &id),
        PathBuf::from("custom/out.mp4")
    );
}

#[test]
fn validate_rejects_blank_text_and_missing_audio() {
    let audio = audio_fixture("validate.mp3");
    let mut req: RenderRequest =
        serde_json::from_str(&request_json(&audio.to_string_lossy())).unwrap();
    assert!(req.validate().is_ok());

    req.text = "   \n".into();
    assert!(matches!(req.validate(), Err(NarrataError::Input(_))));

    req.text = "hello".into();
    req.audio_path = PathBuf::from("no/such/voice.mp3");
    let err = req.validate().unwrap_err();
    assert!(err.to_string().contains("audio file not found"));
}

#[test]
fn validate_rejects_missing_background_image() {
    let audio = audio_fixture("bg.mp3");
    let mut req: RenderRequest =
        serde_json::from_str(&request_json(&audio.to_string_lossy())).unwrap();
    req.background_type = BackgroundKind::Image;
    req.background_value = "no/such/background.png".into();
    assert!(matches!(req.validate(), Err(NarrataError::Input(_))));
}
