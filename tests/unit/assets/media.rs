use super::*;

#[test]
fn parses_plain_seconds() {
    assert_eq!(parse_duration_output("12.345000\n").unwrap(), 12.345);
    assert_eq!(parse_duration_output("\n  3\n").unwrap(), 3.0);
}

#[test]
fn rejects_na_and_non_positive() {
    assert!(matches!(
        parse_duration_output("N/A\n"),
        Err(NarrataError::Scheduling(_))
    ));
    assert!(parse_duration_output("0.0").is_err());
    assert!(parse_duration_output("-1").is_err());
    assert!(parse_duration_output("").is_err());
}

#[test]
fn missing_audio_is_an_input_error_before_spawning() {
    let probe = FfprobeProbe::new("ffprobe-that-does-not-exist");
    let err = probe.duration_secs(Path::new("no/such/audio.mp3")).unwrap_err();
    assert!(matches!(err, NarrataError::Input(_)));
}

#[test]
fn known_duration_ignores_path() {
    assert_eq!(KnownDuration(4.5).duration_secs(Path::new("x")).unwrap(), 4.5);
}
