use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(NarrataError::input("x").to_string().contains("input error:"));
    assert!(
        NarrataError::scheduling("x")
            .to_string()
            .contains("scheduling error:")
    );
    assert!(
        NarrataError::cancelled("x")
            .to_string()
            .contains("render cancelled:")
    );
    assert!(
        NarrataError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn render_failure_carries_diagnostics() {
    let err = NarrataError::render("exit status: 1", "Invalid filtergraph");
    let msg = err.to_string();
    assert!(msg.starts_with("render failure:"));
    assert!(msg.contains("exit status: 1"));
    assert!(msg.contains("Invalid filtergraph"));
    assert!(!err.is_pre_render());
}

#[test]
fn input_and_scheduling_are_pre_render() {
    assert!(NarrataError::input("missing audio").is_pre_render());
    assert!(NarrataError::scheduling("zero words").is_pre_render());
    assert!(!NarrataError::cancelled("timeout").is_pre_render());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = NarrataError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
