use super::*;

#[test]
fn parses_hex_rgb_and_rgba() {
    assert_eq!(
        ColorValue::parse("#ff0000").unwrap(),
        ColorValue::Rgba([255, 0, 0, 255])
    );
    assert_eq!(
        ColorValue::parse("0x0000FF80").unwrap(),
        ColorValue::Rgba([0, 0, 255, 128])
    );
}

#[test]
fn names_are_lowercased_and_kept() {
    assert_eq!(
        ColorValue::parse(" Black ").unwrap(),
        ColorValue::Named("black".to_string())
    );
}

#[test]
fn rejects_malformed_values() {
    assert!(ColorValue::parse("").is_err());
    assert!(ColorValue::parse("#12345").is_err());
    assert!(ColorValue::parse("#gg0000").is_err());
    assert!(ColorValue::parse("red;drawtext").is_err());
    assert!(ColorValue::parse("dark blue").is_err());
}

#[test]
fn display_round_trips_hex() {
    let c = ColorValue::parse("#1A2b3C").unwrap();
    assert_eq!(c.to_string(), "#1a2b3c");
    let c = ColorValue::parse("#1a2b3c40").unwrap();
    assert_eq!(c.to_string(), "#1a2b3c40");
}

#[test]
fn shorthand_hex_expands_each_digit() {
    assert_eq!(
        ColorValue::parse("#fff").unwrap(),
        ColorValue::Rgba([255, 255, 255, 255])
    );
    assert_eq!(
        ColorValue::parse("#F80").unwrap(),
        ColorValue::Rgba([255, 136, 0, 255])
    );
    assert_eq!(
        ColorValue::parse("0x0f08").unwrap(),
        ColorValue::Rgba([0, 255, 0, 136])
    );
    assert!(ColorValue::parse("#ffg").is_err());
}
