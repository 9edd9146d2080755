use super::*;

#[test]
fn normalize_conv_id_trims_value() {
    assert_eq!(normalize_conv_id(Some(" c-1 ")), Some("c-1".to_owned()));
}

#[test]
fn normalize_conv_id_rejects_blank_or_missing() {
    assert_eq!(normalize_conv_id(Some("  ")), None);
    assert_eq!(normalize_conv_id(None), None);
}

#[test]
fn theme_toggle_label_offers_opposite_mode() {
    assert_eq!(theme_toggle_label(true), "Light mode");
    assert_eq!(theme_toggle_label(false), "Dark mode");
}
