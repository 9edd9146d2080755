use super::*;
use views::{ChatMessage, Role};

fn body_of(message: &ChatMessage) -> MessageBody {
    prepare_message(message, &RenderOptions::default())
}

// =============================================================
// BodyKind
// =============================================================

#[test]
fn user_message_uses_user_layout() {
    let body = body_of(&ChatMessage::text(Role::User, "**not markdown**"));
    assert_eq!(BodyKind::of(&body), BodyKind::User);
}

#[test]
fn view_text_uses_markdown_layout() {
    let body = body_of(&ChatMessage::text(Role::View, "# Report"));
    assert_eq!(BodyKind::of(&body), BodyKind::Markdown);
}

#[test]
fn view_json_uses_panes_layout() {
    let body = body_of(&ChatMessage::text(Role::View, r#"{"left":"overview","right":[]}"#));
    assert_eq!(BodyKind::of(&body), BodyKind::Panes);
}

#[test]
fn template_context_uses_template_layout() {
    let message: ChatMessage = serde_json::from_str(
        r#"{"role":"view","context":{"template_name":"Credit","template_introduce":"Scores"}}"#,
    )
    .unwrap();
    assert_eq!(BodyKind::of(&body_of(&message)), BodyKind::Template);
}

// =============================================================
// Helpers
// =============================================================

#[test]
fn model_badge_trims_name() {
    assert_eq!(model_badge(Some("  gpt-risk ")), Some("gpt-risk".to_owned()));
}

#[test]
fn model_badge_hides_blank_names() {
    assert_eq!(model_badge(Some("   ")), None);
    assert_eq!(model_badge(None), None);
}

#[test]
fn markdown_html_skips_blank_text() {
    let prepared = PreparedText::default();
    assert_eq!(markdown_html(&prepared, &RenderOptions::default()), "");
}

#[test]
fn markdown_html_renders_text() {
    let prepared = PreparedText { text: "plain *text*".to_owned(), ..PreparedText::default() };
    let html = markdown_html(&prepared, &RenderOptions::default());
    assert!(html.contains("<em>text</em>"));
}
