use super::*;
use crate::context::prepare_text;
use crate::status::{StatusIcon, ViewStatus};

fn view(name: &str, status: ViewStatus) -> EmbeddedView {
    EmbeddedView {
        name: name.to_owned(),
        status,
        ..EmbeddedView::default()
    }
}

// =============================================================
// render_markdown_html
// =============================================================

#[test]
fn renders_gfm_tables_and_strikethrough() {
    let html = render_markdown_html(
        "| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~",
        &ComponentRegistry::new(),
        &RenderOptions::default(),
    );
    assert!(html.contains("<table>"));
    assert!(html.contains("<del>gone</del>"));
}

#[test]
fn raw_html_is_dropped_by_default() {
    let html = render_markdown_html(
        "hello <script>alert(1)</script> world",
        &ComponentRegistry::new(),
        &RenderOptions::default(),
    );
    assert!(!html.contains("<script>"));
    assert!(html.contains("hello"));
}

#[test]
fn raw_html_is_kept_and_normalized_when_allowed() {
    let options = RenderOptions {
        allow_raw_html: true,
        ..RenderOptions::default()
    };
    let html = render_markdown_html("<tableborder=1><tr><td>x</td></tr></table>", &ComponentRegistry::new(), &options);
    assert!(html.contains("<table border=1>"));
}

#[test]
fn raw_html_normalization_handles_multibyte_text() {
    let options = RenderOptions {
        allow_raw_html: true,
        ..RenderOptions::default()
    };
    let registry = ComponentRegistry::new();

    let html = render_markdown_html("风险 <t中文> 分析", &registry, &options);
    assert!(html.contains("风险"));
    assert!(html.contains("分析"));

    let html = render_markdown_html("<tab中>", &registry, &options);
    assert!(html.contains("tab中"));

    let html = render_markdown_html("<tr中=1>表格", &registry, &options);
    assert!(html.contains("表格"));
}

#[test]
fn glued_table_attrs_next_to_multibyte_text_are_normalized() {
    let options = RenderOptions {
        allow_raw_html: true,
        ..RenderOptions::default()
    };
    let html = render_markdown_html(
        "概览\n\n<tableborder=1><tr><td>风险</td></tr></table>",
        &ComponentRegistry::new(),
        &options,
    );
    assert!(html.contains("<table border=1>"));
    assert!(html.contains("风险"));
}

#[test]
fn split_prefix_ignore_case_respects_char_boundaries() {
    assert_eq!(split_prefix_ignore_case("<TABLEx", "<table"), Some(("<TABLE", "x")));
    assert_eq!(split_prefix_ignore_case("<t中文", "<table"), None);
    assert_eq!(split_prefix_ignore_case("<tr", "<tr"), None);
}

#[test]
fn split_inline_component_is_resolved_through_registry() {
    let mut registry = ComponentRegistry::new();
    registry.register("custom-view", |inner| format!("<b data-i=\"{inner}\">card</b>"));
    let html = render_markdown_html("before <custom-view>3</custom-view> after", &registry, &RenderOptions::default());
    assert_eq!(html, "<p>before <b data-i=\"3\">card</b> after</p>\n");
}

#[test]
fn component_inside_html_block_is_resolved() {
    let mut registry = ComponentRegistry::new();
    registry.register("custom-view", |inner| format!("[{inner}]"));
    let html = render_markdown_html(
        "<div>\n<custom-view>1</custom-view>\n</div>\n",
        &registry,
        &RenderOptions::default(),
    );
    assert!(html.contains("[1]"));
    assert!(!html.contains("<div>"));
}

#[test]
fn unregistered_component_is_dropped_as_raw_html() {
    let html = render_markdown_html(
        "x <other-view>1</other-view> y",
        &ComponentRegistry::new(),
        &RenderOptions::default(),
    );
    assert_eq!(html, "<p>x 1 y</p>\n");
}

// =============================================================
// render_prepared_html
// =============================================================

#[test]
fn prepared_text_renders_view_cards_in_place() {
    let prepared = prepare_text(
        r#"Result: <view-tag>{"name":"Query DB","status":"complete","result":"**3 rows**"}</view-tag>"#,
        &RenderOptions::default(),
    );
    let html = render_prepared_html(&prepared, &RenderOptions::default());
    assert!(html.starts_with("<p>Result: </p>\n<div class=\"view-card\">"));
    assert!(!html.contains("<p></p>"));
    assert!(html.contains("view-card__header bg-green-500"));
    assert!(html.contains("Query DB"));
    assert!(html.contains("<strong>3 rows</strong>"));
    assert!(html.contains(StatusIcon::Check.svg()));
}

#[test]
fn view_card_closes_and_reopens_surrounding_paragraph() {
    let prepared = prepare_text(
        r#"before <view-tag>{"name":"scan","status":"complete","result":"ok"}</view-tag> after"#,
        &RenderOptions::default(),
    );
    let html = render_prepared_html(&prepared, &RenderOptions::default());
    let card = html.find("<div class=\"view-card\">").unwrap();
    assert!(html[..card].ends_with("<p>before </p>\n"));
    assert!(html[card..].contains("</div>\n<p> after</p>"));
}

#[test]
fn inline_component_stays_inside_paragraph() {
    let mut registry = ComponentRegistry::new();
    registry.register_component("custom-view", |inner| ComponentHtml::Inline(format!("<em>{inner}</em>")));
    let html = render_markdown_html("a <custom-view>1</custom-view> b", &registry, &RenderOptions::default());
    assert_eq!(html, "<p>a <em>1</em> b</p>\n");
}

#[test]
fn missing_cache_entry_renders_raw_index_text() {
    let prepared = PreparedText {
        text: "see <custom-view>7</custom-view>".to_owned(),
        ..PreparedText::default()
    };
    let html = render_prepared_html(&prepared, &RenderOptions::default());
    assert_eq!(html, "<p>see 7</p>\n");
}

#[test]
fn malformed_tag_renders_as_text_not_card() {
    let prepared = prepare_text("<view-tag>{broken</view-tag>", &RenderOptions::default());
    assert!(prepared.views.is_empty());
    let html = render_prepared_html(&prepared, &RenderOptions::default());
    assert!(!html.contains("view-card"));
}

// =============================================================
// view_card_html
// =============================================================

#[test]
fn card_shows_error_when_result_is_empty() {
    let mut failed = view("Fetch logs", ViewStatus::Failed);
    failed.result = Some(String::new());
    failed.err_msg = Some("connection <refused>".to_owned());
    let html = view_card_html(&failed, &RenderOptions::default());
    assert!(html.contains("view-card__header bg-red-500"));
    assert!(html.contains("view-card__error\">connection &lt;refused&gt;</div>"));
}

#[test]
fn card_with_unknown_status_has_no_class_or_icon() {
    let html = view_card_html(&view("Mystery", ViewStatus::Unknown), &RenderOptions::default());
    assert!(html.contains(r#"<div class="view-card__header"><span class="view-card__name">Mystery</span></div>"#));
    assert!(!html.contains("<svg"));
}

#[test]
fn card_name_is_escaped() {
    let html = view_card_html(&view("<b>x</b>", ViewStatus::Todo), &RenderOptions::default());
    assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
}

#[test]
fn escape_html_covers_special_characters() {
    assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
}
