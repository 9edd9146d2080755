//! Markdown rendering with a custom-component registry.
//!
//! ARCHITECTURE
//! ============
//! `pulldown-cmark` hands inline HTML to us in pieces: a placeholder in a
//! paragraph arrives as `InlineHtml("<custom-view>")`, `Text("0")`,
//! `InlineHtml("</custom-view>")`. The renderer stitches those pieces back
//! together and asks the registry for the component's HTML. Raw HTML that is
//! not a registered component is dropped unless the options allow it.

#[cfg(test)]
#[path = "markdown_test.rs"]
mod markdown_test;

use std::collections::HashMap;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

use crate::RenderOptions;
use crate::context::PreparedText;
use crate::extract::PLACEHOLDER_TAG;
use crate::message::EmbeddedView;
use crate::status::status_style;

type RenderFn<'a> = Box<dyn Fn(&str) -> ComponentHtml + 'a>;

/// HTML produced by a registered component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComponentHtml {
    /// Phrasing content; stays inside the surrounding paragraph.
    Inline(String),
    /// Flow content such as a card; the surrounding paragraph is closed
    /// around it so no `<div>` ends up inside a `<p>`.
    Block(String),
}

impl ComponentHtml {
    #[must_use]
    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block(_))
    }

    #[must_use]
    pub fn into_html(self) -> String {
        match self {
            Self::Inline(html) | Self::Block(html) => html,
        }
    }
}

/// Custom tag name → renderer for the tag's inner text.
#[derive(Default)]
pub struct ComponentRegistry<'a> {
    components: HashMap<String, RenderFn<'a>>,
}

impl<'a> ComponentRegistry<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an inline `render` for `<name>...</name>`. Later
    /// registrations win.
    pub fn register(&mut self, name: &str, render: impl Fn(&str) -> String + 'a) -> &mut Self {
        self.register_component(name, move |inner| ComponentHtml::Inline(render(inner)))
    }

    /// Register a renderer that chooses inline or block layout per call.
    pub fn register_component(&mut self, name: &str, render: impl Fn(&str) -> ComponentHtml + 'a) -> &mut Self {
        self.components
            .insert(name.to_ascii_lowercase(), Box::new(render));
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(&name.to_ascii_lowercase())
    }

    /// Render a registered component, or `None` for an unknown tag.
    #[must_use]
    pub fn render(&self, name: &str, inner: &str) -> Option<String> {
        self.render_component(name, inner).map(ComponentHtml::into_html)
    }

    /// Like [`Self::render`], keeping the layout the component chose.
    #[must_use]
    pub fn render_component(&self, name: &str, inner: &str) -> Option<ComponentHtml> {
        self.components
            .get(&name.to_ascii_lowercase())
            .map(|render| render(inner))
    }

    /// Earliest `<name>` of any registered component in `fragment`.
    fn find_open<'f>(&self, fragment: &'f str) -> Option<(usize, &'f str)> {
        let mut best: Option<(usize, &'f str)> = None;
        let mut search = 0;
        while let Some(offset) = fragment[search..].find('<') {
            let start = search + offset;
            let Some(len) = fragment[start + 1..].find('>') else {
                break;
            };
            let name = &fragment[start + 1..start + 1 + len];
            if self.contains(name) {
                best = Some((start, name));
                break;
            }
            search = start + 1;
        }
        best
    }
}

/// Render markdown to HTML, resolving registered custom tags.
#[must_use]
pub fn render_markdown_html(markdown: &str, registry: &ComponentRegistry<'_>, options: &RenderOptions) -> String {
    let source = if options.allow_raw_html {
        normalize_table_attrs(markdown)
    } else {
        markdown.to_owned()
    };

    let mut events: Vec<Event<'_>> = Vec::new();
    // Open custom tag split across events: (name, inner text so far).
    let mut open: Option<(String, String)> = None;
    let mut in_paragraph = false;

    for event in Parser::new_ext(&source, markdown_options(options)) {
        match event {
            Event::Html(fragment) | Event::InlineHtml(fragment) => {
                let trimmed = fragment.trim();
                if let Some((name, inner)) = open.take() {
                    if trimmed.eq_ignore_ascii_case(&format!("</{name}>")) {
                        if let Some(rendered) = registry.render_component(&name, &inner) {
                            push_component(&mut events, rendered, in_paragraph);
                        }
                        continue;
                    }
                    events.push(Event::Text(CowStr::from(format!("<{name}>{inner}"))));
                }
                if let Some(name) = bare_open_tag(trimmed).filter(|name| registry.contains(name)) {
                    open = Some((name.to_owned(), String::new()));
                    continue;
                }
                let resolved = resolve_fragment(&fragment, registry, options.allow_raw_html);
                if !resolved.html.is_empty() {
                    push_component(&mut events, resolved.into_component(), in_paragraph);
                }
            }
            Event::Text(text) if open.is_some() => {
                if let Some((_, inner)) = open.as_mut() {
                    inner.push_str(&text);
                }
            }
            other => {
                if let Some((name, inner)) = open.take() {
                    events.push(Event::Text(CowStr::from(format!("<{name}>{inner}"))));
                }
                match &other {
                    Event::Start(Tag::Paragraph) => in_paragraph = true,
                    Event::End(TagEnd::Paragraph) => in_paragraph = false,
                    _ => {}
                }
                events.push(other);
            }
        }
    }
    if let Some((name, inner)) = open.take() {
        events.push(Event::Text(CowStr::from(format!("<{name}>{inner}"))));
    }

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, drop_empty_paragraphs(events).into_iter());
    out
}

/// Emit a component; a block component inside a paragraph splits it.
fn push_component(events: &mut Vec<Event<'_>>, rendered: ComponentHtml, in_paragraph: bool) {
    match rendered {
        ComponentHtml::Block(html) if in_paragraph => {
            events.push(Event::End(TagEnd::Paragraph));
            events.push(Event::Html(CowStr::from(html)));
            events.push(Event::Start(Tag::Paragraph));
        }
        other => events.push(Event::InlineHtml(CowStr::from(other.into_html()))),
    }
}

/// Remove `<p></p>` pairs left behind by paragraph splitting.
fn drop_empty_paragraphs(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    for event in events {
        if matches!(event, Event::End(TagEnd::Paragraph)) && matches!(out.last(), Some(Event::Start(Tag::Paragraph))) {
            out.pop();
            continue;
        }
        out.push(event);
    }
    out
}

/// Render prepared agent text, resolving placeholders against its views.
///
/// A placeholder whose index has no cached view renders its inner text.
#[must_use]
pub fn render_prepared_html(prepared: &PreparedText, options: &RenderOptions) -> String {
    let views = &prepared.views;
    let mut registry = ComponentRegistry::new();
    registry.register_component(PLACEHOLDER_TAG, |inner| {
        let cached = match inner.trim().parse::<usize>() {
            Ok(index) => views.get(index),
            Err(_) => None,
        };
        match cached {
            Some(view) => ComponentHtml::Block(view_card_html(view, options)),
            None => ComponentHtml::Inline(escape_html(inner)),
        }
    });
    render_markdown_html(&prepared.text, &registry, options)
}

/// HTML card for one embedded view: status header plus result or error.
#[must_use]
pub fn view_card_html(view: &EmbeddedView, options: &RenderOptions) -> String {
    let style = status_style(view.status);
    let mut out = String::from(r#"<div class="view-card">"#);

    if style.bg_class.is_empty() {
        out.push_str(r#"<div class="view-card__header">"#);
    } else {
        out.push_str(&format!(r#"<div class="view-card__header {}">"#, style.bg_class));
    }
    out.push_str(&format!(r#"<span class="view-card__name">{}</span>"#, escape_html(&view.name)));
    if let Some(icon) = style.icon {
        out.push_str(icon.svg());
    }
    out.push_str("</div>");

    match view.result.as_deref().filter(|result| !result.is_empty()) {
        Some(result) => {
            let body = render_markdown_html(result, &ComponentRegistry::new(), options);
            out.push_str(&format!(r#"<div class="view-card__body view-card__markdown">{body}</div>"#));
        }
        None => {
            let err = view.err_msg.as_deref().unwrap_or_default();
            out.push_str(&format!(r#"<div class="view-card__body view-card__error">{}</div>"#, escape_html(err)));
        }
    }

    out.push_str("</div>");
    out
}

fn markdown_options(options: &RenderOptions) -> Options {
    let mut out = Options::empty();
    if options.tables {
        out.insert(Options::ENABLE_TABLES);
    }
    if options.strikethrough {
        out.insert(Options::ENABLE_STRIKETHROUGH);
    }
    if options.tasklists {
        out.insert(Options::ENABLE_TASKLISTS);
    }
    out
}

/// `<name>` with no attributes.
fn bare_open_tag(fragment: &str) -> Option<&str> {
    let name = fragment.strip_prefix('<')?.strip_suffix('>')?;
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(name)
}

/// A fragment after component resolution.
struct Resolved {
    html: String,
    has_block: bool,
}

impl Resolved {
    fn into_component(self) -> ComponentHtml {
        if self.has_block {
            ComponentHtml::Block(self.html)
        } else {
            ComponentHtml::Inline(self.html)
        }
    }
}

/// Replace complete registered components inside one HTML fragment.
fn resolve_fragment(fragment: &str, registry: &ComponentRegistry<'_>, allow_raw_html: bool) -> Resolved {
    let mut resolved = Resolved { html: String::new(), has_block: false };
    let mut rest = fragment;

    while let Some((start, name)) = registry.find_open(rest) {
        if allow_raw_html {
            resolved.html.push_str(&rest[..start]);
        }
        let after_open = &rest[start + name.len() + 2..];
        let close = format!("</{name}>");
        let Some(end) = after_open.find(&close) else {
            if allow_raw_html {
                resolved.html.push_str(&rest[start..]);
            }
            return resolved;
        };
        if let Some(rendered) = registry.render_component(name, &after_open[..end]) {
            resolved.has_block |= rendered.is_block();
            resolved.html.push_str(&rendered.into_html());
        }
        rest = &after_open[end + close.len()..];
    }

    if allow_raw_html {
        resolved.html.push_str(rest);
    }
    resolved
}

/// Insert the missing space in `<tableborder=1>`-style tags the backend
/// sometimes emits.
fn normalize_table_attrs(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut rest = markdown;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let prefix = ["<table", "<tr"]
            .into_iter()
            .find_map(|prefix| split_prefix_ignore_case(tail, prefix));
        match prefix {
            Some((head, after_name)) if glued_attr(after_name) => {
                out.push_str(head);
                out.push(' ');
                rest = after_name;
            }
            _ => {
                out.push('<');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// `word=...>`: an attribute glued directly to the tag name.
fn glued_attr(after_name: &str) -> bool {
    let word_len = after_name
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(after_name.len());
    let Some(value) = after_name[word_len..].strip_prefix('=') else {
        return false;
    };
    value.contains('>') && !value.starts_with('>')
}

/// `text` split after an ASCII-case-insensitive `prefix`, if it starts with
/// one and has more after it. Never cuts inside a multi-byte character.
fn split_prefix_ignore_case<'t>(text: &'t str, prefix: &str) -> Option<(&'t str, &'t str)> {
    let head = text.get(..prefix.len())?;
    let tail = &text[prefix.len()..];
    (head.eq_ignore_ascii_case(prefix) && !tail.is_empty()).then_some((head, tail))
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
