//! Embedded view tag extraction.
//!
//! DESIGN
//! ======
//! Agent output arrives as streamed markdown with tool results inlined as
//! `<view-tag ...>{json}</view-tag>` fragments. The scanner walks the text one
//! character at a time through explicit states instead of running a regex
//! over the whole string, so a chunk boundary can fall anywhere (even inside
//! the tag name) and the result is the same as scanning the joined text.
//!
//! Each parsed view is appended to a cache owned by the scanner and the tag is
//! replaced with `<custom-view>{index}</custom-view>`. Indices follow scan
//! order only. A fragment whose payload does not decode is copied through
//! byte-for-byte and the failure is logged.
//!
//! One scanner serves one message; caches are never shared.

#[cfg(test)]
#[path = "extract_test.rs"]
mod extract_test;

use std::borrow::Cow;

use crate::ViewError;
use crate::message::EmbeddedView;

/// Tag name of the placeholder left in processed text.
pub const PLACEHOLDER_TAG: &str = "custom-view";

/// Placeholder token referencing the cached view at `index`.
#[must_use]
pub fn placeholder_token(index: usize) -> String {
    format!("<{PLACEHOLDER_TAG}>{index}</{PLACEHOLDER_TAG}>")
}

/// Output of one extraction pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extracted {
    /// Text with every well-formed tag replaced by its placeholder.
    pub text: String,
    /// Parsed views; `views[i]` backs placeholder `i`.
    pub views: Vec<EmbeddedView>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanState {
    /// Plain text. A `<` may start a tag.
    Outside,
    /// Matching the characters after `<` against the tag name.
    OpenTag,
    /// Tag name matched; skipping attributes up to `>`.
    OpenAttrs,
    /// Collecting the payload.
    Body,
    /// Saw `<` in the payload; matching it against the close tag.
    AwaitingClose,
}

/// Incremental extractor for embedded view tags.
#[derive(Clone, Debug)]
pub struct TagScanner {
    open: String,
    close: String,
    state: ScanState,
    /// Every character consumed since the `<` that opened the current
    /// candidate tag, exactly as received.
    raw: String,
    body: String,
    close_buf: String,
    out: String,
    views: Vec<EmbeddedView>,
}

impl TagScanner {
    /// Scanner for `<tag_name ...>...</tag_name>` (case-insensitive).
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        let name = tag_name.trim().to_ascii_lowercase();
        Self {
            open: format!("<{name}"),
            close: format!("</{name}>"),
            state: ScanState::Outside,
            raw: String::new(),
            body: String::new(),
            close_buf: String::new(),
            out: String::new(),
            views: Vec::new(),
        }
    }

    /// Feed the next chunk of message text.
    pub fn push(&mut self, chunk: &str) {
        for ch in chunk.chars() {
            self.feed(ch);
        }
    }

    /// Text known to lie outside any tag, with placeholders substituted.
    #[must_use]
    pub fn processed(&self) -> &str {
        &self.out
    }

    /// Text of a tag still being scanned (empty between tags).
    #[must_use]
    pub fn pending(&self) -> &str {
        &self.raw
    }

    /// Views parsed so far, in placeholder order.
    #[must_use]
    pub fn views(&self) -> &[EmbeddedView] {
        &self.views
    }

    /// End of input: an unterminated tag is kept as raw text.
    #[must_use]
    pub fn finish(mut self) -> Extracted {
        self.out.push_str(&self.raw);
        Extracted {
            text: self.out,
            views: self.views,
        }
    }

    fn feed(&mut self, ch: char) {
        match self.state {
            ScanState::Outside => {
                if ch == '<' {
                    self.raw.push(ch);
                    self.state = ScanState::OpenTag;
                } else {
                    self.out.push(ch);
                }
            }
            ScanState::OpenTag => {
                self.raw.push(ch);
                if self.raw.len() <= self.open.len() {
                    if !starts_with_ignore_case(&self.open, &self.raw) {
                        self.abandon_open(ch);
                    }
                } else if ch == '>' {
                    self.state = ScanState::Body;
                } else if ch.is_ascii_whitespace() {
                    self.state = ScanState::OpenAttrs;
                } else {
                    // `<view-tagged>` and friends are not our tag.
                    self.abandon_open(ch);
                }
            }
            ScanState::OpenAttrs => {
                self.raw.push(ch);
                if ch == '>' {
                    self.state = ScanState::Body;
                }
            }
            ScanState::Body => {
                self.raw.push(ch);
                if ch == '<' {
                    self.close_buf.push(ch);
                    self.state = ScanState::AwaitingClose;
                } else {
                    self.body.push(ch);
                }
            }
            ScanState::AwaitingClose => {
                self.raw.push(ch);
                self.close_buf.push(ch);
                if starts_with_ignore_case(&self.close, &self.close_buf) {
                    if self.close_buf.len() == self.close.len() {
                        self.complete();
                    }
                    return;
                }
                // Not the close tag: everything but `ch` was payload.
                self.close_buf.pop();
                self.body.push_str(&self.close_buf);
                self.close_buf.clear();
                if ch == '<' {
                    self.close_buf.push(ch);
                } else {
                    self.body.push(ch);
                    self.state = ScanState::Body;
                }
            }
        }
    }

    /// The candidate turned out not to be a tag: release it as text and
    /// rescan `ch`, which may itself open a new candidate.
    fn abandon_open(&mut self, ch: char) {
        let mut released = std::mem::take(&mut self.raw);
        released.pop();
        self.out.push_str(&released);
        self.state = ScanState::Outside;
        self.feed(ch);
    }

    fn complete(&mut self) {
        let raw = std::mem::take(&mut self.raw);
        let body = std::mem::take(&mut self.body);
        self.close_buf.clear();
        self.state = ScanState::Outside;

        match parse_view_payload(&body) {
            Ok(view) => {
                self.out.push_str(&placeholder_token(self.views.len()));
                self.views.push(view);
            }
            Err(err) => {
                log::warn!("leaving embedded view as text: {err}");
                self.out.push_str(&raw);
            }
        }
    }
}

/// Extract every embedded view from `text` in one pass.
#[must_use]
pub fn extract_views(text: &str, tag_name: &str) -> Extracted {
    let mut scanner = TagScanner::new(tag_name);
    scanner.push(text);
    scanner.finish()
}

/// Decode the payload between an open and close view tag.
///
/// Raw line breaks and tabs inside JSON strings are tolerated; the backend
/// emits multi-line markdown results without escaping them.
///
/// # Errors
///
/// Returns [`ViewError::Payload`] when the body is not a view object.
pub fn parse_view_payload(body: &str) -> Result<EmbeddedView, ViewError> {
    serde_json::from_str(&escape_string_controls(body.trim())).map_err(ViewError::Payload)
}

fn escape_string_controls(body: &str) -> Cow<'_, str> {
    if !body.contains(['\n', '\r', '\t']) {
        return Cow::Borrowed(body);
    }

    let mut out = String::with_capacity(body.len() + 16);
    let mut in_string = false;
    let mut escaped = false;
    for ch in body.chars() {
        if !in_string {
            if ch == '"' {
                in_string = true;
            }
            out.push(ch);
            continue;
        }
        if escaped {
            escaped = false;
            out.push(ch);
            continue;
        }
        match ch {
            '\\' => {
                escaped = true;
                out.push(ch);
            }
            '"' => {
                in_string = false;
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

fn starts_with_ignore_case(full: &str, candidate: &str) -> bool {
    candidate.len() <= full.len() && full.as_bytes()[..candidate.len()].eq_ignore_ascii_case(candidate.as_bytes())
}
