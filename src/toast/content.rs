//! Toast message payload.
//!
//! Content may carry a little inline markup (links, line breaks). It is never
//! rendered as trusted markup: `<a href>` becomes a [`Segment::Link`], `<br>`
//! a line break, and every other tag is dropped. Whitespace follows
//! `pre-line` rules: newlines are kept, runs of spaces collapse.

use regex::Regex;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<\s*(/?)\s*([a-zA-Z][a-zA-Z0-9-]*)([^>]*)>").expect("tag pattern compiles")
});

static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
        .expect("href pattern compiles")
});

/// One styled run inside a line of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Link { text: String, href: String },
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Text(text) => text,
            Segment::Link { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    raw: String,
}

impl Content {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The payload exactly as the caller supplied it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Sanitized lines of segments ready for rendering.
    pub fn lines(&self) -> Vec<Vec<Segment>> {
        let mut builder = LineBuilder::default();
        let mut cursor = 0;

        for caps in TAG.captures_iter(&self.raw) {
            let Some(tag) = caps.get(0) else { continue };
            builder.push_text(&self.raw[cursor..tag.start()]);
            cursor = tag.end();

            let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            let name = caps
                .get(2)
                .map(|m| m.as_str().to_ascii_lowercase())
                .unwrap_or_default();
            match (name.as_str(), closing) {
                ("br", _) => builder.line_break(),
                ("a", false) => {
                    let attrs = caps.get(3).map_or("", |m| m.as_str());
                    builder.start_link(href_of(attrs));
                }
                ("a", true) => builder.end_link(),
                _ => {}
            }
        }
        builder.push_text(&self.raw[cursor..]);
        builder.finish()
    }

    /// Text with markup removed and links reduced to their label.
    pub fn plain_text(&self) -> String {
        self.lines()
            .iter()
            .map(|line| line.iter().map(Segment::text).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<&str> for Content {
    fn from(raw: &str) -> Self {
        Content::new(raw)
    }
}

#[derive(Default)]
struct LineBuilder {
    lines: Vec<Vec<Segment>>,
    current: Vec<Segment>,
    /// (href, label) of a link whose closing tag has not been seen yet.
    link: Option<(String, String)>,
}

impl LineBuilder {
    fn push_text(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        let decoded = decode_entities(raw);

        if let Some((_, label)) = self.link.as_mut() {
            append_collapsed(label, &decoded.replace('\n', " "));
            return;
        }

        for (i, piece) in decoded.split('\n').enumerate() {
            if i > 0 {
                self.line_break();
            }
            if piece.is_empty() {
                continue;
            }
            match self.current.last_mut() {
                Some(Segment::Text(text)) => append_collapsed(text, piece),
                _ => {
                    let mut text = String::new();
                    append_collapsed(&mut text, piece);
                    self.current.push(Segment::Text(text));
                }
            }
        }
    }

    fn start_link(&mut self, href: String) {
        self.end_link();
        self.link = Some((href, String::new()));
    }

    fn end_link(&mut self) {
        if let Some((href, label)) = self.link.take() {
            let text = if label.trim().is_empty() {
                href.clone()
            } else {
                label
            };
            self.current.push(Segment::Link { text, href });
        }
    }

    fn line_break(&mut self) {
        self.end_link();
        self.lines.push(std::mem::take(&mut self.current));
    }

    fn finish(mut self) -> Vec<Vec<Segment>> {
        self.end_link();
        self.lines.push(self.current);
        self.lines
    }
}

/// Append `piece` to `out`, collapsing runs of spaces and tabs (including
/// across the boundary with what `out` already ends with).
fn append_collapsed(out: &mut String, piece: &str) {
    let mut prev_space = out.ends_with(' ');
    for ch in piece.chars() {
        if ch == ' ' || ch == '\t' || ch == '\r' {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
}

fn href_of(attrs: &str) -> String {
    HREF.captures(attrs)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| decode_entities(m.as_str()))
        .unwrap_or_default()
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
