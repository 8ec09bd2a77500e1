//! Structured rich text and its HTML serialization
//!
//! Rich text arrives from the content API as an ordered list of blocks, each
//! holding plain text plus formatting spans addressed by offsets into that
//! text. Offsets count UTF-16 code units, as the API does.

use serde::{Deserialize, Serialize};

use crate::helpers::html_escape;

/// Kind of a rich-text block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    #[default]
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
    Preformatted,
    ListItem,
    OListItem,
    Image,
    Embed,
    #[serde(other)]
    Unknown,
}

/// Kind of an inline span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpanKind {
    Strong,
    Em,
    Hyperlink,
    Label,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanData {
    pub url: Option<String>,
    pub target: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: SpanKind,
    #[serde(default)]
    pub data: SpanData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Embed {
    #[serde(rename = "type")]
    pub embed_type: Option<String>,
    pub embed_url: Option<String>,
    pub provider_name: Option<String>,
    pub html: Option<String>,
}

/// One block of rich text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RichTextBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub text: String,
    pub spans: Vec<Span>,
    /// Image source
    pub url: Option<String>,
    /// Image alternative text
    pub alt: Option<String>,
    pub oembed: Option<Embed>,
}

impl RichTextBlock {
    pub fn paragraph(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }
}

/// An ordered sequence of rich-text blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(pub Vec<RichTextBlock>);

impl RichText {
    /// Plain text of every block joined by spaces
    pub fn as_text(&self) -> String {
        self.0
            .iter()
            .map(|block| block.text.as_str())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Serialize to HTML
    ///
    /// Consecutive list items are grouped into a single `<ul>` or `<ol>`.
    pub fn as_html(&self) -> String {
        let mut html = String::new();
        let mut open_list: Option<&'static str> = None;

        for block in &self.0 {
            let list_tag = match block.kind {
                BlockKind::ListItem => Some("ul"),
                BlockKind::OListItem => Some("ol"),
                _ => None,
            };

            if open_list != list_tag {
                if let Some(tag) = open_list {
                    html.push_str(&format!("</{}>", tag));
                }
                if let Some(tag) = list_tag {
                    html.push_str(&format!("<{}>", tag));
                }
                open_list = list_tag;
            }

            render_block(block, &mut html);
        }

        if let Some(tag) = open_list {
            html.push_str(&format!("</{}>", tag));
        }

        html
    }
}

fn render_block(block: &RichTextBlock, out: &mut String) {
    let tag = match block.kind {
        BlockKind::Paragraph => "p",
        BlockKind::Heading1 => "h1",
        BlockKind::Heading2 => "h2",
        BlockKind::Heading3 => "h3",
        BlockKind::Heading4 => "h4",
        BlockKind::Heading5 => "h5",
        BlockKind::Heading6 => "h6",
        BlockKind::Preformatted => "pre",
        BlockKind::ListItem | BlockKind::OListItem => "li",
        BlockKind::Image => {
            render_image(block, out);
            return;
        }
        BlockKind::Embed => {
            render_embed(block, out);
            return;
        }
        BlockKind::Unknown => {
            tracing::debug!("Skipping rich text block of unknown type");
            return;
        }
    };

    out.push_str(&format!("<{}>", tag));
    render_spans(&block.text, &block.spans, out);
    out.push_str(&format!("</{}>", tag));
}

fn render_image(block: &RichTextBlock, out: &mut String) {
    let Some(url) = block.url.as_deref() else {
        return;
    };
    out.push_str(&format!(
        r#"<p class="block-img"><img src="{}" alt="{}" /></p>"#,
        html_escape(url),
        html_escape(block.alt.as_deref().unwrap_or(""))
    ));
}

fn render_embed(block: &RichTextBlock, out: &mut String) {
    let Some(embed) = block.oembed.as_ref() else {
        return;
    };
    // Provider markup is trusted the same way the rest of the body is
    out.push_str(&format!(
        r#"<div data-oembed="{}" data-oembed-type="{}" data-oembed-provider="{}">{}</div>"#,
        html_escape(embed.embed_url.as_deref().unwrap_or("")),
        html_escape(embed.embed_type.as_deref().unwrap_or("")),
        html_escape(
            &embed
                .provider_name
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
        ),
        embed.html.as_deref().unwrap_or("")
    ));
}

/// Write escaped text with span markup, keeping tags properly nested
///
/// Overlapping spans are closed and reopened around each other.
fn render_spans(text: &str, spans: &[Span], out: &mut String) {
    let mut spans: Vec<&Span> = spans.iter().filter(|s| s.start < s.end).collect();
    // Outer spans first: earliest start, then longest
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut open: Vec<&Span> = Vec::new();
    let mut next = 0;
    let mut pos = 0;

    for c in text.chars() {
        close_spans_at(pos, &mut open, out);
        while next < spans.len() && spans[next].start <= pos {
            if spans[next].end > pos {
                out.push_str(&open_tag(spans[next]));
                open.push(spans[next]);
            }
            next += 1;
        }

        match c {
            '\n' => out.push_str("<br />"),
            _ => out.push_str(&html_escape(c.encode_utf8(&mut [0; 4]))),
        }
        pos += c.len_utf16();
    }

    while let Some(span) = open.pop() {
        out.push_str(close_tag(span));
    }
}

fn close_spans_at<'a>(pos: usize, open: &mut Vec<&'a Span>, out: &mut String) {
    let Some(depth) = open.iter().position(|s| s.end <= pos) else {
        return;
    };

    // Everything above the outermost ending span has to close too
    let mut reopen = Vec::new();
    while open.len() > depth {
        if let Some(span) = open.pop() {
            out.push_str(close_tag(span));
            if span.end > pos {
                reopen.push(span);
            }
        }
    }
    for span in reopen.into_iter().rev() {
        out.push_str(&open_tag(span));
        open.push(span);
    }
}

fn open_tag(span: &Span) -> String {
    match span.kind {
        SpanKind::Strong => "<strong>".to_string(),
        SpanKind::Em => "<em>".to_string(),
        SpanKind::Hyperlink => {
            let href = html_escape(span.data.url.as_deref().unwrap_or("#"));
            match span.data.target.as_deref() {
                Some(target) => format!(
                    r#"<a href="{}" target="{}" rel="noopener">"#,
                    href,
                    html_escape(target)
                ),
                None => format!(r#"<a href="{}">"#, href),
            }
        }
        SpanKind::Label => format!(
            r#"<span class="{}">"#,
            html_escape(span.data.label.as_deref().unwrap_or(""))
        ),
        SpanKind::Unknown => "<span>".to_string(),
    }
}

fn close_tag(span: &Span) -> &'static str {
    match span.kind {
        SpanKind::Strong => "</strong>",
        SpanKind::Em => "</em>",
        SpanKind::Hyperlink => "</a>",
        SpanKind::Label | SpanKind::Unknown => "</span>",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RichText {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_plain_paragraph() {
        let text = parse(r#"[{"text": "Hello"}]"#);
        assert_eq!(text.as_html(), "<p>Hello</p>");
    }

    #[test]
    fn test_headings_and_escaping() {
        let text = parse(
            r#"[
                {"type": "heading2", "text": "Título", "spans": []},
                {"type": "paragraph", "text": "a < b & c", "spans": []}
            ]"#,
        );
        assert_eq!(text.as_html(), "<h2>Título</h2><p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_spans() {
        let text = parse(
            r#"[{
                "type": "paragraph",
                "text": "Leia a doc oficial",
                "spans": [
                    {"start": 0, "end": 4, "type": "strong"},
                    {"start": 7, "end": 18, "type": "hyperlink",
                     "data": {"link_type": "Web", "url": "https://reactjs.org"}}
                ]
            }]"#,
        );
        assert_eq!(
            text.as_html(),
            r#"<p><strong>Leia</strong> a <a href="https://reactjs.org">doc oficial</a></p>"#
        );
    }

    #[test]
    fn test_nested_and_overlapping_spans() {
        let nested = parse(
            r#"[{"text": "abcdef", "spans": [
                {"start": 0, "end": 6, "type": "strong"},
                {"start": 2, "end": 4, "type": "em"}
            ]}]"#,
        );
        assert_eq!(
            nested.as_html(),
            "<p><strong>ab<em>cd</em>ef</strong></p>"
        );

        let overlapping = parse(
            r#"[{"text": "abcdef", "spans": [
                {"start": 0, "end": 4, "type": "strong"},
                {"start": 2, "end": 6, "type": "em"}
            ]}]"#,
        );
        assert_eq!(
            overlapping.as_html(),
            "<p><strong>ab<em>cd</em></strong><em>ef</em></p>"
        );
    }

    #[test]
    fn test_lists_are_grouped() {
        let text = parse(
            r#"[
                {"type": "list-item", "text": "um"},
                {"type": "list-item", "text": "dois"},
                {"type": "o-list-item", "text": "primeiro"},
                {"type": "paragraph", "text": "fim"}
            ]"#,
        );
        assert_eq!(
            text.as_html(),
            "<ul><li>um</li><li>dois</li></ul><ol><li>primeiro</li></ol><p>fim</p>"
        );
    }

    #[test]
    fn test_preformatted_line_breaks() {
        let text = parse(r#"[{"type": "preformatted", "text": "let a = 1;\nlet b = 2;"}]"#);
        assert_eq!(text.as_html(), "<pre>let a = 1;<br />let b = 2;</pre>");
    }

    #[test]
    fn test_image_and_unknown_blocks() {
        let text = parse(
            r#"[
                {"type": "image", "url": "https://images.prismic.io/x.png", "alt": "capa"},
                {"type": "something-new", "text": "ignored"}
            ]"#,
        );
        assert_eq!(
            text.as_html(),
            r#"<p class="block-img"><img src="https://images.prismic.io/x.png" alt="capa" /></p>"#
        );
    }

    #[test]
    fn test_span_offsets_count_utf16_units() {
        // The emoji takes two UTF-16 code units
        let text = parse(
            r#"[{"text": "🚀 go", "spans": [{"start": 3, "end": 5, "type": "em"}]}]"#,
        );
        assert_eq!(text.as_html(), "<p>🚀 <em>go</em></p>");
    }

    #[test]
    fn test_as_text() {
        let text = parse(r#"[{"text": "Hello"}, {"type": "image"}, {"text": "world"}]"#);
        assert_eq!(text.as_text(), "Hello world");
    }
}
