//! Content module - post models and rich text rendering

mod post;
mod richtext;

pub use post::{Page, PostDetail, PostSummary, Section};
pub use richtext::{BlockKind, Embed, RichText, RichTextBlock, Span, SpanData, SpanKind};
