//! Content module - post parsing, rendering and indexing

mod error;
mod frontmatter;
pub mod hooks;
mod index;
pub mod loader;
mod markdown;
mod post;

pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use hooks::{MathMode, PlainHooks, RenderHooks, SiteHooks};
pub use index::{compare_by_date, summarize, PostIndex};
pub use markdown::{anchors_from_html, MarkdownRenderer, RenderedMarkdown};
pub use post::{
    AnchorLevel, HeadingAnchor, ParsedPost, PostMetadata, PostSummary, RawPost, DATE_FORMAT,
};

/// Turn a raw post into a rendered one: front-matter first, then the body.
///
/// Posts without a level-1 heading are named after their source id.
pub fn parse_post<H: RenderHooks + ?Sized>(
    raw: &RawPost,
    renderer: &MarkdownRenderer,
    hooks: &H,
) -> ParsedPost {
    let (metadata, body) = FrontMatter::parse(&raw.raw_text);
    let rendered = renderer.render(body, hooks);

    let name = rendered
        .title
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| {
            tracing::debug!("{} has no level-1 heading, naming it by file", raw.source_id);
            raw.source_id.clone()
        });

    ParsedPost {
        name,
        source_id: raw.source_id.clone(),
        html: rendered.html,
        metadata,
        anchors: rendered.anchors,
    }
}
