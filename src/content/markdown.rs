//! Markdown rendering with title and anchor extraction

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;

use super::hooks::{HeadingRender, MathMode, RenderHooks};
use super::post::{AnchorLevel, HeadingAnchor};

lazy_static! {
    static ref ANCHOR_HEADING: Regex =
        Regex::new(r#"<h([23]) id="([^"]*)""#).expect("anchor pattern is valid");
}

/// Output of a single render
#[derive(Debug, Clone, Default)]
pub struct RenderedMarkdown {
    pub html: String,
    /// Text of the level-1 heading, if any
    pub title: Option<String>,
    /// h2/h3 anchors in document order
    pub anchors: Vec<HeadingAnchor>,
}

/// Markdown renderer
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_GFM
            | Options::ENABLE_MATH;
        Self { options }
    }

    /// Render markdown to HTML, consulting `hooks` for headings, images,
    /// code blocks and math.
    pub fn render<H: RenderHooks + ?Sized>(&self, markdown: &str, hooks: &H) -> RenderedMarkdown {
        let mut parser = Parser::new_ext(markdown, self.options);

        let mut events: Vec<Event> = Vec::new();
        let mut title: Option<String> = None;
        let mut anchors: Vec<HeadingAnchor> = Vec::new();

        while let Some(event) = parser.next() {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    let inner = collect_until(&mut parser, |e| {
                        matches!(e, Event::End(TagEnd::Heading(_)))
                    });
                    let text = plain_text(&inner);
                    let inner_html = self.render_inline(inner, hooks);

                    let id = match level {
                        HeadingLevel::H1 if text.trim().is_empty() => {
                            tracing::debug!("Ignoring blank level-1 heading");
                            None
                        }
                        HeadingLevel::H1 => {
                            if let Some(previous) = &title {
                                tracing::warn!(
                                    "Multiple level-1 headings ({:?}, {:?}); the last one becomes the title",
                                    previous,
                                    text
                                );
                            }
                            title = Some(text);
                            None
                        }
                        HeadingLevel::H2 | HeadingLevel::H3 => {
                            let id = format!("{}---{}", slug::slugify(&text), anchors.len());
                            anchors.push(HeadingAnchor {
                                id: id.clone(),
                                title: text,
                                level: if level == HeadingLevel::H2 {
                                    AnchorLevel::H2
                                } else {
                                    AnchorLevel::H3
                                },
                            });
                            Some(id)
                        }
                        _ => None,
                    };

                    let heading = HeadingRender {
                        level,
                        id: id.as_deref(),
                        inner_html: &inner_html,
                    };
                    events.push(Event::Html(CowStr::from(hooks.on_heading(&heading))));
                }
                Event::Start(Tag::Image {
                    dest_url,
                    title: image_title,
                    ..
                }) => {
                    let alt = collect_image_alt(&mut parser);
                    events.push(Event::InlineHtml(CowStr::from(
                        hooks.on_image(&dest_url, &alt, &image_title),
                    )));
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    let code: String = collect_until(&mut parser, |e| {
                        matches!(e, Event::End(TagEnd::CodeBlock))
                    })
                    .iter()
                    .filter_map(|e| match e {
                        Event::Text(text) => Some(text.as_ref()),
                        _ => None,
                    })
                    .collect();
                    events.push(Event::Html(CowStr::from(
                        hooks.on_code_block(lang.as_deref(), &code),
                    )));
                }
                other => events.push(self.map_inline(other, hooks)),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        RenderedMarkdown {
            html: html_output,
            title,
            anchors,
        }
    }

    /// Render the inline content of a heading
    fn render_inline<'a, H: RenderHooks + ?Sized>(&self, events: Vec<Event<'a>>, hooks: &H) -> String {
        let mut out = String::new();
        let mut iter = events.into_iter();
        let mut mapped: Vec<Event<'a>> = Vec::new();
        while let Some(event) = iter.next() {
            match event {
                Event::Start(Tag::Image {
                    dest_url, title, ..
                }) => {
                    let alt = collect_image_alt(&mut iter);
                    mapped.push(Event::InlineHtml(CowStr::from(
                        hooks.on_image(&dest_url, &alt, &title),
                    )));
                }
                other => mapped.push(self.map_inline(other, hooks)),
            }
        }
        html::push_html(&mut out, mapped.into_iter());
        out
    }

    fn map_inline<'a, H: RenderHooks + ?Sized>(&self, event: Event<'a>, hooks: &H) -> Event<'a> {
        match event {
            Event::InlineMath(tex) => {
                Event::InlineHtml(CowStr::from(hooks.on_math(&tex, MathMode::Inline)))
            }
            Event::DisplayMath(tex) => {
                Event::InlineHtml(CowStr::from(hooks.on_math(&tex, MathMode::Display)))
            }
            Event::SoftBreak => Event::HardBreak,
            other => other,
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Consume events up to (and dropping) the first one matching `is_end`
fn collect_until<'a, I, F>(iter: &mut I, is_end: F) -> Vec<Event<'a>>
where
    I: Iterator<Item = Event<'a>>,
    F: Fn(&Event<'a>) -> bool,
{
    let mut collected = Vec::new();
    for event in iter.by_ref() {
        if is_end(&event) {
            break;
        }
        collected.push(event);
    }
    collected
}

/// Consume an image's alt content, including nested images
fn collect_image_alt<'a, I>(iter: &mut I) -> String
where
    I: Iterator<Item = Event<'a>>,
{
    let mut depth = 1usize;
    let mut alt = String::new();
    for event in iter.by_ref() {
        match event {
            Event::Start(Tag::Image { .. }) => depth += 1,
            Event::End(TagEnd::Image) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Text(text) | Event::Code(text) | Event::InlineMath(text) => {
                alt.push_str(&text)
            }
            Event::SoftBreak | Event::HardBreak => alt.push(' '),
            _ => {}
        }
    }
    alt
}

/// Concatenated text of inline events
fn plain_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) | Event::InlineMath(t) | Event::DisplayMath(t) => {
                text.push_str(t)
            }
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

/// Re-extract `(level, id)` of every anchored heading from rendered HTML
pub fn anchors_from_html(html: &str) -> Vec<(u8, String)> {
    ANCHOR_HEADING
        .captures_iter(html)
        .filter_map(|caps| {
            let level = caps[1].parse().ok()?;
            Some((level, caps[2].to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::hooks::{PlainHooks, SiteHooks};
    use crate::config::SiteConfig;

    fn render(markdown: &str) -> RenderedMarkdown {
        MarkdownRenderer::new().render(markdown, &PlainHooks)
    }

    #[test]
    fn test_render_basic_markdown() {
        let out = render("# Hello World\n\nThis is a *test*.\n\n> quoted\n\n- one\n- two");
        assert!(out.html.contains("<h1>Hello World</h1>"));
        assert!(out.html.contains("<p>This is a <em>test</em>.</p>"));
        assert!(out.html.contains("<blockquote>"));
        assert!(out.html.contains("<li>one</li>"));
        assert_eq!(out.title.as_deref(), Some("Hello World"));
    }

    #[test]
    fn test_title_missing() {
        let out = render("## Only a section\n\ntext");
        assert_eq!(out.title, None);
    }

    #[test]
    fn test_last_title_wins() {
        let out = render("# First\n\n# Second\n");
        assert_eq!(out.title.as_deref(), Some("Second"));
    }

    #[test]
    fn test_title_includes_inline_code() {
        let out = render("# Using `Vec` well");
        assert_eq!(out.title.as_deref(), Some("Using Vec well"));
        assert!(out.html.contains("<h1>Using <code>Vec</code> well</h1>"));
    }

    #[test]
    fn test_heading_anchors() {
        let out = render("# T\n\n## Getting Started\n\n### Install it\n\n#### Not anchored\n");
        assert_eq!(
            out.anchors,
            vec![
                HeadingAnchor {
                    id: "getting-started---0".to_string(),
                    title: "Getting Started".to_string(),
                    level: AnchorLevel::H2,
                },
                HeadingAnchor {
                    id: "install-it---1".to_string(),
                    title: "Install it".to_string(),
                    level: AnchorLevel::H3,
                },
            ]
        );
        assert!(out
            .html
            .contains(r#"<h2 id="getting-started---0">Getting Started</h2>"#));
        assert!(out.html.contains("<h4>Not anchored</h4>"));
    }

    #[test]
    fn test_duplicate_headings_get_distinct_ids() {
        let out = render("## Notes\n\ntext\n\n## Notes\n");
        assert_eq!(out.anchors.len(), 2);
        assert_ne!(out.anchors[0].id, out.anchors[1].id);
        assert_eq!(out.anchors[0].title, out.anchors[1].title);
    }

    #[test]
    fn test_anchor_round_trip() {
        let markdown = "# Post\n\n## A\n\n### B\n\n## A\n\n### C `x`\n\n## Déjà vu\n";
        let out = render(markdown);
        let recorded: Vec<(u8, String)> = out
            .anchors
            .iter()
            .map(|a| (a.level.as_u8(), a.id.clone()))
            .collect();
        assert_eq!(anchors_from_html(&out.html), recorded);
        assert_eq!(recorded.len(), 5);
    }

    #[test]
    fn test_render_code_block() {
        let out = render("```rust\nfn main() {}\n```\n\n```\nplain <text>\n```");
        assert!(out.html.contains(r#"<code class="language-rust">fn main() {}"#));
        assert!(out.html.contains(r#"<span class="code-block-lang">rust</span>"#));
        assert!(out.html.contains("plain &lt;text&gt;"));
        assert!(out.html.contains(r#"<pre class="language-plaintext">"#));
    }

    #[test]
    fn test_indented_code_block_defaults_to_plaintext() {
        let out = render("para\n\n    let x = 1;\n");
        assert!(out.html.contains(r#"<code class="language-plaintext">let x = 1;"#));
    }

    #[test]
    fn test_soft_breaks_become_hard_breaks() {
        let out = render("line one\nline two");
        assert!(out.html.contains("line one<br />"));
    }

    #[test]
    fn test_image_path_rewrite() {
        let hooks = SiteHooks::new(&SiteConfig::default());
        let out = MarkdownRenderer::new().render("![a cat](../../public/blog/cat.png)", &hooks);
        assert!(out
            .html
            .contains(r#"<img src="cat.png" alt="a cat" loading="lazy" />"#));
    }

    #[test]
    fn test_math_goes_through_hook() {
        let out = render("Euler: $e^{i\\pi}+1=0$ and $$x<y$$");
        assert!(out
            .html
            .contains(r#"<span class="math">$e^{i\pi}+1=0$</span>"#));
        assert!(out.html.contains(r#"<span class="math">$$x&lt;y$$</span>"#));
    }

    #[test]
    fn test_katex_math() {
        let hooks = SiteHooks::new(&SiteConfig::default());
        let out = MarkdownRenderer::new().render("Inline $x^2$ here.", &hooks);
        assert!(out.html.contains("katex"));
        assert!(!out.html.contains("$x^2$"));
    }

    #[test]
    fn test_failing_math_hook_is_contained() {
        struct Broken;
        impl RenderHooks for Broken {
            fn on_math(&self, tex: &str, _mode: MathMode) -> String {
                format!("<span class=\"math-error\">{}</span>", tex)
            }
        }
        let out = MarkdownRenderer::new().render("before $\\badcommand{x}$ after", &Broken);
        assert!(out.html.contains("before"));
        assert!(out.html.contains("after"));
        assert!(out.html.contains("math-error"));
    }

    #[test]
    fn test_katex_error_is_colored_inline() {
        let hooks = SiteHooks::new(&SiteConfig::default());
        let out = MarkdownRenderer::new().render("before $\\undefinedcmd{x}$ after", &hooks);
        assert!(out.html.contains("before"));
        assert!(out.html.contains("after"));
        assert!(out.html.contains("color:#FF0000"));
        assert!(out.html.contains("undefinedcmd"));
    }

    #[test]
    fn test_title_is_heading_text_without_markup() {
        let out = render("# Hello *World* and [link](http://x)");
        assert_eq!(out.title.as_deref(), Some("Hello World and link"));
        assert!(out.html.contains("<em>World</em>"));
        assert!(out.html.contains(r#"<a href="http://x">link</a>"#));
    }

    #[test]
    fn test_blank_h1_keeps_earlier_title() {
        let out = render("# Real Title\n\n#\n");
        assert_eq!(out.title.as_deref(), Some("Real Title"));
    }

    #[test]
    fn test_custom_heading_hook() {
        struct Upper;
        impl RenderHooks for Upper {
            fn on_heading(&self, heading: &HeadingRender<'_>) -> String {
                format!("<{0}>{1}</{0}>", heading.level, heading.inner_html.to_uppercase())
            }
        }
        let out = MarkdownRenderer::new().render("# title\n\n## part\n", &Upper);
        assert!(out.html.contains("<h1>TITLE</h1>"));
        assert_eq!(out.title.as_deref(), Some("title"));
        assert_eq!(out.anchors[0].id, "part---0");
    }

    #[test]
    fn test_anchors_from_html_ignores_other_headings() {
        let html = r#"<h1>T</h1><h2 id="a---0">A</h2><h4 id="x">X</h4><h3 id="b---1">B</h3>"#;
        assert_eq!(
            anchors_from_html(html),
            vec![(2, "a---0".to_string()), (3, "b---1".to_string())]
        );
    }
}
