//! Rendering hooks for the Markdown pipeline
//!
//! [`RenderHooks`] decides the markup for the elements the renderer treats
//! specially. Every hook has a plain default, so an implementation only
//! overrides what it cares about. [`SiteHooks`] is the site's own set.

use pulldown_cmark::HeadingLevel;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::SiteConfig;
use crate::helpers::html_escape;

/// Language label used when a code block declares none
pub const DEFAULT_LANGUAGE: &str = "plaintext";

/// Inline (`$..$`) or display (`$$..$$`) math
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathMode {
    Inline,
    Display,
}

impl MathMode {
    fn delimiter(self) -> &'static str {
        match self {
            MathMode::Inline => "$",
            MathMode::Display => "$$",
        }
    }
}

/// A heading ready to be written out
#[derive(Debug, Clone, Copy)]
pub struct HeadingRender<'a> {
    pub level: HeadingLevel,
    /// Anchor id, set for h2/h3 only
    pub id: Option<&'a str>,
    /// Rendered inline content
    pub inner_html: &'a str,
}

/// Hook points consulted by [`super::MarkdownRenderer::render`]
pub trait RenderHooks {
    fn on_heading(&self, heading: &HeadingRender<'_>) -> String {
        match heading.id {
            Some(id) => format!(
                "<{tag} id=\"{id}\">{inner}</{tag}>\n",
                tag = heading.level,
                id = html_escape(id),
                inner = heading.inner_html
            ),
            None => format!(
                "<{tag}>{inner}</{tag}>\n",
                tag = heading.level,
                inner = heading.inner_html
            ),
        }
    }

    fn on_image(&self, src: &str, alt: &str, title: &str) -> String {
        image_tag(src, alt, title)
    }

    fn on_code_block(&self, lang: Option<&str>, code: &str) -> String {
        let lang = lang.unwrap_or(DEFAULT_LANGUAGE);
        code_block_wrapper(lang, &html_escape(code))
    }

    fn on_math(&self, tex: &str, mode: MathMode) -> String {
        let delim = mode.delimiter();
        format!(
            "<span class=\"math\">{}{}{}</span>",
            delim,
            html_escape(tex),
            delim
        )
    }
}

/// Hooks with no overrides
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHooks;

impl RenderHooks for PlainHooks {}

/// Render an `<img>` tag
pub fn image_tag(src: &str, alt: &str, title: &str) -> String {
    let title_attr = if title.is_empty() {
        String::new()
    } else {
        format!(" title=\"{}\"", html_escape(title))
    };
    format!(
        "<img src=\"{}\" alt=\"{}\"{} loading=\"lazy\" />",
        html_escape(src),
        html_escape(alt),
        title_attr
    )
}

/// Wrap code in the labelled container with a copy button.
///
/// `body_html` must already be escaped or highlighted.
pub fn code_block_wrapper(lang: &str, body_html: &str) -> String {
    let lang = html_escape(lang);
    format!(
        r#"<div class="code-block-wrapper">
<div class="code-block-header">
<span class="code-block-lang">{lang}</span>
<button class="code-block-copy" onclick="navigator.clipboard.writeText(this.parentElement.nextElementSibling.innerText)">Copy</button>
</div>
<pre class="language-{lang}"><code class="language-{lang}">{body}</code></pre>
</div>
"#,
        lang = lang,
        body = body_html
    )
}

/// Strip everything up to and including the last occurrence of `marker`
pub fn rewrite_asset_path<'a>(src: &'a str, marker: &str) -> &'a str {
    if marker.is_empty() {
        return src;
    }
    match src.rfind(marker) {
        Some(pos) => &src[pos + marker.len()..],
        None => src,
    }
}

/// Syntax highlighter for code blocks
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new(theme_name: &str) -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = match theme_set.themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                tracing::warn!(
                    "Unknown highlight theme {:?}, using base16-ocean.dark",
                    theme_name
                );
                theme_set
                    .themes
                    .remove("base16-ocean.dark")
                    .unwrap_or_default()
            }
        };
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    /// Highlight `code`, falling back to escaped text
    pub fn highlight(&self, code: &str, lang: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        match highlighted_html_for_string(code, &self.syntax_set, syntax, &self.theme) {
            Ok(html) => strip_pre_wrapper(&html).to_string(),
            Err(e) => {
                tracing::debug!("Highlighting {} failed: {}", lang, e);
                html_escape(code)
            }
        }
    }
}

/// syntect wraps its output in a `<pre style=..>`; keep only the spans
fn strip_pre_wrapper(html: &str) -> &str {
    let inner = match html.find('>') {
        Some(pos) if html.starts_with("<pre") => &html[pos + 1..],
        _ => html,
    };
    inner.trim_end().trim_end_matches("</pre>")
}

/// The site's hooks, configured from [`SiteConfig`]
pub struct SiteHooks {
    asset_marker: String,
    math_enabled: bool,
    math_error_color: String,
    highlighter: Option<Highlighter>,
}

impl SiteHooks {
    pub fn new(config: &SiteConfig) -> Self {
        let highlighter = config
            .highlight
            .enable
            .then(|| Highlighter::new(&config.highlight.theme));
        Self {
            asset_marker: config.asset_marker.clone(),
            math_enabled: config.math.enable,
            math_error_color: config.math.error_color.clone(),
            highlighter,
        }
    }

    fn render_katex(&self, tex: &str, mode: MathMode) -> Result<String, String> {
        let opts = katex::Opts::builder()
            .display_mode(mode == MathMode::Display)
            .throw_on_error(false)
            .error_color(self.math_error_color.clone())
            .output_type(katex::OutputType::Html)
            .build()
            .map_err(|e| e.to_string())?;
        katex::render_with_opts(tex, &opts).map_err(|e| e.to_string())
    }

    /// Visible markup for math that could not be typeset
    pub fn math_error(&self, tex: &str, mode: MathMode) -> String {
        let delim = mode.delimiter();
        format!(
            "<span class=\"math-error\" style=\"color:{}\">{}{}{}</span>",
            html_escape(&self.math_error_color),
            delim,
            html_escape(tex),
            delim
        )
    }
}

impl RenderHooks for SiteHooks {
    fn on_image(&self, src: &str, alt: &str, title: &str) -> String {
        image_tag(rewrite_asset_path(src, &self.asset_marker), alt, title)
    }

    fn on_code_block(&self, lang: Option<&str>, code: &str) -> String {
        let lang = lang.unwrap_or(DEFAULT_LANGUAGE);
        let body = match &self.highlighter {
            Some(highlighter) => highlighter.highlight(code, lang),
            None => html_escape(code),
        };
        code_block_wrapper(lang, &body)
    }

    fn on_math(&self, tex: &str, mode: MathMode) -> String {
        if !self.math_enabled {
            return PlainHooks.on_math(tex, mode);
        }
        match self.render_katex(tex, mode) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Math rendering failed for {:?}: {}", tex, e);
                self.math_error(tex, mode)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_asset_path() {
        assert_eq!(
            rewrite_asset_path("../../public/blog/foo.png", "/blog/"),
            "foo.png"
        );
        assert_eq!(
            rewrite_asset_path("/a/blog/b/blog/img/x.png", "/blog/"),
            "img/x.png"
        );
        assert_eq!(rewrite_asset_path("foo.png", "/blog/"), "foo.png");
        assert_eq!(rewrite_asset_path("x/blog/y.png", ""), "x/blog/y.png");
    }

    #[test]
    fn test_code_block_wrapper() {
        let html = PlainHooks.on_code_block(None, "a < b");
        assert!(html.contains("code-block-wrapper"));
        assert!(html.contains(r#"<span class="code-block-lang">plaintext</span>"#));
        assert!(html.contains(r#"<code class="language-plaintext">a &lt; b</code>"#));
        assert!(html.contains("navigator.clipboard.writeText"));
    }

    #[test]
    fn test_site_hooks_rewrite_images() {
        let hooks = SiteHooks::new(&SiteConfig::default());
        let html = hooks.on_image("../../public/blog/foo.png", "A \"foo\"", "");
        assert_eq!(
            html,
            r#"<img src="foo.png" alt="A &quot;foo&quot;" loading="lazy" />"#
        );
    }

    #[test]
    fn test_math_disabled_keeps_source() {
        let mut config = SiteConfig::default();
        config.math.enable = false;
        let hooks = SiteHooks::new(&config);
        assert_eq!(
            hooks.on_math("a<b", MathMode::Display),
            r#"<span class="math">$$a&lt;b$$</span>"#
        );
    }

    #[test]
    fn test_math_error_markup() {
        let hooks = SiteHooks::new(&SiteConfig::default());
        let html = hooks.math_error(r"\frac{", MathMode::Inline);
        assert_eq!(
            html,
            r#"<span class="math-error" style="color:#FF0000">$\frac{$</span>"#
        );
    }

    #[test]
    fn test_highlighted_code_block() {
        let mut config = SiteConfig::default();
        config.highlight.enable = true;
        let hooks = SiteHooks::new(&config);
        let html = hooks.on_code_block(Some("rust"), "fn main() {}\n");
        assert!(html.contains(r#"<code class="language-rust">"#));
        assert!(html.contains("<span"));
        assert!(!html.contains("<pre style"));
    }
}
