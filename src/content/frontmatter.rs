//! Front-matter parsing
//!
//! A post may start with a metadata block:
//!
//! ```text
//! ---
//! date: dd/mm/yyyy
//! topics: space separated list
//! ---
//! ```
//!
//! Both keys are required and must appear in that order. Anything else at
//! the top of the document is treated as regular content.

use lazy_static::lazy_static;
use regex::Regex;

use super::PostMetadata;

lazy_static! {
    static ref FRONT_MATTER: Regex = Regex::new(
        r"\A---[ \t]*\r?\ndate: (\d{2}/\d{2}/\d{4})[ \t]*\r?\ntopics: ([^\r\n]+?)[ \t]*\r?\n---[ \t]*(?:\r?\n|\z)"
    )
    .expect("front-matter pattern is valid");
}

/// Front-matter extraction
pub struct FrontMatter;

impl FrontMatter {
    /// Split a post into its metadata and the remaining body.
    ///
    /// Malformed or partial blocks are not an error: the text is returned
    /// unchanged with empty metadata.
    pub fn parse(content: &str) -> (PostMetadata, &str) {
        let Some(caps) = FRONT_MATTER.captures(content) else {
            return (PostMetadata::default(), content);
        };

        let date = caps[1].to_string();
        let topics = caps[2].split_whitespace().map(str::to_string).collect();
        // \A anchors the match at 0
        let end = caps.get(0).map_or(0, |m| m.end());

        (PostMetadata { date, topics }, &content[end..])
    }

    /// Render a front-matter block for a new post
    pub fn render(meta: &PostMetadata) -> String {
        format!(
            "---\ndate: {}\ntopics: {}\n---\n",
            meta.date,
            meta.topics.join(" ")
        )
    }
}
