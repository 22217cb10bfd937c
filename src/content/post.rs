//! Post models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used in front-matter (`dd/mm/yyyy`)
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// A post as read from disk, before any parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    /// Identifier derived from the file name (stem)
    pub source_id: String,

    /// Full file content, front-matter included
    pub raw_text: String,
}

impl RawPost {
    pub fn new(source_id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            raw_text: raw_text.into(),
        }
    }
}

/// Metadata extracted from the front-matter block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetadata {
    /// Publication date as written (`dd/mm/yyyy`), empty when absent
    pub date: String,

    /// Topics in declaration order
    pub topics: Vec<String>,
}

impl PostMetadata {
    /// Parse the date string, if it is a valid calendar date
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

/// Heading level recorded in the anchor list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum AnchorLevel {
    H2,
    H3,
}

impl AnchorLevel {
    pub fn as_u8(self) -> u8 {
        match self {
            AnchorLevel::H2 => 2,
            AnchorLevel::H3 => 3,
        }
    }
}

impl From<AnchorLevel> for u8 {
    fn from(level: AnchorLevel) -> Self {
        level.as_u8()
    }
}

impl TryFrom<u8> for AnchorLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(AnchorLevel::H2),
            3 => Ok(AnchorLevel::H3),
            other => Err(format!("anchor level must be 2 or 3, got {}", other)),
        }
    }
}

/// An in-page navigation entry for an h2/h3 heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingAnchor {
    pub id: String,
    pub title: String,
    pub level: AnchorLevel,
}

/// A fully rendered post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedPost {
    /// Title taken from the level-1 heading, or the source id
    pub name: String,

    /// Identifier of the file this post came from
    pub source_id: String,

    /// Rendered body
    pub html: String,

    pub metadata: PostMetadata,

    /// h2/h3 anchors in document order
    pub anchors: Vec<HeadingAnchor>,
}

/// The listing/search view of a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub name: String,
    pub date: String,
    pub topics: Vec<String>,
    pub path: String,
}
