use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A job offer as served by `/api/job-offers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOffer {
    pub id: i64,
    #[serde(default)]
    pub offerer_id: Option<i64>,
    #[serde(default)]
    pub offerer_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contract_type: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub raw_text: Option<String>,
    #[serde(rename = "isActive", default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl JobOffer {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Untitled Job")
    }

    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(false)
    }

    /// Text handed to the extractor: the raw posting, or its description.
    pub fn source_text(&self) -> Option<&str> {
        self.raw_text
            .as_deref()
            .or(self.description.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

/// Spring list endpoints answer either with a page (`{"content": [...]}`) or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Page { content: Vec<T> },
    Items(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Page { content } => content,
            Listing::Items(items) => items,
        }
    }
}

/// Posting submitted by a job poster as free text.
#[derive(Debug, Deserialize, Validate)]
pub struct NewPosting {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,

    #[validate(length(min = 50, message = "Description must be at least 50 characters"))]
    pub description: String,
}

/// Job description uploaded as a document; the backend extracts the offer from it.
#[derive(Debug, Validate)]
pub struct JobFile {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "File name is required"))]
    pub file_name: String,

    pub content_type: Option<String>,

    #[validate(length(min = 1, message = "File is empty"))]
    pub data: Vec<u8>,
}

impl JobFile {
    /// Title used when the upload form leaves it blank: the file name without extension.
    pub fn title_from_file_name(file_name: &str) -> String {
        let stem = match file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => file_name,
        };
        stem.replace(['_', '-'], " ").trim().to_string()
    }
}
