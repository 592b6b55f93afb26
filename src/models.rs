//! Data models for generated articles and the feeds they are presented in.
//!
//! This module defines the core data structures used throughout the application:
//! - [`RawArticle`]: An article exactly as the generative service returned it
//! - [`Article`]: A presentable article, carrying the (always unset) permalink
//! - [`Translation`]: The three text fields returned by the translation call
//! - [`Feed`]: One timestamped batch of articles, as written to JSON
//!
//! The models use camelCase field names to match the JSON schema declared to
//! the model, hence the `rename_all` attributes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language tag of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// English; candidates for translation.
    En,
    /// Spanish; either generated that way or translated.
    Es,
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lang::En => f.write_str("en"),
            Lang::Es => f.write_str("es"),
        }
    }
}

/// An article record as produced by the article-source call.
///
/// Every field is required by the declared response schema; records missing
/// any of them fail deserialization and with it the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    /// Integer id, unique within one batch (as asserted by the generator).
    pub id: i64,
    /// The article headline.
    pub title: String,
    /// A short summary shown on the feed card.
    pub summary: String,
    /// The multi-paragraph body shown in the detail view.
    pub full_content: String,
    /// Free-text attribution, e.g. "The Verge".
    pub source: String,
    /// Placeholder image URL, not verified.
    pub image_url: String,
    /// Language the article was generated in.
    pub lang: Lang,
}

/// A presentable article.
///
/// Identical to [`RawArticle`] plus the permalink. The generator never
/// produces a real link, so `url` stays `None` and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub full_content: String,
    pub source: String,
    pub image_url: String,
    pub lang: Lang,
    pub url: Option<String>,
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            summary: raw.summary,
            full_content: raw.full_content,
            source: raw.source,
            image_url: raw.image_url,
            lang: raw.lang,
            url: None,
        }
    }
}

impl Article {
    /// Overwrite the text fields with a translation and tag the article Spanish.
    ///
    /// `id`, `source`, `image_url` and `url` are kept from the original.
    pub fn apply_translation(&mut self, translation: Translation) {
        self.title = translation.title;
        self.summary = translation.summary;
        self.full_content = translation.full_content;
        self.lang = Lang::Es;
    }

    /// Split the body into paragraphs on blank lines, falling back to single
    /// newlines when the model did not leave blank lines between paragraphs.
    pub fn paragraphs(&self) -> Vec<&str> {
        let blank_line = crate::utils::blank_line_regex();
        let mut parts: Vec<&str> = blank_line
            .split(self.full_content.trim())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() <= 1 {
            parts = self
                .full_content
                .lines()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect();
        }
        parts
    }
}

/// The three text fields of an article in the target language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub title: String,
    pub summary: String,
    pub full_content: String,
}

impl Translation {
    /// A translation is only usable when every field carries text.
    pub fn is_complete(&self) -> bool {
        !(self.title.trim().is_empty()
            || self.summary.trim().is_empty()
            || self.full_content.trim().is_empty())
    }

    /// True when every field differs from the article it was made from.
    /// An echo of the original text is not a translation.
    pub fn changes_all_fields_of(&self, original: &Article) -> bool {
        self.title.trim() != original.title.trim()
            && self.summary.trim() != original.summary.trim()
            && self.full_content.trim() != original.full_content.trim()
    }
}

/// One presented batch of articles.
///
/// Each run of the pipeline produces one `Feed`, which is written to JSON
/// when an output directory is configured.
#[derive(Debug, Deserialize, Serialize)]
pub struct Feed {
    /// The date the batch was generated, `YYYY-MM-DD`.
    pub local_date: String,
    /// The local time the batch was generated, `HH:MM:SS`.
    pub local_time: String,
    /// The articles in fetch order.
    pub articles: Vec<Article>,
}

impl Feed {
    /// Stamp a batch with the current local date and time.
    pub fn now(articles: Vec<Article>) -> Self {
        let now = chrono::Local::now();
        Self {
            local_date: now.date_naive().to_string(),
            local_time: now.format("%H:%M:%S").to_string(),
            articles,
        }
    }
}
