//! Translation client: one structured call per English article.
//!
//! The three text fields are embedded verbatim in the instruction and the
//! model must answer with exactly those three fields in Spanish. Translation
//! is all-or-nothing; a response missing a field, carrying an empty one, or
//! repeating any original field unchanged fails the whole article.

use crate::api::GenerativeModel;
use crate::errors::NewsError;
use crate::models::{Article, Translation};
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

/// Declared response schema for one translated article.
pub static TRANSLATION_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING", "description": "The translated title of the article." },
            "summary": { "type": "STRING", "description": "The translated summary of the article." },
            "fullContent": { "type": "STRING", "description": "The translated full content of the article." }
        },
        "required": ["title", "summary", "fullContent"]
    })
});

/// Instruction asking for a Spanish rendition of `article`.
pub fn translation_prompt(article: &Article) -> String {
    format!(
        "Translate the following article title, summary, and full content to Spanish. Provide the response as a JSON object with 'title', 'summary', and 'fullContent' keys.

Original Title: \"{}\"
Original Summary: \"{}\"
Original Full Content: \"{}\"
",
        article.title, article.summary, article.full_content
    )
}

/// Translate one article's text fields into Spanish.
///
/// The caller recombines the result with the untranslated fields; see
/// [`Article::apply_translation`].
///
/// # Errors
///
/// Returns [`NewsError::Translation`] naming the article if the call fails
/// or the response is not a complete translation.
#[instrument(level = "info", skip_all, fields(id = article.id))]
pub async fn translate_article_to_spanish<M: GenerativeModel>(
    model: &M,
    article: &Article,
) -> Result<Translation, NewsError> {
    let failed = || NewsError::Translation {
        title: article.title.clone(),
    };

    let text = model
        .generate(&translation_prompt(article), &TRANSLATION_SCHEMA)
        .await
        .map_err(|e| {
            warn!(error = %e, "Error translating article");
            failed()
        })?;

    let translation: Translation = serde_json::from_str(text.trim()).map_err(|e| {
        warn!(
            error = %e,
            response_preview = %truncate_for_log(&text, 300),
            "Translation did not match the schema"
        );
        failed()
    })?;

    if !translation.is_complete() {
        warn!("Translation came back with an empty field");
        return Err(failed());
    }
    if !translation.changes_all_fields_of(article) {
        warn!("Translation echoed the original text");
        return Err(failed());
    }

    debug!("Translated article");
    Ok(translation)
}
