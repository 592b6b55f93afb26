//! Article-source client: one structured call that generates the whole batch.
//!
//! The instruction template fixes every parameter of the request (ten
//! articles, a topic mix, and a quota of at least three Spanish articles), so
//! the only input is the backend carrying the credential.
//!
//! Conformance is enforced by the declared response schema plus two local
//! checks: the top level must be a JSON array, and every element must
//! deserialize into a [`RawArticle`]. Any failure collapses into
//! [`NewsError::Acquisition`]; the cause is only logged.

use crate::api::GenerativeModel;
use crate::errors::NewsError;
use crate::models::RawArticle;
use crate::utils::{looks_truncated, truncate_for_log};
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use std::time::Instant;
use tracing::{error, info, instrument};

/// Number of articles requested per batch.
pub const ARTICLE_COUNT: usize = 10;

/// Minimum number of Spanish-language articles requested per batch.
pub const MIN_SPANISH_ARTICLES: usize = 3;

/// Instruction sent to the model for one batch.
pub fn news_prompt() -> String {
    format!(
        "Act as a tech news aggregator. Generate a list of {ARTICLE_COUNT} recent and realistic-sounding tech news articles from the last week.
For each article, provide a unique integer ID, a title, a short summary, a longer full content (at least 3 paragraphs), a plausible source (e.g., The Verge, TechCrunch, Wired, Xataka), a placeholder image URL from picsum.photos in the format https://picsum.photos/seed/UNIQUE_SEED/600/400, and the language of the article ('en' for English or 'es' for Spanish).
Ensure the articles are diverse and cover topics like AI, hardware, software, and tech policy. At least {MIN_SPANISH_ARTICLES} of the articles must be generated in perfect Spanish. The rest must be in English.
Provide the response as a JSON object adhering to the provided schema."
    )
}

/// Declared response schema: an array of fully populated article objects.
pub static NEWS_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "INTEGER", "description": "A unique integer ID for the article." },
                "title": { "type": "STRING", "description": "The title of the news article." },
                "summary": { "type": "STRING", "description": "A short summary of the article." },
                "fullContent": { "type": "STRING", "description": "The full content of the article, at least 3 paragraphs long." },
                "source": { "type": "STRING", "description": "The plausible source of the news (e.g., The Verge, TechCrunch)." },
                "imageUrl": { "type": "STRING", "description": "A placeholder image URL from picsum.photos." },
                "lang": { "type": "STRING", "description": "The language of the article, either 'en' for English or 'es' for Spanish." }
            },
            "required": ["id", "title", "summary", "fullContent", "source", "imageUrl", "lang"]
        }
    })
});

/// Parse the model's response text into an ordered batch.
///
/// # Errors
///
/// Returns a description of the first problem found: malformed JSON, a
/// non-array top level, or an element that does not match the schema.
pub fn parse_articles(text: &str) -> Result<Vec<RawArticle>, String> {
    let value: Value = serde_json::from_str(text.trim()).map_err(|e| {
        if looks_truncated(&e) {
            format!("response was cut off: {e}")
        } else {
            format!("response is not JSON: {e}")
        }
    })?;

    let Value::Array(items) = value else {
        return Err("API returned data in an unexpected format.".to_string());
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<RawArticle>(item)
                .map_err(|e| format!("article {i} does not match the schema: {e}"))
        })
        .collect()
}

/// Generate one batch of articles.
///
/// # Errors
///
/// Returns [`NewsError::Acquisition`] on any transport failure or
/// non-conforming response; no partial batch is ever returned.
#[instrument(level = "info", skip_all)]
pub async fn fetch_latest_tech_news<M: GenerativeModel>(
    model: &M,
) -> Result<Vec<RawArticle>, NewsError> {
    let t0 = Instant::now();
    let text = model
        .generate(&news_prompt(), &NEWS_SCHEMA)
        .await
        .map_err(|e| {
            error!(error = %e, "Error fetching latest tech news");
            NewsError::Acquisition
        })?;

    match parse_articles(&text) {
        Ok(articles) => {
            info!(
                count = articles.len(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Fetched article batch"
            );
            Ok(articles)
        }
        Err(reason) => {
            error!(
                %reason,
                response_preview = %truncate_for_log(&text, 300),
                "Model returned non-conforming news batch"
            );
            Err(NewsError::Acquisition)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Lang;
    use std::cell::RefCell;
    use std::error::Error;

    /// Returns one canned response and records the prompt it was asked with.
    struct Canned {
        response: Result<String, String>,
        prompts: RefCell<Vec<String>>,
    }

    impl Canned {
        fn ok(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
                prompts: RefCell::new(Vec::new()),
            }
        }

        fn err(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl GenerativeModel for Canned {
        async fn generate(&self, prompt: &str, schema: &Value) -> Result<String, Box<dyn Error>> {
            assert_eq!(schema["type"], "ARRAY");
            self.prompts.borrow_mut().push(prompt.to_string());
            self.response.clone().map_err(Into::into)
        }
    }

    const TWO_ARTICLES: &str = r#"[
        {"id": 1, "title": "AI chips", "summary": "s1", "fullContent": "c1",
         "source": "Wired", "imageUrl": "https://picsum.photos/seed/a/600/400", "lang": "en"},
        {"id": 2, "title": "Nuevos móviles", "summary": "s2", "fullContent": "c2",
         "source": "Xataka", "imageUrl": "https://picsum.photos/seed/b/600/400", "lang": "es"}
    ]"#;

    #[test]
    fn test_prompt_fixes_batch_parameters() {
        let prompt = news_prompt();
        assert!(prompt.contains("Generate a list of 10"));
        assert!(prompt.contains("At least 3 of the articles must be generated in perfect Spanish"));
        assert!(prompt.contains("https://picsum.photos/seed/UNIQUE_SEED/600/400"));
    }

    #[test]
    fn test_schema_requires_every_article_field() {
        let required = NEWS_SCHEMA["items"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 7);
        assert!(required.contains(&json!("fullContent")));
        assert!(!required.contains(&json!("url")));
    }

    #[test]
    fn test_parse_articles_keeps_order() {
        let articles = parse_articles(TWO_ARTICLES).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].id, 1);
        assert_eq!(articles[0].lang, Lang::En);
        assert_eq!(articles[1].title, "Nuevos móviles");
    }

    #[test]
    fn test_parse_articles_rejects_object() {
        let err = parse_articles(r#"{"articles": []}"#).unwrap_err();
        assert!(err.contains("unexpected format"));
    }

    #[test]
    fn test_parse_articles_rejects_truncated() {
        let err = parse_articles(r#"[{"id": 1, "title": "AI"#).unwrap_err();
        assert!(err.contains("cut off"));
    }

    #[test]
    fn test_parse_articles_rejects_incomplete_record() {
        let err = parse_articles(r#"[{"id": 1, "title": "t"}]"#).unwrap_err();
        assert!(err.contains("article 0"));
    }

    #[tokio::test]
    async fn test_fetch_returns_batch() {
        let model = Canned::ok(TWO_ARTICLES);
        let articles = fetch_latest_tech_news(&model).await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(model.prompts.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_non_array_is_acquisition_failure() {
        let model = Canned::ok(r#""just a string""#);
        assert_eq!(
            fetch_latest_tech_news(&model).await.unwrap_err(),
            NewsError::Acquisition
        );
    }

    #[tokio::test]
    async fn test_fetch_transport_error_is_acquisition_failure() {
        let model = Canned::err("HTTP 401");
        assert_eq!(
            fetch_latest_tech_news(&model).await.unwrap_err(),
            NewsError::Acquisition
        );
    }

    #[tokio::test]
    async fn test_fetch_empty_array_is_empty_batch() {
        let model = Canned::ok("[]");
        assert!(fetch_latest_tech_news(&model).await.unwrap().is_empty());
    }
}
