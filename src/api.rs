//! Gemini API interaction behind a small async trait.
//!
//! This module provides the single seam between the application and the
//! generative service. Both the article-source call and the translation call
//! go through [`GenerativeModel::generate`]: a prompt plus a declared response
//! schema in, the model's JSON text out.
//!
//! # Architecture
//!
//! - [`GenerativeModel`]: Core trait defining async structured generation
//! - [`GeminiClient`]: Production implementation over the Gemini REST API
//!
//! Failed calls are not retried. The caller decides whether a failure is
//! fatal (article generation) or recoverable (translation).

use crate::config::Config;
use crate::credential::Credential;
use crate::utils::truncate_for_log;
use serde::Deserialize;
use serde_json::{Value, json};
use std::error::Error;
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use url::Url;

/// Trait for structured generation against an LLM.
///
/// Implementors send a prompt together with a JSON response schema and
/// return the raw JSON text the model produced. Parsing is left to callers,
/// so that canned implementations can return malformed payloads in tests.
pub trait GenerativeModel {
    /// Send `prompt` and ask for a response conforming to `schema`.
    ///
    /// # Returns
    ///
    /// The model's response text (expected to be JSON), or an error if the
    /// request failed or produced no text.
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<String, Box<dyn Error>>;
}

/// Client for the Gemini `generateContent` endpoint.
///
/// One client is bound to one credential; a new key means a new client.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: Url,
    credential: Credential,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("credential", &self.credential)
            .finish()
    }
}

impl GeminiClient {
    /// Build a client from configuration and a session credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured endpoint is invalid or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &Config, credential: Credential) -> Result<Self, Box<dyn Error>> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint()?,
            credential,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Concatenate the text parts of the first candidate.
fn candidate_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn request_body(prompt: &str, schema: &Value) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": schema
        }
    })
}

impl GenerativeModel for GeminiClient {
    #[instrument(level = "info", skip_all, fields(endpoint = %self.endpoint))]
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let response = self
            .http
            .post(self.endpoint.clone())
            .header("x-goog-api-key", self.credential.expose())
            .json(&request_body(prompt, schema))
            .send()
            .await
            .inspect_err(|e| {
                warn!(elapsed_ms = t0.elapsed().as_millis() as u64, error = %e, "API call failed")
            })?;

        let status = response.status();
        let body = response.text().await?;
        let elapsed_ms = t0.elapsed().as_millis() as u64;

        if !status.is_success() {
            warn!(
                elapsed_ms,
                %status,
                body_preview = %truncate_for_log(&body, 300),
                "API returned an error status"
            );
            return Err(format!("Gemini returned HTTP {status}").into());
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        match candidate_text(parsed) {
            Some(text) => {
                debug!(elapsed_ms, bytes = text.len(), "API call succeeded");
                Ok(text)
            }
            None => {
                warn!(
                    elapsed_ms,
                    body_preview = %truncate_for_log(&body, 300),
                    "API response carried no candidate text"
                );
                Err("Gemini response contained no text".into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn client_for(server: &MockServer) -> GeminiClient {
        let config = Config {
            api_base: server.uri(),
            ..Config::default()
        };
        GeminiClient::new(&config, Credential::new("test-key").unwrap()).unwrap()
    }

    fn reply(parts: Value) -> Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": parts },
                "finishReason": "STOP"
            }]
        })
    }

    #[test]
    fn test_candidate_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(reply(json!([
            { "text": " [{\"a\":" },
            { "text": "1}] " }
        ])))
        .unwrap();
        assert_eq!(candidate_text(response).as_deref(), Some("[{\"a\":1}]"));
    }

    #[test]
    fn test_candidate_text_empty_when_no_candidates() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(candidate_text(response), None);
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let client = GeminiClient::new(&Config::default(), Credential::new("secret-key").unwrap())
            .unwrap();
        assert!(!format!("{client:?}").contains("secret-key"));
    }

    #[tokio::test]
    async fn test_generate_sends_schema_and_key() {
        let server = MockServer::start().await;
        let schema = json!({ "type": "ARRAY" });

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": { "type": "ARRAY" }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply(json!([{ "text": "[]" }]))))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server).generate("hello", &schema).await.unwrap();
        assert_eq!(text, "[]");
    }

    #[tokio::test]
    async fn test_generate_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate("hello", &json!({}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_generate_fails_on_empty_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        assert!(client_for(&server).generate("hello", &json!({})).await.is_err());
    }

    #[tokio::test]
    async fn test_generate_fails_on_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        assert!(client_for(&server).generate("hello", &json!({})).await.is_err());
    }
}
