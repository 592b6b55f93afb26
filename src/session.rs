//! Session state and the controller that drives it.
//!
//! [`AppState`] is the whole surface the presentation layer sees: the
//! article batch, the loading flag, an optional error message and an optional
//! selected article. It only changes through the transition methods below,
//! each of which consumes the old state and returns the new one.
//!
//! ```text
//! NoCredential --submit--> Loading --ok--> Ready --submit--> Loading
//!                                  \--err--> Error --reset--> NoCredential
//! ```
//!
//! There is no retry state: leaving `Error` takes a new submission or a reset.

use crate::api::GenerativeModel;
use crate::credential::{Credential, CredentialStore};
use crate::errors::{CredentialError, NewsError};
use crate::models::Article;
use crate::pipeline::{PipelineReport, load_and_translate_news};
use tracing::{debug, info, instrument, warn};

/// Number of articles shown in the highlights column next to the feed.
pub const HIGHLIGHT_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    NoCredential,
    Loading,
    Error,
    Ready,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub credential: Option<Credential>,
    pub articles: Vec<Article>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub selected: Option<Article>,
}

/// What the presentation layer should render for a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View<'a> {
    /// No key yet; ask for one.
    ApiKeyForm,
    Loading,
    Error(&'a str),
    Detail(&'a Article),
    Feed {
        articles: &'a [Article],
        highlights: &'a [Article],
    },
    /// A run finished without error but produced no articles.
    Empty,
}

impl AppState {
    pub fn status(&self) -> SessionStatus {
        if self.credential.is_none() {
            SessionStatus::NoCredential
        } else if self.is_loading {
            SessionStatus::Loading
        } else if self.error.is_some() {
            SessionStatus::Error
        } else {
            SessionStatus::Ready
        }
    }

    /// Start a run for `credential`, discarding the previous batch.
    pub fn submit_credential(self, credential: Credential) -> Self {
        Self {
            credential: Some(credential),
            articles: Vec::new(),
            is_loading: true,
            error: None,
            selected: None,
        }
    }

    /// Replace the batch wholesale with the result of a finished run.
    ///
    /// Only applies while `Loading`: a result arriving after a reset, or in
    /// `Error` or `Ready`, leaves the state unchanged.
    pub fn load_succeeded(self, articles: Vec<Article>) -> Self {
        if self.status() != SessionStatus::Loading {
            return self;
        }
        Self {
            articles,
            is_loading: false,
            error: None,
            selected: None,
            ..self
        }
    }

    /// Record a failed run. Only applies while `Loading`.
    pub fn load_failed(self, message: impl Into<String>) -> Self {
        if self.status() != SessionStatus::Loading {
            return self;
        }
        Self {
            articles: Vec::new(),
            is_loading: false,
            error: Some(message.into()),
            selected: None,
            ..self
        }
    }

    /// Forget the credential together with the batch, selection and error.
    pub fn reset_credential(self) -> Self {
        Self::default()
    }

    /// Open the detail view for the first article with `id`.
    ///
    /// Only meaningful while `Ready`; unknown ids leave the state unchanged.
    pub fn select_article(self, id: i64) -> Self {
        if self.status() != SessionStatus::Ready {
            return self;
        }
        match self.articles.iter().find(|a| a.id == id).cloned() {
            Some(article) => Self {
                selected: Some(article),
                ..self
            },
            None => self,
        }
    }

    pub fn back_to_feed(self) -> Self {
        Self {
            selected: None,
            ..self
        }
    }

    /// The view to render, in order of precedence: key prompt, loading,
    /// error, detail, feed, empty.
    pub fn view(&self) -> View<'_> {
        if self.credential.is_none() {
            return View::ApiKeyForm;
        }
        if self.is_loading {
            return View::Loading;
        }
        if let Some(error) = &self.error {
            return View::Error(error);
        }
        if let Some(article) = &self.selected {
            return View::Detail(article);
        }
        if self.articles.is_empty() {
            return View::Empty;
        }
        let highlights = &self.articles[..self.articles.len().min(HIGHLIGHT_COUNT)];
        View::Feed {
            articles: &self.articles,
            highlights,
        }
    }
}

/// Owns the session state and the credential slot, and runs the pipeline.
#[derive(Debug, Default)]
pub struct Session {
    state: AppState,
    store: CredentialStore,
}

impl Session {
    /// Open a session over `store`, picking up a key stored earlier in it.
    ///
    /// A picked-up key starts in `Loading`; call [`Session::load`] to run.
    pub fn new(store: CredentialStore) -> Self {
        let state = match store.load() {
            Some(credential) => AppState::default().submit_credential(credential),
            None => AppState::default(),
        };
        Self { state, store }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    fn transition(&mut self, f: impl FnOnce(AppState) -> AppState) {
        let before = self.state.status();
        self.state = f(std::mem::take(&mut self.state));
        let after = self.state.status();
        if before != after {
            debug!(?before, ?after, "Session transition");
        }
    }

    /// Validate and store a key, then move to `Loading`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Empty`] for a blank key; the state is left
    /// untouched in that case.
    pub fn submit_key(&mut self, key: &str) -> Result<Credential, CredentialError> {
        let credential = Credential::new(key)?;
        self.store.store(credential.clone());
        let submitted = credential.clone();
        self.transition(|s| s.submit_credential(submitted));
        info!("API key submitted");
        Ok(credential)
    }

    /// Run the pipeline against `model` and record the outcome.
    ///
    /// Only runs while `Loading`, i.e. right after a key was submitted.
    /// Translation failures are absorbed by the pipeline; only an
    /// acquisition failure moves the session to `Error`.
    #[instrument(level = "info", skip_all)]
    pub async fn load<M: GenerativeModel>(&mut self, model: &M) -> Option<PipelineReport> {
        let status = self.status();
        if status != SessionStatus::Loading {
            warn!(?status, "load requested outside of Loading; submit a key first");
            return None;
        }

        match load_and_translate_news(model).await {
            Ok((articles, report)) => {
                self.transition(|s| s.load_succeeded(articles));
                Some(report)
            }
            Err(e) => {
                self.fail(&e);
                None
            }
        }
    }

    fn fail(&mut self, e: &NewsError) {
        warn!(error = %e, "Could not load news");
        let message = e.to_string();
        self.transition(|s| s.load_failed(message));
    }

    /// Clear the stored key and return to the key prompt.
    pub fn reset(&mut self) {
        self.store.clear();
        self.transition(AppState::reset_credential);
        info!("API key cleared");
    }

    pub fn select(&mut self, id: i64) -> Option<&Article> {
        self.transition(|s| s.select_article(id));
        self.state.selected.as_ref()
    }

    pub fn back(&mut self) {
        self.transition(AppState::back_to_feed);
    }
}
