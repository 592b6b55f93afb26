//! The acquisition pipeline: fetch, translate English articles, merge.
//!
//! 1. **Fetching**: one call to the article source; failure aborts the run
//! 2. **Localizing**: every `en` article is submitted for translation, all at
//!    once, joined as a group; `es` articles pass through untouched
//! 3. **Merging**: each result is written back into its own article; a failed
//!    translation leaves the original English article in place
//!
//! The output keeps fetch order and size regardless of translation outcomes.

use crate::api::GenerativeModel;
use crate::errors::NewsError;
use crate::models::{Article, Lang};
use crate::news::fetch_latest_tech_news;
use crate::translate::translate_article_to_spanish;
use futures::future::join_all;
use itertools::Itertools;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Per-run counts, for diagnostics only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Articles generated in Spanish, passed through unchanged.
    pub already_spanish: usize,
    /// English articles successfully translated.
    pub translated: usize,
    /// English articles left in English because translation failed.
    pub untranslated: usize,
}

impl PipelineReport {
    pub fn total(&self) -> usize {
        self.already_spanish + self.translated + self.untranslated
    }
}

/// Translate every English article in `articles`, in place.
///
/// All translations are in flight concurrently and awaited as one join.
/// Individual failures are logged and recovered by keeping the original
/// article. Re-applying this to its own output submits nothing.
#[instrument(level = "info", skip_all, fields(count = articles.len()))]
pub async fn localize<M: GenerativeModel>(model: &M, articles: &mut [Article]) -> PipelineReport {
    let (pending, spanish): (Vec<&mut Article>, Vec<&mut Article>) =
        articles.iter_mut().partition(|a| a.lang == Lang::En);

    let mut report = PipelineReport {
        already_spanish: spanish.len(),
        ..PipelineReport::default()
    };
    if pending.is_empty() {
        return report;
    }

    let results = join_all(
        pending
            .iter()
            .map(|article| translate_article_to_spanish(model, article)),
    )
    .await;

    for (article, result) in pending.into_iter().zip(results) {
        match result {
            Ok(translation) => {
                article.apply_translation(translation);
                report.translated += 1;
            }
            Err(e) => {
                warn!(
                    id = article.id,
                    error = %e,
                    "Could not translate article, using original version"
                );
                report.untranslated += 1;
            }
        }
    }
    report
}

/// Run the whole pipeline for one credential-bound backend.
///
/// # Errors
///
/// Returns [`NewsError::Acquisition`] when the source call fails; translation
/// failures never surface here.
#[instrument(level = "info", skip_all)]
pub async fn load_and_translate_news<M: GenerativeModel>(
    model: &M,
) -> Result<(Vec<Article>, PipelineReport), NewsError> {
    let t0 = Instant::now();
    let mut articles: Vec<Article> = fetch_latest_tech_news(model)
        .await?
        .into_iter()
        .map(Article::from)
        .collect();

    let report = localize(model, &mut articles).await;
    let langs = articles.iter().counts_by(|a| a.lang);
    info!(
        total = articles.len(),
        already_spanish = report.already_spanish,
        translated = report.translated,
        untranslated = report.untranslated,
        es = langs.get(&Lang::Es).copied().unwrap_or(0),
        en = langs.get(&Lang::En).copied().unwrap_or(0),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Pipeline complete"
    );
    Ok((articles, report))
}
