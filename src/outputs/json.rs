//! JSON output of a presented batch.
//!
//! Files are organized by date, one file per run:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── 08-15-02.json
//!     └── 17-40-55.json
//! ```

use crate::models::Feed;
use crate::utils::ensure_writable_dir;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`Feed`] to `{json_output_dir}/{date}/{HH-MM-SS}.json`.
///
/// # Returns
///
/// The path written to, or an error if directory creation or the write fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_feed(feed: &Feed, json_output_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(feed)?;

    let dir = PathBuf::from(json_output_dir).join(&feed.local_date);
    let dir_str = dir.to_string_lossy().to_string();
    if let Err(e) = ensure_writable_dir(&dir_str).await {
        error!(dir = %dir_str, error = %e, "Failed to prepare JSON dir");
        return Err(e);
    }

    let path = dir.join(format!("{}.json", feed.local_time.replace(':', "-")));
    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = feed.articles.len(), "Wrote feed JSON");
    Ok(path)
}
