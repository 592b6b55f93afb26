//! Output generation: what the reader sees and what is kept on disk.
//!
//! # Submodules
//!
//! - [`markdown`]: Renders every session view (key prompt, loading, error,
//!   feed, detail, empty) as Markdown
//! - [`json`]: Writes a finished batch to a dated JSON file

pub mod json;
pub mod markdown;
