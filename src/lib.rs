//! # Global Tech Feed
//!
//! Generates a feed of tech news articles with Gemini and makes sure the
//! reader gets it in Spanish: articles generated in English are translated,
//! one concurrent request per article.
//!
//! ## Usage
//!
//! ```sh
//! GEMINI_API_KEY=... global_tech_feed
//! ```
//!
//! ## Architecture
//!
//! 1. **Credential**: the key is validated and held for this session only
//! 2. **Fetching**: one structured request generates the whole batch
//! 3. **Localizing**: English articles are translated concurrently; a failed
//!    translation keeps the original article
//! 4. **Output**: the session view is rendered as Markdown, and the batch is
//!    optionally written as JSON

pub mod api;
pub mod cli;
pub mod config;
pub mod credential;
pub mod errors;
pub mod models;
pub mod news;
pub mod outputs;
pub mod pipeline;
pub mod session;
pub mod translate;
pub mod utils;
