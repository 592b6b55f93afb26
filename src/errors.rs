//! Error types for the news pipeline.
//!
//! The `Display` text of each variant is the message shown to the reader, so
//! underlying causes are logged where they happen and never folded into it.

use thiserror::Error;

/// Message shown when no conforming batch could be generated.
pub const ACQUISITION_FAILED: &str = "No se pudieron generar las noticias. Verifica que tu API Key sea correcta o el estado del servicio de Google AI.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NewsError {
    /// The source call failed: transport, auth, quota or malformed output.
    #[error("{}", ACQUISITION_FAILED)]
    Acquisition,

    /// A single article could not be translated.
    #[error("Fallo al traducir el artículo: {title}")]
    Translation { title: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("API key must not be empty")]
    Empty,
}
