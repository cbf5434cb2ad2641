use std::path::PathBuf;
use thiserror::Error;

use crate::provider::ProviderError;

/// User-facing validation failures. Reported immediately, never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a YouTube URL")]
    MissingUrl,

    #[error("Invalid YouTube URL")]
    InvalidUrl,

    #[error("Please fetch a transcript first")]
    MissingTranscript,

    #[error("No content to send")]
    MissingContent,

    #[error("Please select a WordPress account")]
    MissingAccount,

    #[error("Please enter a post title")]
    MissingTitle,

    #[error("Please fill in the required fields: {fields}")]
    MissingFields { fields: String },

    #[error("Please enter a template title")]
    MissingTemplateTitle,

    #[error("No content to save as template")]
    MissingTemplateContent,

    #[error("No post is being edited")]
    NotEditing,
}

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Transcript fetch failed for {video_id}: {reason}")]
    TranscriptFailed { video_id: String, reason: String },

    #[error("Content generation failed: {reason}")]
    GenerationFailed { reason: String },

    #[error("WordPress request to {site_url} failed ({status}): {reason}")]
    WordPressFailed {
        site_url: String,
        status: u16,
        reason: String,
    },

    #[error("Unknown content type: {0}")]
    UnknownContentType(String),

    #[error("Unknown post status: {0}")]
    UnknownPostStatus(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid config {path}: {reason}")]
    ConfigFailed { path: PathBuf, reason: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ForgeError>;
