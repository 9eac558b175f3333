//! Errors surfaced by the ranking engine.

use sources::SourceError;
use thiserror::Error;

/// Hard failures of a ranking or recording request.
///
/// Source failures during ranking degrade to fewer results and are only
/// logged; these variants are what is left.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Viewer not found: {0}")]
    ViewerNotFound(String),

    #[error("Invalid interaction: {0}")]
    InvalidInteraction(String),

    #[error("Store error: {0}")]
    Store(#[from] SourceError),

    #[error("Scoring task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
