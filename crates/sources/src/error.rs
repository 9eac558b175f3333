//! Errors returned by collaborator sources and stores.

use thiserror::Error;

/// Failure of an external collaborator call.
///
/// The ranking engine treats every variant as "no data from this call";
/// none of them abort a ranking request on their own.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

pub type Result<T> = std::result::Result<T, SourceError>;
