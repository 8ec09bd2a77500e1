//! Error types shared by the content client, controllers and renderers

use thiserror::Error;

/// Errors produced while fetching or rendering blog content
#[derive(Error, Debug)]
pub enum BlogError {
    #[error("No {document_type} document with uid {uid:?}")]
    NotFound { document_type: String, uid: String },

    #[error("Cannot format date: {0}")]
    Format(String),

    #[error("Failed to fetch next page: {0}")]
    TransientFetch(String),

    #[error("Content API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BlogError {
    pub fn not_found(document_type: &str, uid: &str) -> Self {
        Self::NotFound {
            document_type: document_type.to_string(),
            uid: uid.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;
