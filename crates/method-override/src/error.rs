use thiserror::Error;

/// Errors raised while loading [`Options`](crate::config::Options) from text.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid json options: {source}")]
    InvalidJson {
        #[from]
        source: serde_json::Error,
    },
}

/// Errors raised by the upstream body parsing helpers of [`ParsedBody`](crate::body::ParsedBody).
#[derive(Error, Debug)]
pub enum BodyError {
    #[error("unsupported content type: {content_type}")]
    UnsupportedContentType { content_type: String },

    #[error("invalid form body: {reason}")]
    InvalidForm { reason: String },

    #[error("invalid json body: {reason}")]
    InvalidJson { reason: String },

    #[error("json body is not an object")]
    NotAnObject,
}

impl BodyError {
    pub fn unsupported_content_type<S: ToString>(str: S) -> Self {
        Self::UnsupportedContentType { content_type: str.to_string() }
    }

    pub fn invalid_form<S: ToString>(str: S) -> Self {
        Self::InvalidForm { reason: str.to_string() }
    }

    pub fn invalid_json<S: ToString>(str: S) -> Self {
        Self::InvalidJson { reason: str.to_string() }
    }
}
