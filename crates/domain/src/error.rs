/// Shared error type used across all Lumina crates.
///
/// The four classified families mirror the pipeline stages: transport
/// failure before any response (`Network`), a response that is semantically
/// unusable (`Upstream`), a usable response whose generated payload is
/// malformed (`Extraction`), and well-formed JSON that violates a required
/// domain shape (`Validation`). Every stage fails fast; nothing downgrades
/// one family into another.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("network: {0}")]
    Network(String),

    #[error("upstream {kind:?}: {message}")]
    Upstream {
        kind: UpstreamKind,
        message: String,
        /// HTTP status of the relay response, when one was received.
        status: Option<u16>,
        /// Upstream `Retry-After` value in seconds, when forwarded.
        retry_after_secs: Option<u64>,
    },

    #[error("extraction {kind:?}: {message}")]
    Extraction { kind: ExtractionKind, message: String },

    #[error("validation {kind:?}: {message}")]
    Validation { kind: ValidationKind, message: String },

    #[error("audio: {0}")]
    Audio(String),

    #[error("config: {0}")]
    Config(String),

    #[error("auth: {0}")]
    Auth(String),
}

/// Why a received response could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamKind {
    /// The relay returned a success status with an empty body.
    EmptyBody,
    /// Non-2xx status after retries were exhausted.
    HttpError,
    /// The body parsed but carried an `error` field.
    ApiError,
}

/// Why the generated payload could not be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionKind {
    /// No candidate, or the first candidate carried no text.
    NoCandidate,
    /// The generated text held no parseable JSON object.
    InvalidJson,
}

/// Why extracted JSON failed domain validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// `quiz` was missing, not an array, or empty.
    InvalidQuizShape,
    /// `questions` was missing or not an array.
    InvalidQuestionShape,
}

impl Error {
    /// Shorthand for an [`Error::Upstream`] without status metadata.
    pub fn upstream(kind: UpstreamKind, message: impl Into<String>) -> Self {
        Error::Upstream {
            kind,
            message: message.into(),
            status: None,
            retry_after_secs: None,
        }
    }

    /// Shorthand for an [`Error::Extraction`].
    pub fn extraction(kind: ExtractionKind, message: impl Into<String>) -> Self {
        Error::Extraction { kind, message: message.into() }
    }

    /// Shorthand for an [`Error::Validation`].
    pub fn validation(kind: ValidationKind, message: impl Into<String>) -> Self {
        Error::Validation { kind, message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
