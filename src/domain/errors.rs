use thiserror::Error;

// Domain-level errors for auth workflows.
//
// The init-data kinds are all reported to clients as a single
// "authentication failed" outcome; the variant is for logs only.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("init data is malformed")]
    MalformedPayload,
    #[error("init data has no signature")]
    MissingSignature,
    #[error("init data signature mismatch")]
    SignatureMismatch,
    #[error("init data is stale")]
    StalePayload,
    #[error("init data has no user id")]
    MissingUserId,
    #[error("invalid session token")]
    InvalidToken,
    #[error("session expired")]
    SessionExpired,
    #[error("storage failure")]
    StorageFailure,
}

// Failure to turn a `Range` header into a servable byte range.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    #[error("range header is malformed")]
    Malformed,
    #[error("range is not satisfiable")]
    Unsatisfiable,
}

// Errors surfaced by the audio streaming use case.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("audio file not found")]
    NotFound,
    #[error("malformed range header for file of {file_size} bytes")]
    MalformedRange { file_size: u64 },
    #[error("range not satisfiable for file of {file_size} bytes")]
    UnsatisfiableRange { file_size: u64 },
    #[error("audio file i/o: {0}")]
    Io(#[from] std::io::Error),
}
