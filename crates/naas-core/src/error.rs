use thiserror::Error;

/// Errors surfaced by the shared-state core (C1-C5, C9).
///
/// HTTP-facing variants map onto the taxonomy in the design document's
/// error-handling table; `naas-server` translates these into responses,
/// `naas-worker` translates them into job failure/retry decisions.
#[derive(Error, Debug)]
pub enum Error {
    #[error("KV store error: {0}")]
    Kv(String),

    #[error("no JSON body present")]
    NoJson,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("duplicate request id: {0}")]
    DuplicateRequestId(String),

    #[error("authentication required")]
    NoAuth,

    #[error("subject locked out: {0}")]
    LockedOut(String),

    #[error("job not found: {0}")]
    NotFound(String),

    #[error("job {0} is in a terminal state and cannot be cancelled")]
    Conflict(String),

    #[error("validation failed: {0}")]
    UnprocessableEntity(String),

    #[error("circuit open for device {0}")]
    CircuitOpen(String),

    #[error("authentication failure for device {device}: {message}")]
    AuthFailure { device: String, message: String },

    #[error("transport failure for device {device}: {message}")]
    Transport { device: String, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn kv(err: impl std::fmt::Display) -> Self {
        Error::Kv(err.to_string())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Error::BadRequest(msg.into())
    }

    pub fn locked_out(subject: impl Into<String>) -> Self {
        Error::LockedOut(subject.into())
    }

    pub fn not_found(job_id: impl Into<String>) -> Self {
        Error::NotFound(job_id.into())
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Error::UnprocessableEntity(msg.into())
    }

    pub fn auth_failure(device: impl Into<String>, message: impl Into<String>) -> Self {
        Error::AuthFailure {
            device: device.into(),
            message: message.into(),
        }
    }

    pub fn transport(device: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Transport {
            device: device.into(),
            message: message.into(),
        }
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::Kv(err.to_string())
    }
}
