//! Error types for the Convore API client.
//!
//! # Design
//! `AuthenticationFailed` gets a dedicated variant because a 401 means the
//! credential pair is wrong no matter which resource was requested. All other
//! non-2xx responses land in `HttpError` with the raw status code, the
//! caller's context message and the body for debugging.
//!
//! Decoding failures are split by where they happen: a missing envelope key
//! is `MissingField`, a mapping that cannot become an entity is
//! `InvalidEntity`, and a body that is not JSON at all is
//! `DeserializationError`.

use thiserror::Error;

/// Errors returned by `ConvoreClient` and the resource collections.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 401; the credentials are missing or invalid.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The server returned a non-2xx status other than 401.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("API request failed"))]
    HttpError {
        status: u16,
        message: Option<String>,
        body: String,
    },

    /// A key the operation requires is absent from the response.
    #[error("response is missing `{0}`")]
    MissingField(String),

    /// A mapping could not be decoded into the named entity.
    #[error("invalid {entity}: {reason}")]
    InvalidEntity { entity: &'static str, reason: String },

    /// The response body is not the JSON shape the operation expects.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The HTTP round-trip itself failed (DNS, connect, read).
    #[error("transport error: {0}")]
    TransportError(String),

    /// A convenience method was called on an entity without an id.
    #[error("{0} has no id")]
    MissingId(&'static str),
}
