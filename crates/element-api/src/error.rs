use thiserror::Error;

/// Top-level error type for the `element-api` crate.
///
/// Covers every failure mode: transport, deserialization, pagination shape,
/// and identifier resolution. No variant is ever produced by an internal
/// retry -- every request is issued exactly once and its failure surfaces
/// here unchanged.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, timeout, non-2xx status).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A field the API contract requires is missing or has the wrong shape.
    #[error("required field `{path}` missing or malformed")]
    MissingField { path: &'static str },

    /// A raw payload frame could not be decoded (bad hex, truncated frame,
    /// unsupported protocol version).
    #[error("cannot decode payload: {reason}")]
    PayloadDecode { reason: String },

    // ── Pagination ──────────────────────────────────────────────────
    /// The response carried a continuation token but `body` is not an array.
    ///
    /// Indicates an API/route mismatch and is unrecoverable locally.
    #[error("cannot handle pagination when `body` is not an array")]
    ScalarPagination,

    // ── Query parameters ────────────────────────────────────────────
    /// `limit` outside the 1..=100 range the API accepts.
    #[error("limit must be between 1 and 100, got {limit}")]
    InvalidLimit { limit: u32 },

    // ── Identifier resolution ───────────────────────────────────────
    /// A probed device returned no readings, so its id cannot be discovered.
    #[error("device `{device}` returned no readings to probe")]
    NoReadings { device: String },

    /// Every device in the folder was probed without finding the id.
    ///
    /// Signals a genuinely absent id, not a transient condition.
    #[error("unable to find address for station: {decentlab_id} in folder `{folder}`")]
    UnknownDecentlabId { decentlab_id: u64, folder: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// The crate never retries on its own; callers own retry policy.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}
