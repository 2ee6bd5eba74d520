use thiserror::Error;

/// Failure to obtain a usable answer from the backend.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned status {status}: {body}")]
    Status { endpoint: &'static str, status: u16, body: String },

    #[error("failed to decode {endpoint} response: {message}")]
    Decode { endpoint: &'static str, message: String },

    #[error("login rejected for user '{0}'")]
    Auth(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location unavailable")]
    Unavailable,

    #[error("timed out waiting for a location fix")]
    Timeout,
}
