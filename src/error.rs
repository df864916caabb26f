//! Error type shared across the transport, store, and REST collaborator.

use serde_json::Value;

/// Concord client `Result` alias.
pub type Result<T> = ::std::result::Result<T, Error>;

/// Errors the Client State Engine can surface.
///
/// Per §7, none of these ever leave a reducer mid-mutation: they are
/// produced at the edges (transport, REST, storage) and either logged and
/// swallowed, or returned from an explicit fallible call such as
/// [`crate::optimistic::send_message`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying WebSocket connection failed or closed unexpectedly.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A frame could not be parsed as JSON, or a JSON value didn't match
    /// the shape an `Event`/`Command` expected.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A local I/O operation (mainly server-folder persistence) failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A REST collaborator call failed at the transport level.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server closed the socket with a close code and optional reason.
    #[error("connection closed: {0:?} {1}")]
    Closed(Option<u16>, String),

    /// A frame decoded as valid JSON but not the schema this discriminator
    /// was supposed to carry.
    #[error("could not decode {0} from {1}")]
    Decode(&'static str, Value),

    /// A REST endpoint answered with a non-success status.
    #[error("http status {0}: {1:?}")]
    Status(reqwest::StatusCode, Option<Value>),

    /// A precondition for a local call was not met (e.g. `sendMessage`
    /// while disconnected). The caller already knows which precondition it
    /// violated, so no extra payload is carried.
    #[error("precondition failed: {0}")]
    Precondition(&'static str),

    /// Something unexpected happened during the gateway handshake.
    #[error("protocol error: {0}")]
    Protocol(&'static str),
}

impl Error {
    #[doc(hidden)]
    pub async fn from_response(response: reqwest::Response) -> Error {
        let status = response.status();
        let value = response
            .bytes()
            .await
            .ok()
            .and_then(|b| serde_json::from_slice(&b).ok());
        Error::Status(status, value)
    }
}

/// Extension trait for turning a failed HTTP response into an [`Error`].
pub(crate) trait CheckStatus {
    async fn check_status(self) -> Result<reqwest::Response>;
}

impl CheckStatus for reqwest::Result<reqwest::Response> {
    async fn check_status(self) -> Result<reqwest::Response> {
        let response = self?;
        if !response.status().is_success() {
            return Err(Error::from_response(response).await);
        }
        Ok(response)
    }
}
