//! Publish path: classify, stamp and store inbound messages.
//!
//! Render messages are fully validated before they replace the stored
//! message. Any other well-formed message with a `command` string is relayed
//! verbatim so viewers drop back to their waiting state. The stored text is
//! the publisher's original bytes; nothing is re-serialized.

use std::sync::Arc;

use tracing::debug;
use wire::{Message, WireError};

use crate::config::RelayConfig;
use crate::state::{AppState, Published};

/// Sent to viewers that ask for data before anything was published.
pub const IDLE_MESSAGE: &str = r#"{"command":"idle"}"#;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("publish token missing or wrong")]
    Unauthorized,
    #[error(transparent)]
    Invalid(#[from] WireError),
}

/// Check a publisher's token against the configured one.
///
/// # Errors
///
/// Returns [`PublishError::Unauthorized`] when a token is configured and
/// `token` does not match it.
pub fn authorize(config: &RelayConfig, token: Option<&str>) -> Result<(), PublishError> {
    match config.publish_token.as_deref() {
        None => Ok(()),
        Some(expected) if token == Some(expected) => Ok(()),
        Some(_) => Err(PublishError::Unauthorized),
    }
}

/// Validate `raw` and make it the newest message.
///
/// # Errors
///
/// Returns [`PublishError::Invalid`] when `raw` is not a well-formed message
/// or is a render message that fails validation.
pub fn publish(state: &AppState, raw: &str) -> Result<Arc<Published>, PublishError> {
    let command = match wire::classify(raw)? {
        Message::Render(snapshot) => snapshot.command,
        Message::Other(command) => command,
    };
    let published = state.store(command, raw.to_owned());
    debug!(seq = published.seq, command = %published.command, "relay: published");
    Ok(published)
}

/// The newest message text, or [`IDLE_MESSAGE`] before the first publish.
#[must_use]
pub fn latest_or_idle(state: &AppState) -> String {
    state.latest().map_or_else(|| IDLE_MESSAGE.to_owned(), |p| p.raw.clone())
}

/// Error reply sent back to a publisher.
#[must_use]
pub fn error_message(message: &str) -> String {
    serde_json::json!({ "command": "error", "message": message }).to_string()
}

#[cfg(test)]
#[path = "relay_test.rs"]
mod tests;
