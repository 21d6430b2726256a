//! Codec error type.

use thiserror::Error;

/// Failure while moving a statement graph to or from its JSON wire form.
///
/// Decode failures abort the whole operation; no partial object is ever
/// returned.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The JSON text could not be decoded into the statement graph.
    #[error("statement decoding failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The statement graph could not be encoded as JSON.
    #[error("statement encoding failed: {0}")]
    Encode(#[source] serde_json::Error),
}
