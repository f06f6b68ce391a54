//! Client errors.
//!
//! The taxonomy keeps the backend's "success response with a null record"
//! media rejection distinct from transport failures, so callers can raise
//! the right user-facing notification for each.

use chat_types::ChatError;
use thiserror::Error;

use crate::transport::TransportError;

/// Errors produced by the client components.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport error (network, status, body read).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Wire format error (JSON encode/decode, response shape).
    #[error("wire format error: {0}")]
    Wire(#[from] ChatError),

    /// A media upload failed at the transport or validation level.
    #[error("media rejected, request failed: {0}")]
    MediaRejected(#[source] TransportError),

    /// The server accepted the request but refused the media (size limit).
    #[error("media exceeds size limit")]
    MediaTooLarge,

    /// The server accepted the request but refused the file (size limit).
    #[error("file exceeds size limit")]
    FileTooLarge,

    /// A forward/move operation produced no new records.
    #[error("forward failed: no messages were created")]
    ForwardFailed,
}
