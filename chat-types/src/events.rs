//! Realtime channel events.
//!
//! Event names mirror the backend's wire names: a confirmed local send is
//! published as `send_message` and comes back to every participant (the
//! sender included) under the same name.

use serde::{Deserialize, Serialize};

use crate::{ChatError, Message};

/// An event carried on the realtime channel, in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChannelEvent {
    /// A message was created, by this client or any other participant.
    SendMessage {
        /// The confirmed message record.
        message: Message,
    },
    /// A message was recalled; `message` is the updated record.
    RecallMessage {
        /// The recalled message record.
        message: Message,
    },
}

impl ChannelEvent {
    /// The message carried by the event, regardless of kind.
    pub fn message(&self) -> &Message {
        match self {
            Self::SendMessage { message } | Self::RecallMessage { message } => message,
        }
    }

    /// Serialize to JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, ChatError> {
        serde_json::to_vec(self).map_err(ChatError::Serialization)
    }

    /// Deserialize from JSON bytes.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, ChatError> {
        serde_json::from_slice(bytes).map_err(ChatError::Deserialization)
    }
}
