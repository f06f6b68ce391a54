//! The message entity and the request/response bodies of the messages API.
//!
//! Field names follow the backend's wire format (`_id`, `conversationID`,
//! `senderID`, `imageLinks`, ...), so these types serialize directly into
//! request bodies and deserialize directly from responses.

use serde::{Deserialize, Serialize};

use crate::{ChatError, ConversationId, MessageId, UserId};

/// A single chat message as stored in the local view.
///
/// Always carries a server-assigned id: locally-drafted sends are only
/// materialized into a `Message` once the backend confirms them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Server-assigned unique identifier.
    #[serde(rename = "_id")]
    pub id: MessageId,

    /// The conversation this message belongs to.
    #[serde(rename = "conversationID")]
    pub conversation_id: ConversationId,

    /// The user who sent the message.
    #[serde(rename = "senderID")]
    pub sender_id: UserId,

    /// The message content; exactly one variant is populated on the wire.
    #[serde(flatten)]
    pub payload: MessagePayload,

    /// Server-assigned creation timestamp, stored verbatim.
    ///
    /// The view never parses this; ordering is positional (head-insert for
    /// new messages, tail-append for older pages).
    #[serde(rename = "createdAt")]
    pub created_at: String,

    /// Whether the message has been recalled. A recall replaces the record
    /// in place; it never removes it.
    #[serde(default)]
    pub recalled: bool,
}

impl Message {
    /// Serialize to JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, ChatError> {
        serde_json::to_vec(self).map_err(ChatError::Serialization)
    }

    /// Deserialize from JSON bytes.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, ChatError> {
        serde_json::from_slice(bytes).map_err(ChatError::Deserialization)
    }
}

/// The content of a message.
///
/// Serialized untagged and flattened into [`Message`], so the wire JSON
/// carries only the fields of the populated variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessagePayload {
    /// A plain text message.
    Text {
        /// The message text.
        text: String,
    },
    /// One or more uploaded images.
    Images {
        /// Links to the uploaded images.
        #[serde(rename = "imageLinks")]
        image_links: Vec<String>,
    },
    /// A single uploaded file.
    File {
        /// Link to the uploaded file.
        #[serde(rename = "fileLink")]
        file_link: String,
    },
}

/// Body of a history request.
///
/// `count` is the number of messages already loaded locally: 0 requests the
/// most recent page, a non-zero value requests the next older page offset by
/// that many messages. The page size itself is server-defined.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HistoryRequest {
    /// Offset into the conversation's history, newest first.
    pub count: u64,
}

/// A locally-drafted text message, sent as the body of `POST /messages`.
///
/// The server assigns `_id` and `createdAt` and echoes the full record back.
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingText {
    /// Target conversation.
    #[serde(rename = "conversationID")]
    pub conversation_id: ConversationId,

    /// The sending user.
    #[serde(rename = "senderID")]
    pub sender_id: UserId,

    /// The message text.
    pub text: String,
}

/// Body of a delete-for-me request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteForMeRequest {
    /// The user for whom the message is hidden.
    #[serde(rename = "userId")]
    pub user_id: UserId,
}

/// Response to a delete-for-me request.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteForMeResponse {
    /// The id of the message the server hid for the requesting user.
    pub id: MessageId,
}

/// Body of a forward/move request for one source message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardRequest {
    /// The conversation to re-materialize the message in.
    #[serde(rename = "conversationId")]
    pub conversation_id: ConversationId,

    /// The forwarding user.
    #[serde(rename = "userId")]
    pub user_id: UserId,
}

/// Response to a forward/move request.
///
/// A missing or null `newMessage` means the server refused the operation.
#[derive(Debug, Clone, Deserialize)]
pub struct ForwardResponse {
    /// The records created in the target conversation, if any.
    #[serde(rename = "newMessage", default)]
    pub new_message: Option<Vec<Message>>,
}

/// Result of a media upload that completed at the HTTP level.
///
/// The backend signals a size-limit rejection as a success response whose
/// body carries a null or absent `_id` instead of a full message record.
/// Parsing this shape explicitly keeps the rejection a first-class case
/// rather than an implicit null check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendReceipt {
    /// The server stored the message and assigned it an id.
    Accepted(Box<Message>),
    /// The server refused the attachment (size limit exceeded).
    Rejected,
}

impl SendReceipt {
    /// Parse a `POST /messages` upload response body.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, ChatError> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(ChatError::Deserialization)?;
        match value.get("_id") {
            Some(serde_json::Value::String(_)) => {
                let message: Message =
                    serde_json::from_value(value).map_err(ChatError::Deserialization)?;
                Ok(Self::Accepted(Box::new(message)))
            }
            _ => Ok(Self::Rejected),
        }
    }
}
