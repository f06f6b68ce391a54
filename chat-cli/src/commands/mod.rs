//! Command implementations.

pub mod delete;
pub mod forward;
pub mod history;
pub mod init;
pub mod recall;
pub mod send;

use uuid::Uuid;

/// Fabricate a server-side text message record for mock mode.
pub(crate) fn mock_record(conversation: &str, sender: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": Uuid::new_v4().to_string(),
        "conversationID": conversation,
        "senderID": sender,
        "text": text,
        "createdAt": now_timestamp(),
    })
}

/// Current unix time, as the string a fabricated record carries.
pub(crate) fn now_timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
        .to_string()
}
