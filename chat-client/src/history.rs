//! Paginated history fetching.

use std::sync::Arc;

use chat_core::HistoryBatch;
use chat_types::{ChatError, ConversationId, HistoryRequest, Message};

use crate::error::ClientError;
use crate::transport::Transport;

/// Fetches the initial and subsequent pages of a conversation's history.
///
/// Pagination is offset-based: the request carries the number of messages
/// already loaded and the server returns the next older page (server-defined
/// page size, possibly empty). Concurrent calls for the same conversation
/// are not deduplicated; each produces an independent request.
pub struct HistoryLoader<T: Transport> {
    transport: Arc<T>,
}

impl<T: Transport> HistoryLoader<T> {
    /// Create a loader over the given transport.
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Fetch the most recent page for the conversation.
    ///
    /// The result feeds [`chat_core::ConversationView::replace_all`].
    pub async fn fetch_initial(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<HistoryBatch, ClientError> {
        self.fetch(conversation_id, 0).await
    }

    /// Fetch the next older page, offset by the number of messages already
    /// loaded. An empty batch means there is no more history.
    ///
    /// The result feeds [`chat_core::ConversationView::append_older`].
    pub async fn fetch_next(
        &self,
        conversation_id: &ConversationId,
        already_loaded: usize,
    ) -> Result<HistoryBatch, ClientError> {
        self.fetch(conversation_id, already_loaded as u64).await
    }

    async fn fetch(
        &self,
        conversation_id: &ConversationId,
        count: u64,
    ) -> Result<HistoryBatch, ClientError> {
        let path = format!("/messages/ten-last-messages/{conversation_id}");
        let body =
            serde_json::to_value(HistoryRequest { count }).map_err(ChatError::Serialization)?;

        let bytes = match self.transport.post_json(&path, &body).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("history fetch for {conversation_id} failed: {e}");
                return Err(e.into());
            }
        };

        let messages: Vec<Message> =
            serde_json::from_slice(&bytes).map_err(ChatError::Deserialization)?;
        Ok(HistoryBatch {
            conversation_id: conversation_id.clone(),
            messages,
        })
    }
}
