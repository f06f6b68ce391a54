//! Recall, delete-for-me and forward operations on existing messages.

use std::sync::Arc;

use chat_types::{
    ChannelEvent, ChatError, ConversationId, DeleteForMeRequest, DeleteForMeResponse,
    ForwardRequest, ForwardResponse, Message, MessageId, UserId,
};

use crate::error::ClientError;
use crate::realtime::RealtimeChannel;
use crate::transport::Transport;

/// Moderation operations: recall, local delete, forward/move.
pub struct ModerationOps<T: Transport, C: RealtimeChannel> {
    transport: Arc<T>,
    channel: Arc<C>,
}

impl<T: Transport, C: RealtimeChannel> ModerationOps<T, C> {
    /// Create the operations over the given transport and channel.
    pub fn new(transport: Arc<T>, channel: Arc<C>) -> Self {
        Self { transport, channel }
    }

    /// Recall a message for every participant.
    ///
    /// On success the updated record is published as `recall_message` and
    /// returned for the caller to swap into the view in place.
    pub async fn recall(&self, id: &MessageId) -> Result<Message, ClientError> {
        let path = format!("/messages/recall/{id}");
        let bytes = self.transport.get(&path).await?;
        let message = Message::from_json_bytes(&bytes)?;

        self.channel
            .publish(ChannelEvent::RecallMessage {
                message: message.clone(),
            })
            .await;
        Ok(message)
    }

    /// Hide a message for the requesting user only.
    ///
    /// Returns the id the server confirmed as hidden, for a local-only
    /// removal. Never broadcast: other participants keep their copies.
    pub async fn delete_for_me(
        &self,
        message_id: &MessageId,
        user_id: &UserId,
    ) -> Result<MessageId, ClientError> {
        let path = format!("/messages/delete-for-you/{message_id}");
        let body = serde_json::to_value(DeleteForMeRequest {
            user_id: user_id.clone(),
        })
        .map_err(ChatError::Serialization)?;

        let bytes = self.transport.delete_json(&path, &body).await?;
        let response: DeleteForMeResponse =
            serde_json::from_slice(&bytes).map_err(ChatError::Deserialization)?;
        Ok(response.id)
    }

    /// Re-materialize the given messages in another conversation.
    ///
    /// The backend moves one message per request, so the selection is
    /// iterated; every record the server created is then published as
    /// `send_message` (the records belong to the target conversation, so
    /// nothing is inserted into the current view). If the loop yields no
    /// records at all the operation fails with
    /// [`ClientError::ForwardFailed`] and nothing is published.
    pub async fn forward(
        &self,
        messages: &[Message],
        target_conversation_id: &ConversationId,
        user_id: &UserId,
    ) -> Result<Vec<Message>, ClientError> {
        let body = serde_json::to_value(ForwardRequest {
            conversation_id: target_conversation_id.clone(),
            user_id: user_id.clone(),
        })
        .map_err(ChatError::Serialization)?;

        let mut created = Vec::new();
        for message in messages {
            let path = format!("/messages/move-message/{}", message.id);
            match self.transport.post_json(&path, &body).await {
                Ok(bytes) => {
                    let response: ForwardResponse =
                        serde_json::from_slice(&bytes).map_err(ChatError::Deserialization)?;
                    match response.new_message {
                        Some(records) => created.extend(records),
                        None => {
                            tracing::warn!("forward of {} was refused by the server", message.id);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("forward of {} failed: {e}", message.id);
                }
            }
        }

        if created.is_empty() {
            return Err(ClientError::ForwardFailed);
        }
        for record in &created {
            self.channel
                .publish(ChannelEvent::SendMessage {
                    message: record.clone(),
                })
                .await;
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::MockChannel;
    use crate::transport::MockTransport;
    use chat_types::MessagePayload;

    fn ops() -> (
        Arc<MockTransport>,
        Arc<MockChannel>,
        ModerationOps<MockTransport, MockChannel>,
    ) {
        let transport = Arc::new(MockTransport::new());
        let channel = Arc::new(MockChannel::new());
        let ops = ModerationOps::new(Arc::clone(&transport), Arc::clone(&channel));
        (transport, channel, ops)
    }

    fn message(id: &str, conversation: &str) -> Message {
        Message {
            id: MessageId::new(id),
            conversation_id: ConversationId::new(conversation),
            sender_id: UserId::new("u1"),
            payload: MessagePayload::Text { text: "hi".into() },
            created_at: "2024-05-02T09:14:00.000Z".into(),
            recalled: false,
        }
    }

    fn wire(message: &Message) -> serde_json::Value {
        serde_json::to_value(message).unwrap()
    }

    #[tokio::test]
    async fn recall_publishes_updated_record() {
        let (transport, channel, ops) = ops();
        let mut recalled = message("m5", "c1");
        recalled.recalled = true;
        transport.queue_json(wire(&recalled));

        let updated = ops.recall(&MessageId::new("m5")).await.unwrap();

        assert!(updated.recalled);
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/messages/recall/m5");
        assert!(matches!(
            channel.published().as_slice(),
            [ChannelEvent::RecallMessage { message }] if message.recalled
        ));
    }

    #[tokio::test]
    async fn delete_for_me_never_broadcasts() {
        let (transport, channel, ops) = ops();
        transport.queue_json(serde_json::json!({ "id": "m3" }));

        let deleted = ops
            .delete_for_me(&MessageId::new("m3"), &UserId::new("u1"))
            .await
            .unwrap();

        assert_eq!(deleted, MessageId::new("m3"));
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, "DELETE");
        assert_eq!(request.path, "/messages/delete-for-you/m3");
        assert_eq!(request.body, Some(serde_json::json!({ "userId": "u1" })));
        assert!(channel.published().is_empty());
    }

    #[tokio::test]
    async fn forward_publishes_every_new_record() {
        let (transport, channel, ops) = ops();
        transport.queue_json(serde_json::json!({ "newMessage": [wire(&message("n1", "c2"))] }));
        transport.queue_json(serde_json::json!({ "newMessage": [wire(&message("n2", "c2"))] }));

        let sources = [message("m1", "c1"), message("m2", "c1")];
        let created = ops
            .forward(&sources, &ConversationId::new("c2"), &UserId::new("u1"))
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        let requests = transport.requests();
        assert_eq!(requests[0].path, "/messages/move-message/m1");
        assert_eq!(requests[1].path, "/messages/move-message/m2");
        assert_eq!(
            requests[0].body,
            Some(serde_json::json!({ "conversationId": "c2", "userId": "u1" }))
        );
        assert_eq!(channel.published().len(), 2);
    }

    #[tokio::test]
    async fn forward_with_no_records_fails_and_publishes_nothing() {
        let (transport, channel, ops) = ops();
        transport.queue_json(serde_json::json!({}));

        let sources = [message("m1", "c1")];
        let result = ops
            .forward(&sources, &ConversationId::new("c2"), &UserId::new("u1"))
            .await;

        assert!(matches!(result, Err(ClientError::ForwardFailed)));
        assert!(channel.published().is_empty());
    }
}
