//! Outbound message creation.
//!
//! All three entry points share a confirm-then-publish contract: nothing is
//! published (and nothing enters the view) until the server has confirmed
//! the send and assigned the record an id.

use std::sync::Arc;

use chat_types::{
    ChannelEvent, ChatError, ConversationId, Message, OutgoingText, SendReceipt, UserId,
};

use crate::error::ClientError;
use crate::realtime::RealtimeChannel;
use crate::transport::{Attachment, Transport, UploadForm};

/// Creates messages on the backend and broadcasts confirmed records.
///
/// On a confirmed send the coordinator publishes the record as
/// `send_message` and returns it; the caller is responsible for merging it
/// into the view. Both steps must happen for every confirmed send - their
/// relative order does not matter, the merge point dedups the echo.
pub struct SendCoordinator<T: Transport, C: RealtimeChannel> {
    transport: Arc<T>,
    channel: Arc<C>,
}

impl<T: Transport, C: RealtimeChannel> SendCoordinator<T, C> {
    /// Create a coordinator over the given transport and channel.
    pub fn new(transport: Arc<T>, channel: Arc<C>) -> Self {
        Self { transport, channel }
    }

    /// Send a text message. Returns the server-assigned record.
    pub async fn send_text(&self, draft: OutgoingText) -> Result<Message, ClientError> {
        let body = serde_json::to_value(&draft).map_err(ChatError::Serialization)?;
        let bytes = self.transport.post_json("/messages", &body).await?;
        let message = Message::from_json_bytes(&bytes)?;

        self.channel
            .publish(ChannelEvent::SendMessage {
                message: message.clone(),
            })
            .await;
        Ok(message)
    }

    /// Upload one or more images as a single message.
    ///
    /// Two failure shapes are kept distinct: a transport/validation failure
    /// surfaces as [`ClientError::MediaRejected`], while a success response
    /// carrying a null record surfaces as [`ClientError::MediaTooLarge`].
    /// Neither publishes anything.
    pub async fn send_images(
        &self,
        images: Vec<Attachment>,
        sender_id: &UserId,
        conversation_id: &ConversationId,
    ) -> Result<Message, ClientError> {
        let mut form = UploadForm::new()
            .text("senderID", sender_id.as_str())
            .text("conversationID", conversation_id.as_str());
        for image in images {
            form = form.part("imageLinks", image);
        }
        self.upload(form, ClientError::MediaTooLarge).await
    }

    /// Upload a single file as a message. Same contract as
    /// [`Self::send_images`], with the null record surfacing as
    /// [`ClientError::FileTooLarge`].
    pub async fn send_file(
        &self,
        file: Attachment,
        sender_id: &UserId,
        conversation_id: &ConversationId,
    ) -> Result<Message, ClientError> {
        let form = UploadForm::new()
            .text("senderID", sender_id.as_str())
            .text("conversationID", conversation_id.as_str())
            .part("fileLink", file);
        self.upload(form, ClientError::FileTooLarge).await
    }

    async fn upload(
        &self,
        form: UploadForm,
        too_large: ClientError,
    ) -> Result<Message, ClientError> {
        let bytes = match self.transport.post_form("/messages", form).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("media upload failed: {e}");
                return Err(ClientError::MediaRejected(e));
            }
        };

        match SendReceipt::from_json_bytes(&bytes)? {
            SendReceipt::Accepted(message) => {
                self.channel
                    .publish(ChannelEvent::SendMessage {
                        message: (*message).clone(),
                    })
                    .await;
                Ok(*message)
            }
            SendReceipt::Rejected => Err(too_large),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::MockChannel;
    use crate::transport::MockTransport;
    use chat_types::MessageId;

    fn coordinator() -> (
        Arc<MockTransport>,
        Arc<MockChannel>,
        SendCoordinator<MockTransport, MockChannel>,
    ) {
        let transport = Arc::new(MockTransport::new());
        let channel = Arc::new(MockChannel::new());
        let coordinator = SendCoordinator::new(Arc::clone(&transport), Arc::clone(&channel));
        (transport, channel, coordinator)
    }

    fn confirmed(id: &str) -> serde_json::Value {
        serde_json::json!({
            "_id": id,
            "conversationID": "c1",
            "senderID": "u1",
            "text": "hi",
            "createdAt": "2024-05-02T09:14:00.000Z",
        })
    }

    #[tokio::test]
    async fn text_send_confirms_and_publishes() {
        let (transport, channel, coordinator) = coordinator();
        transport.queue_json(confirmed("m21"));

        let draft = OutgoingText {
            conversation_id: ConversationId::new("c1"),
            sender_id: UserId::new("u1"),
            text: "hi".into(),
        };
        let message = coordinator.send_text(draft).await.unwrap();

        assert_eq!(message.id, MessageId::new("m21"));
        assert_eq!(transport.last_request().unwrap().path, "/messages");

        let published = channel.published();
        assert_eq!(published.len(), 1);
        assert!(matches!(
            &published[0],
            ChannelEvent::SendMessage { message } if message.id == MessageId::new("m21")
        ));
    }

    #[tokio::test]
    async fn image_upload_builds_multipart_form() {
        let (transport, _, coordinator) = coordinator();
        transport.queue_json(serde_json::json!({
            "_id": "m22",
            "conversationID": "c1",
            "senderID": "u1",
            "imageLinks": ["https://cdn.example/a.jpg"],
            "createdAt": "2024-05-02T09:15:00.000Z",
        }));

        coordinator
            .send_images(
                vec![
                    Attachment::new("a.jpg", vec![1]),
                    Attachment::new("b.jpg", vec![2]),
                ],
                &UserId::new("u1"),
                &ConversationId::new("c1"),
            )
            .await
            .unwrap();

        let form = transport.last_request().unwrap().form.unwrap();
        assert_eq!(
            form.fields(),
            &[
                ("senderID".to_string(), "u1".to_string()),
                ("conversationID".to_string(), "c1".to_string()),
            ]
        );
        assert_eq!(form.parts().len(), 2);
        assert!(form.parts().iter().all(|(field, _)| field == "imageLinks"));
    }

    #[tokio::test]
    async fn null_record_is_media_too_large() {
        let (transport, channel, coordinator) = coordinator();
        transport.queue_json(serde_json::json!({ "_id": null }));

        let result = coordinator
            .send_images(
                vec![Attachment::new("big.jpg", vec![0; 16])],
                &UserId::new("u1"),
                &ConversationId::new("c1"),
            )
            .await;

        assert!(matches!(result, Err(ClientError::MediaTooLarge)));
        assert!(channel.published().is_empty(), "rejection never publishes");
    }

    #[tokio::test]
    async fn null_record_for_file_is_file_too_large() {
        let (transport, _, coordinator) = coordinator();
        transport.queue_json(serde_json::json!({ "_id": null }));

        let result = coordinator
            .send_file(
                Attachment::new("big.bin", vec![0; 16]),
                &UserId::new("u1"),
                &ConversationId::new("c1"),
            )
            .await;

        assert!(matches!(result, Err(ClientError::FileTooLarge)));
    }

    #[tokio::test]
    async fn transport_failure_is_media_rejected() {
        let (transport, channel, coordinator) = coordinator();
        transport.fail_next_request("payload too large");

        let result = coordinator
            .send_images(
                vec![Attachment::new("a.jpg", vec![1])],
                &UserId::new("u1"),
                &ConversationId::new("c1"),
            )
            .await;

        assert!(matches!(result, Err(ClientError::MediaRejected(_))));
        assert!(channel.published().is_empty());
    }
}
