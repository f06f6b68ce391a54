//! The conversation session: one screen's view plus the components that
//! feed it.
//!
//! The session owns the [`ConversationView`] for the duration of one
//! conversation screen - there is no process-wide store. Every mutation of
//! the view goes through here, so the ordering rules of the engine are
//! visible in one place: loading flags flip before the network call, results
//! apply in completion order, and inbound channel events funnel through
//! [`ConversationSession::apply_event`].

use std::sync::Arc;

use chat_core::{ConversationView, MergeOutcome};
use chat_types::{ChannelEvent, ConversationId, Message, MessageId, OutgoingText, UserId};

use crate::error::ClientError;
use crate::history::HistoryLoader;
use crate::moderation::ModerationOps;
use crate::realtime::RealtimeChannel;
use crate::send::SendCoordinator;
use crate::transport::{Attachment, Transport};

/// The owning context for one conversation screen session.
pub struct ConversationSession<T: Transport, C: RealtimeChannel> {
    view: ConversationView,
    history: HistoryLoader<T>,
    sender: SendCoordinator<T, C>,
    moderation: ModerationOps<T, C>,
}

impl<T: Transport, C: RealtimeChannel> ConversationSession<T, C> {
    /// Create a session for the given conversation.
    pub fn new(conversation_id: ConversationId, transport: Arc<T>, channel: Arc<C>) -> Self {
        Self {
            history: HistoryLoader::new(Arc::clone(&transport)),
            sender: SendCoordinator::new(Arc::clone(&transport), Arc::clone(&channel)),
            moderation: ModerationOps::new(transport, channel),
            view: ConversationView::new(conversation_id),
        }
    }

    /// Read access to the view, for rendering.
    pub fn view(&self) -> &ConversationView {
        &self.view
    }

    /// Fetch the most recent history page and replace the view with it.
    ///
    /// On transport failure the history flag stays `Loading` - an accepted
    /// limitation; a new explicit call is required to recover.
    pub async fn load_initial(&mut self) -> Result<(), ClientError> {
        self.view.begin_history_load();
        let batch = self
            .history
            .fetch_initial(self.view.conversation_id())
            .await?;
        self.view.replace_all(batch);
        Ok(())
    }

    /// Fetch the next older page and append it. Returns the number of
    /// messages appended; 0 means there is no more history.
    pub async fn load_older(&mut self) -> Result<usize, ClientError> {
        self.view.begin_pagination_load();
        let batch = self
            .history
            .fetch_next(self.view.conversation_id(), self.view.len())
            .await?;
        let appended = batch.messages.len();
        self.view.append_older(batch);
        Ok(appended)
    }

    /// Send a text message; on confirmation the record enters the view at
    /// the head and is broadcast on the channel.
    pub async fn send_text(
        &mut self,
        sender_id: UserId,
        text: String,
    ) -> Result<MessageId, ClientError> {
        let draft = OutgoingText {
            conversation_id: self.view.conversation_id().clone(),
            sender_id,
            text,
        };
        let message = self.sender.send_text(draft).await?;
        Ok(self.merge_confirmed(message))
    }

    /// Upload images as a single message. A size-limit rejection leaves the
    /// view untouched and surfaces as [`ClientError::MediaTooLarge`].
    pub async fn send_images(
        &mut self,
        images: Vec<Attachment>,
        sender_id: &UserId,
    ) -> Result<MessageId, ClientError> {
        let conversation_id = self.view.conversation_id().clone();
        let message = self
            .sender
            .send_images(images, sender_id, &conversation_id)
            .await?;
        Ok(self.merge_confirmed(message))
    }

    /// Upload a file as a message. Same contract as [`Self::send_images`],
    /// surfacing the size-limit rejection as [`ClientError::FileTooLarge`].
    pub async fn send_file(
        &mut self,
        file: Attachment,
        sender_id: &UserId,
    ) -> Result<MessageId, ClientError> {
        let conversation_id = self.view.conversation_id().clone();
        let message = self.sender.send_file(file, sender_id, &conversation_id).await?;
        Ok(self.merge_confirmed(message))
    }

    /// Recall a message; the updated record replaces the original in place.
    pub async fn recall(&mut self, id: &MessageId) -> Result<(), ClientError> {
        let updated = self.moderation.recall(id).await?;
        if !self.view.update_by_id(id, updated) {
            tracing::debug!("recall confirmed for {id}, which is not in the view");
        }
        Ok(())
    }

    /// Hide a message from this user's view only.
    pub async fn delete_for_me(
        &mut self,
        id: &MessageId,
        user_id: &UserId,
    ) -> Result<(), ClientError> {
        let deleted = self.moderation.delete_for_me(id, user_id).await?;
        self.view.remove_by_id(&deleted);
        Ok(())
    }

    /// Forward messages into another conversation. The created records are
    /// returned for the calling collaborator (navigation); the current view
    /// is never touched - the records belong to the target conversation.
    pub async fn forward(
        &self,
        messages: &[Message],
        target_conversation_id: &ConversationId,
        user_id: &UserId,
    ) -> Result<Vec<Message>, ClientError> {
        self.moderation
            .forward(messages, target_conversation_id, user_id)
            .await
    }

    /// Apply an inbound channel event.
    ///
    /// This is the pump target: the caller subscribes on the channel and
    /// feeds every received event here. Self-echoes of local sends land as
    /// duplicates and are dropped by the merge point.
    pub fn apply_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::SendMessage { message } => match self.view.merge_incoming(message) {
                MergeOutcome::Inserted => {}
                MergeOutcome::Duplicate => {
                    tracing::debug!("dropped duplicate message from channel");
                }
                MergeOutcome::OtherConversation => {
                    tracing::debug!("dropped channel message for another conversation");
                }
            },
            ChannelEvent::RecallMessage { message } => {
                let id = message.id.clone();
                if !self.view.update_by_id(&id, message) {
                    tracing::debug!("dropped recall for {id}, which is not in the view");
                }
            }
        }
    }

    fn merge_confirmed(&mut self, message: Message) -> MessageId {
        let id = message.id.clone();
        self.view.merge_incoming(message);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::MockChannel;
    use crate::transport::MockTransport;
    use chat_core::LoadState;
    use chat_types::MessagePayload;

    fn session() -> (
        Arc<MockTransport>,
        Arc<MockChannel>,
        ConversationSession<MockTransport, MockChannel>,
    ) {
        let transport = Arc::new(MockTransport::new());
        let channel = Arc::new(MockChannel::new());
        let session = ConversationSession::new(
            ConversationId::new("C1"),
            Arc::clone(&transport),
            Arc::clone(&channel),
        );
        (transport, channel, session)
    }

    fn record(id: &str, conversation: &str) -> Message {
        Message {
            id: MessageId::new(id),
            conversation_id: ConversationId::new(conversation),
            sender_id: UserId::new("u1"),
            payload: MessagePayload::Text {
                text: format!("text of {id}"),
            },
            created_at: "2024-05-02T09:14:00.000Z".into(),
            recalled: false,
        }
    }

    fn wire_page(conversation: &str, ids: &[&str]) -> serde_json::Value {
        let records: Vec<_> = ids
            .iter()
            .map(|id| serde_json::to_value(record(id, conversation)).unwrap())
            .collect();
        serde_json::Value::Array(records)
    }

    fn view_ids(session: &ConversationSession<MockTransport, MockChannel>) -> Vec<String> {
        session
            .view()
            .messages()
            .iter()
            .map(|m| m.id.to_string())
            .collect()
    }

    // Scenario A: the initial fetch returns ten messages, newest first.
    #[tokio::test]
    async fn initial_load_replaces_the_view() {
        let (transport, _, mut session) = session();
        let ids: Vec<String> = (1..=10).map(|n| format!("m{n}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        transport.queue_json(wire_page("C1", &id_refs));

        session.load_initial().await.unwrap();

        assert_eq!(view_ids(&session), ids);
        assert_eq!(session.view().history_state(), LoadState::Ready);
    }

    // Scenario B: the next page appends after the current tail.
    #[tokio::test]
    async fn pagination_appends_older_page() {
        let (transport, _, mut session) = session();
        transport.queue_json(wire_page("C1", &["m1", "m2"]));
        transport.queue_json(wire_page("C1", &["m3", "m4"]));

        session.load_initial().await.unwrap();
        let appended = session.load_older().await.unwrap();

        assert_eq!(appended, 2);
        assert_eq!(view_ids(&session), vec!["m1", "m2", "m3", "m4"]);
        assert_eq!(
            transport.last_request().unwrap().body,
            Some(serde_json::json!({ "count": 2 })),
            "pagination offset is the number of messages already loaded"
        );
    }

    #[tokio::test]
    async fn empty_page_signals_no_more_history() {
        let (transport, _, mut session) = session();
        transport.queue_json(wire_page("C1", &["m1"]));
        transport.queue_json(serde_json::json!([]));

        session.load_initial().await.unwrap();
        let appended = session.load_older().await.unwrap();

        assert_eq!(appended, 0);
        assert_eq!(session.view().pagination_state(), LoadState::Ready);
    }

    // Scenario C: a confirmed send enters at the head, is broadcast, and
    // its later self-echo over the channel is dropped by the merge point.
    #[tokio::test]
    async fn confirmed_send_then_self_echo_is_deduplicated() {
        let (transport, channel, mut session) = session();
        transport.queue_json(wire_page("C1", &["m20"]));
        session.load_initial().await.unwrap();

        transport.queue_json(serde_json::to_value(record("m21", "C1")).unwrap());
        let id = session
            .send_text(UserId::new("u1"), "hi".into())
            .await
            .unwrap();

        assert_eq!(id, MessageId::new("m21"));
        assert_eq!(view_ids(&session), vec!["m21", "m20"]);
        assert!(matches!(
            channel.published().as_slice(),
            [ChannelEvent::SendMessage { message }] if message.id == MessageId::new("m21")
        ));

        // The backend echoes our own send back over the channel.
        session.apply_event(ChannelEvent::SendMessage {
            message: record("m21", "C1"),
        });

        assert_eq!(view_ids(&session), vec!["m21", "m20"], "echo must not duplicate");
    }

    // Scenario D: a null-record upload response mutates nothing.
    #[tokio::test]
    async fn rejected_upload_leaves_view_and_channel_untouched() {
        let (transport, channel, mut session) = session();
        transport.queue_json(wire_page("C1", &["m1"]));
        session.load_initial().await.unwrap();

        transport.queue_json(serde_json::json!({ "_id": null }));
        let result = session
            .send_images(vec![Attachment::new("big.jpg", vec![0; 8])], &UserId::new("u1"))
            .await;

        assert!(matches!(result, Err(ClientError::MediaTooLarge)));
        assert_eq!(view_ids(&session), vec!["m1"]);
        assert!(channel.published().is_empty());
    }

    // Scenario E: recall replaces the record in place.
    #[tokio::test]
    async fn recall_updates_in_place_and_broadcasts() {
        let (transport, channel, mut session) = session();
        transport.queue_json(wire_page("C1", &["m4", "m5", "m6"]));
        session.load_initial().await.unwrap();

        let mut recalled = record("m5", "C1");
        recalled.recalled = true;
        transport.queue_json(serde_json::to_value(&recalled).unwrap());

        session.recall(&MessageId::new("m5")).await.unwrap();

        assert_eq!(view_ids(&session), vec!["m4", "m5", "m6"]);
        assert!(session.view().messages()[1].recalled);
        assert!(matches!(
            channel.published().as_slice(),
            [ChannelEvent::RecallMessage { .. }]
        ));
    }

    // Scenario F: delete-for-me removes locally and never broadcasts.
    #[tokio::test]
    async fn delete_for_me_removes_locally_only() {
        let (transport, channel, mut session) = session();
        transport.queue_json(wire_page("C1", &["m2", "m3", "m4"]));
        session.load_initial().await.unwrap();

        transport.queue_json(serde_json::json!({ "id": "m3" }));
        session
            .delete_for_me(&MessageId::new("m3"), &UserId::new("u1"))
            .await
            .unwrap();

        assert_eq!(view_ids(&session), vec!["m2", "m4"]);
        assert!(channel.published().is_empty());
    }

    #[tokio::test]
    async fn failed_initial_load_leaves_flag_loading() {
        let (transport, _, mut session) = session();
        transport.fail_next_request("connection refused");

        let result = session.load_initial().await;

        assert!(result.is_err());
        assert_eq!(
            session.view().history_state(),
            LoadState::Loading,
            "a failed fetch leaves the flag unresolved"
        );
    }

    #[tokio::test]
    async fn inbound_events_flow_through_the_subscription() {
        let (transport, channel, mut session) = session();
        transport.queue_json(wire_page("C1", &["m1"]));
        session.load_initial().await.unwrap();

        let mut rx = channel.subscribe();
        channel.inject(ChannelEvent::SendMessage {
            message: record("m0", "C1"),
        });
        let event = rx.recv().await.unwrap();
        session.apply_event(event);

        assert_eq!(view_ids(&session), vec!["m0", "m1"]);
    }

    #[tokio::test]
    async fn events_for_another_conversation_are_dropped() {
        let (transport, _, mut session) = session();
        transport.queue_json(wire_page("C1", &["m1"]));
        session.load_initial().await.unwrap();

        session.apply_event(ChannelEvent::SendMessage {
            message: record("x1", "C9"),
        });
        session.apply_event(ChannelEvent::RecallMessage {
            message: record("x2", "C9"),
        });

        assert_eq!(view_ids(&session), vec!["m1"]);
    }

    #[tokio::test]
    async fn forward_does_not_touch_the_current_view() {
        let (transport, channel, mut session) = session();
        transport.queue_json(wire_page("C1", &["m1"]));
        session.load_initial().await.unwrap();

        transport.queue_json(serde_json::json!({
            "newMessage": [serde_json::to_value(record("n1", "C2")).unwrap()]
        }));
        let created = session
            .forward(
                &[record("m1", "C1")],
                &ConversationId::new("C2"),
                &UserId::new("u1"),
            )
            .await
            .unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(view_ids(&session), vec!["m1"]);
        assert_eq!(channel.published().len(), 1);
    }
}
