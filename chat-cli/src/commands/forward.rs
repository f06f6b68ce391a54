//! Forward a message to another conversation.

use anyhow::{bail, Result};
use std::path::Path;
use std::sync::Arc;

use chat_client::{
    ClientError, HistoryLoader, HttpTransport, LocalChannel, MockTransport, ModerationOps,
    Transport, TransportConfig,
};
use chat_types::{ConversationId, MessageId, UserId};

use crate::config::ProfileConfig;

/// Run the forward command.
pub async fn run(
    data_dir: &Path,
    message_id: &str,
    conversation: &str,
    target: &str,
    use_mock: bool,
) -> Result<()> {
    let profile = ProfileConfig::load(data_dir).await?;
    let id = MessageId::new(message_id);
    let source = ConversationId::new(conversation);
    let target = ConversationId::new(target);
    let user = UserId::new(profile.user_id.as_str());

    if use_mock {
        let transport = MockTransport::new();
        // Latest page of the source conversation, containing the message.
        let mut record = super::mock_record(source.as_str(), &profile.user_id, "forward me");
        record["_id"] = message_id.into();
        transport.queue_json(serde_json::json!([record]));
        // The move response: the record re-materialized in the target.
        let moved = super::mock_record(target.as_str(), &profile.user_id, "forward me");
        transport.queue_json(serde_json::json!({ "newMessage": [moved] }));
        do_forward(Arc::new(transport), &id, &source, &target, &user).await
    } else {
        let transport = HttpTransport::new(TransportConfig::new(&profile.api_base))?;
        do_forward(Arc::new(transport), &id, &source, &target, &user).await
    }
}

async fn do_forward<T: Transport>(
    transport: Arc<T>,
    id: &MessageId,
    source: &ConversationId,
    target: &ConversationId,
    user: &UserId,
) -> Result<()> {
    let loader = HistoryLoader::new(Arc::clone(&transport));
    let batch = loader.fetch_initial(source).await?;
    let Some(message) = batch.messages.into_iter().find(|m| &m.id == id) else {
        bail!("Message {id} is not in the latest page of {source}");
    };

    let ops = ModerationOps::new(transport, Arc::new(LocalChannel::new()));
    match ops.forward(&[message], target, user).await {
        Ok(created) => {
            println!("Forwarded into {target}: {} new message(s).", created.len());
        }
        Err(ClientError::ForwardFailed) => {
            println!("Forwarding failed!");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
