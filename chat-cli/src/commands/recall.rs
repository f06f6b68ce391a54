//! Recall a message for every participant.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use chat_client::{
    HttpTransport, LocalChannel, MockTransport, ModerationOps, Transport, TransportConfig,
};
use chat_types::MessageId;

use crate::config::ProfileConfig;

/// Run the recall command.
pub async fn run(data_dir: &Path, message_id: &str, use_mock: bool) -> Result<()> {
    let profile = ProfileConfig::load(data_dir).await?;
    let id = MessageId::new(message_id);

    if use_mock {
        let transport = MockTransport::new();
        let mut record = super::mock_record("c1", &profile.user_id, "Message recalled");
        record["_id"] = message_id.into();
        record["recalled"] = true.into();
        transport.queue_json(record);
        do_recall(Arc::new(transport), &id).await
    } else {
        let transport = HttpTransport::new(TransportConfig::new(&profile.api_base))?;
        do_recall(Arc::new(transport), &id).await
    }
}

async fn do_recall<T: Transport>(transport: Arc<T>, id: &MessageId) -> Result<()> {
    let ops = ModerationOps::new(transport, Arc::new(LocalChannel::new()));
    let message = ops.recall(id).await?;
    println!("Recalled {} for every participant.", message.id);
    Ok(())
}
