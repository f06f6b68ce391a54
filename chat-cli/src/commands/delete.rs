//! Hide a message from the acting user's view.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use chat_client::{
    HttpTransport, LocalChannel, MockTransport, ModerationOps, Transport, TransportConfig,
};
use chat_types::{MessageId, UserId};

use crate::config::ProfileConfig;

/// Run the delete command.
pub async fn run(data_dir: &Path, message_id: &str, use_mock: bool) -> Result<()> {
    let profile = ProfileConfig::load(data_dir).await?;
    let id = MessageId::new(message_id);
    let user = UserId::new(profile.user_id.as_str());

    if use_mock {
        let transport = MockTransport::new();
        transport.queue_json(serde_json::json!({ "id": message_id }));
        do_delete(Arc::new(transport), &id, &user).await
    } else {
        let transport = HttpTransport::new(TransportConfig::new(&profile.api_base))?;
        do_delete(Arc::new(transport), &id, &user).await
    }
}

async fn do_delete<T: Transport>(transport: Arc<T>, id: &MessageId, user: &UserId) -> Result<()> {
    let ops = ModerationOps::new(transport, Arc::new(LocalChannel::new()));
    let deleted = ops.delete_for_me(id, user).await?;
    println!("Hidden {deleted} from your view. Other participants keep their copy.");
    Ok(())
}
