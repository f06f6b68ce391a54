//! Fetch and print a page of a conversation's history.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use chat_client::{HistoryLoader, HttpTransport, MockTransport, Transport, TransportConfig};
use chat_types::{ConversationId, Message, MessagePayload};

use crate::config::ProfileConfig;

/// Run the history command.
pub async fn run(data_dir: &Path, conversation: &str, offset: usize, use_mock: bool) -> Result<()> {
    let profile = ProfileConfig::load(data_dir).await?;
    let conversation = ConversationId::new(conversation);

    if use_mock {
        let transport = MockTransport::new();
        transport.queue_json(serde_json::json!([
            super::mock_record(conversation.as_str(), "u2", "hey, are you around?"),
            super::mock_record(conversation.as_str(), &profile.user_id, "hello"),
        ]));
        print_page(Arc::new(transport), &conversation, offset).await
    } else {
        let transport = HttpTransport::new(TransportConfig::new(&profile.api_base))?;
        print_page(Arc::new(transport), &conversation, offset).await
    }
}

async fn print_page<T: Transport>(
    transport: Arc<T>,
    conversation: &ConversationId,
    offset: usize,
) -> Result<()> {
    let loader = HistoryLoader::new(transport);
    let batch = if offset == 0 {
        loader.fetch_initial(conversation).await?
    } else {
        loader.fetch_next(conversation, offset).await?
    };

    if batch.messages.is_empty() {
        println!("No more history.");
        return Ok(());
    }

    println!("{} message(s), newest first:", batch.messages.len());
    for message in &batch.messages {
        println!("  {}", format_line(message));
    }
    Ok(())
}

fn format_line(message: &Message) -> String {
    let content = match &message.payload {
        MessagePayload::Text { text } => text.clone(),
        MessagePayload::Images { image_links } => format!("[{} image(s)]", image_links.len()),
        MessagePayload::File { file_link } => format!("[file] {file_link}"),
    };
    let recalled = if message.recalled { " (recalled)" } else { "" };
    format!("{} <{}> {}{}", message.id, message.sender_id, content, recalled)
}
