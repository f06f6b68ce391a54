//! Send a text, image or file message.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chat_client::{
    Attachment, ClientError, HttpTransport, LocalChannel, MockTransport, SendCoordinator,
    Transport, TransportConfig,
};
use chat_types::{ConversationId, Message, OutgoingText, UserId};

use crate::config::ProfileConfig;

/// Run the send command.
pub async fn run(
    data_dir: &Path,
    conversation: &str,
    text: Option<String>,
    images: Vec<PathBuf>,
    file: Option<PathBuf>,
    use_mock: bool,
) -> Result<()> {
    let profile = ProfileConfig::load(data_dir).await?;
    let conversation = ConversationId::new(conversation);
    let sender = UserId::new(profile.user_id.as_str());

    if use_mock {
        let transport = MockTransport::new();
        queue_mock_confirmation(
            &transport,
            &conversation,
            &sender,
            text.as_deref(),
            &images,
            file.as_deref(),
        );
        dispatch(Arc::new(transport), conversation, sender, text, images, file).await
    } else {
        let transport = HttpTransport::new(TransportConfig::new(&profile.api_base))?;
        dispatch(Arc::new(transport), conversation, sender, text, images, file).await
    }
}

async fn dispatch<T: Transport>(
    transport: Arc<T>,
    conversation: ConversationId,
    sender: UserId,
    text: Option<String>,
    images: Vec<PathBuf>,
    file: Option<PathBuf>,
) -> Result<()> {
    let channel = Arc::new(LocalChannel::new());
    let coordinator = SendCoordinator::new(transport, channel);

    if let Some(text) = text {
        let message = coordinator
            .send_text(OutgoingText {
                conversation_id: conversation,
                sender_id: sender,
                text,
            })
            .await?;
        print_confirmed(&message);
    } else if !images.is_empty() {
        let attachments = read_attachments(&images).await?;
        match coordinator
            .send_images(attachments, &sender, &conversation)
            .await
        {
            Ok(message) => print_confirmed(&message),
            Err(ClientError::MediaTooLarge) => {
                println!("Upload refused: this media exceeds the size limit.");
            }
            Err(e) => return Err(e.into()),
        }
    } else if let Some(file) = file {
        let name = file_name(&file)?;
        let bytes = tokio::fs::read(&file).await.context("Failed to read file")?;
        match coordinator
            .send_file(Attachment::new(name, bytes), &sender, &conversation)
            .await
        {
            Ok(message) => print_confirmed(&message),
            Err(ClientError::FileTooLarge) => {
                println!("Upload refused: this file exceeds the size limit.");
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        bail!("Must specify text, --image or --file");
    }
    Ok(())
}

async fn read_attachments(paths: &[PathBuf]) -> Result<Vec<Attachment>> {
    let mut attachments = Vec::with_capacity(paths.len());
    for path in paths {
        let name = file_name(path)?;
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        attachments.push(Attachment::new(name, bytes));
    }
    Ok(attachments)
}

fn file_name(path: &Path) -> Result<String> {
    Ok(path
        .file_name()
        .and_then(|name| name.to_str())
        .context("Invalid file name")?
        .to_string())
}

fn print_confirmed(message: &Message) {
    println!("Sent: {} at {}", message.id, message.created_at);
}

/// Queue the confirmation a real backend would return for this send.
fn queue_mock_confirmation(
    transport: &MockTransport,
    conversation: &ConversationId,
    sender: &UserId,
    text: Option<&str>,
    images: &[PathBuf],
    file: Option<&Path>,
) {
    let record = if let Some(text) = text {
        super::mock_record(conversation.as_str(), sender.as_str(), text)
    } else if !images.is_empty() {
        let links: Vec<String> = images
            .iter()
            .map(|p| format!("https://cdn.example/{}", p.display()))
            .collect();
        serde_json::json!({
            "_id": uuid::Uuid::new_v4().to_string(),
            "conversationID": conversation.as_str(),
            "senderID": sender.as_str(),
            "imageLinks": links,
            "createdAt": super::now_timestamp(),
        })
    } else if let Some(file) = file {
        serde_json::json!({
            "_id": uuid::Uuid::new_v4().to_string(),
            "conversationID": conversation.as_str(),
            "senderID": sender.as_str(),
            "fileLink": format!("https://cdn.example/{}", file.display()),
            "createdAt": super::now_timestamp(),
        })
    } else {
        // dispatch() rejects this combination before the queue is read
        return;
    };
    transport.queue_json(record);
}
