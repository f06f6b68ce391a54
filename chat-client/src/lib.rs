//! # chat-client
//!
//! Client library for the chat-sync message synchronization engine.
//!
//! This is the I/O layer: it talks to the backend over HTTP, publishes and
//! receives realtime events, and feeds every result into the pure
//! [`chat_core::ConversationView`] owned by a [`ConversationSession`].
//!
//! ## Architecture
//!
//! ```text
//! Application → ConversationSession → Transport / RealtimeChannel → Network
//!                      ↓
//!                  chat-core (pure view logic)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use chat_client::{ConversationSession, HttpTransport, LocalChannel, TransportConfig};
//!
//! let transport = Arc::new(HttpTransport::new(TransportConfig::new("https://api.example"))?);
//! let channel = Arc::new(LocalChannel::new());
//! let mut session = ConversationSession::new("c1".into(), transport, channel);
//!
//! session.load_initial().await?;
//! session.send_text("u1".into(), "hello".into()).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod history;
pub mod moderation;
pub mod realtime;
pub mod send;
pub mod session;
pub mod transport;

pub use config::TransportConfig;
pub use error::ClientError;
pub use history::HistoryLoader;
pub use moderation::ModerationOps;
pub use realtime::{LocalChannel, MockChannel, RealtimeChannel};
pub use send::SendCoordinator;
pub use session::ConversationSession;
pub use transport::{
    Attachment, HttpTransport, MockTransport, RecordedRequest, Transport, TransportError,
    UploadForm,
};
