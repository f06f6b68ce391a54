//! # chat-types
//!
//! Wire format types for the chat-sync message synchronization engine.
//!
//! This crate provides the foundational types used across all chat-sync
//! crates:
//! - [`MessageId`], [`ConversationId`], [`UserId`] - Identity types
//! - [`Message`] - The message entity and its payload variants
//! - [`ChannelEvent`] - Realtime channel events
//! - [`ChatError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod events;
mod ids;
mod message;

pub use error::ChatError;
pub use events::ChannelEvent;
pub use ids::{ConversationId, MessageId, UserId};
pub use message::{
    DeleteForMeRequest, DeleteForMeResponse, ForwardRequest, ForwardResponse, HistoryRequest,
    Message, MessagePayload, OutgoingText, SendReceipt,
};
