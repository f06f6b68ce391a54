//! # chat-core
//!
//! Pure view logic for chat-sync (no I/O, instant tests).
//!
//! This crate owns the in-memory message list of one conversation and the
//! rules that keep it consistent: dedup-by-id merging, positional ordering,
//! stale-batch discard. There is no network or disk access here - the
//! actual I/O is performed by `chat-client`, which feeds results into these
//! types.
//!
//! Keeping the view pure means the ordering and dedup invariants can be
//! tested without mocks or async plumbing.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod view;

pub use view::{ApplyOutcome, ConversationView, HistoryBatch, LoadState, MergeOutcome};
