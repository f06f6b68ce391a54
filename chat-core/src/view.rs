//! The conversation view - the single in-memory message store.
//!
//! Exactly one component is permitted to mutate the message list of a
//! conversation, and this is it. History pages, send confirmations and
//! realtime events all funnel into the same small set of mutations, so the
//! uniqueness and ordering invariants live in one place:
//!
//! - no two records share an id ([`ConversationView::merge_incoming`] is the
//!   single merge point for every singleton arrival),
//! - new messages insert at the head, older pages append at the tail in
//!   server order,
//! - results tagged with a different conversation id never apply (there is
//!   no request cancellation on conversation switch; stale responses are
//!   neutralized here instead).

use chat_types::{ConversationId, Message, MessageId};

/// Lifecycle state of one fetch concern (initial history or pagination).
///
/// Callers flip the flag to `Loading` immediately before issuing the
/// corresponding network request; the view flips it back to `Ready` when a
/// result applies. A failed request leaves the flag `Loading` - an accepted
/// limitation carried over from the source behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// A request is outstanding.
    Loading,
    /// No request outstanding; the view reflects the last applied result.
    Ready,
}

/// A fetched page of history, tagged with the conversation it was
/// requested for.
///
/// The tag is what makes a response from a just-abandoned conversation
/// harmless: the view discards batches whose tag does not match.
#[derive(Debug, Clone)]
pub struct HistoryBatch {
    /// The conversation the page was requested for.
    pub conversation_id: ConversationId,
    /// The page content, in server order (newest first).
    pub messages: Vec<Message>,
}

/// Outcome of applying a [`HistoryBatch`] to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The batch was applied.
    Applied,
    /// The batch was tagged with a different conversation and discarded.
    StaleConversation,
}

/// Outcome of merging a single incoming message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The message was new and was inserted at the head.
    Inserted,
    /// A record with the same id already exists; nothing changed.
    Duplicate,
    /// The message belongs to a different conversation; nothing changed.
    OtherConversation,
}

/// The ordered, duplicate-free message list of one conversation, newest
/// first, plus the two independent loading flags.
///
/// One value per active conversation screen; owned by that screen's session
/// and passed by handle, never a process-wide singleton.
#[derive(Debug)]
pub struct ConversationView {
    conversation_id: ConversationId,
    messages: Vec<Message>,
    history: LoadState,
    pagination: LoadState,
}

impl ConversationView {
    /// Create an empty view for the given conversation. Both flags start
    /// `Ready`; callers set them to `Loading` when they issue a fetch.
    pub fn new(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            messages: Vec::new(),
            history: LoadState::Ready,
            pagination: LoadState::Ready,
        }
    }

    /// The conversation this view displays.
    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    /// The messages, newest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages currently loaded.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the view holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether a message with the given id is present.
    pub fn contains(&self, id: &MessageId) -> bool {
        self.messages.iter().any(|m| &m.id == id)
    }

    /// State of the initial-history fetch.
    pub fn history_state(&self) -> LoadState {
        self.history
    }

    /// State of the pagination fetch.
    pub fn pagination_state(&self) -> LoadState {
        self.pagination
    }

    /// Mark the initial-history fetch as outstanding.
    pub fn begin_history_load(&mut self) {
        self.history = LoadState::Loading;
    }

    /// Mark the pagination fetch as outstanding.
    pub fn begin_pagination_load(&mut self) {
        self.pagination = LoadState::Loading;
    }

    /// Set the view to exactly the batch's messages, in the given order,
    /// and mark history `Ready`. Called only with an initial-history result.
    pub fn replace_all(&mut self, batch: HistoryBatch) -> ApplyOutcome {
        if batch.conversation_id != self.conversation_id {
            return ApplyOutcome::StaleConversation;
        }
        self.messages = batch.messages;
        self.history = LoadState::Ready;
        ApplyOutcome::Applied
    }

    /// Concatenate an older page after the current tail, preserving the
    /// server order within the batch, and mark pagination `Ready`.
    ///
    /// No dedup is performed: offset-based pagination produces disjoint
    /// batches by construction. An empty batch is valid and means "no more
    /// history".
    pub fn append_older(&mut self, batch: HistoryBatch) -> ApplyOutcome {
        if batch.conversation_id != self.conversation_id {
            return ApplyOutcome::StaleConversation;
        }
        self.messages.extend(batch.messages);
        self.pagination = LoadState::Ready;
        ApplyOutcome::Applied
    }

    /// The single merge point for singleton arrivals: send confirmations
    /// and realtime pushes both land here.
    ///
    /// Idempotent by id - a locally-sent message echoed back over the
    /// realtime channel is a `Duplicate`, not a second record.
    pub fn merge_incoming(&mut self, message: Message) -> MergeOutcome {
        if message.conversation_id != self.conversation_id {
            return MergeOutcome::OtherConversation;
        }
        if self.contains(&message.id) {
            return MergeOutcome::Duplicate;
        }
        self.messages.insert(0, message);
        MergeOutcome::Inserted
    }

    /// Replace the record with the given id in place, preserving its
    /// position. Returns false (and changes nothing) if the id is absent.
    ///
    /// Used by recall: the server returns the updated record and the view
    /// swaps it in where the original sat.
    pub fn update_by_id(&mut self, id: &MessageId, new_message: Message) -> bool {
        match self.messages.iter_mut().find(|m| &m.id == id) {
            Some(slot) => {
                *slot = new_message;
                true
            }
            None => false,
        }
    }

    /// Remove the record with the given id from this view only. Returns
    /// false if the id is absent.
    ///
    /// Used by delete-for-me; other participants' views are unaffected.
    pub fn remove_by_id(&mut self, id: &MessageId) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| &m.id != id);
        self.messages.len() != before
    }
}
