//! Per-channel moderation state and message-rate evaluation.
//!
//! A channel has an entry in the registry iff moderation is enabled for it;
//! absence means "not moderated", never "moderated with empty history".
//! Author histories are pruned lazily when that author's next message is
//! evaluated, so no background sweep is needed for correctness.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry as ChannelEntry;
use std::collections::HashMap;
use std::collections::hash_map::Entry as AuthorEntry;
use tracing::{debug, info};

use crate::config::FilterConfig;
use crate::gateway::{AuthorId, ChannelId};

/// Outcome of evaluating one message against its author's recent history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// First message observed from this author in this channel. A history
    /// is created for them and the message always passes.
    NoHistory,
    /// In-window message count (current message included) is below the
    /// limit; the message's timestamp was appended to the history.
    Allowed(usize),
    /// In-window message count (current message included) is at or above
    /// the limit. The triggering message's own timestamp is not retained,
    /// so a filtered burst does not inflate later counts.
    Filtered(usize),
}

impl Evaluation {
    /// Whether the evaluated message should be removed.
    pub fn is_filtered(&self) -> bool {
        matches!(self, Self::Filtered(_))
    }
}

/// Tracks which channels are under moderation and owns the per-channel,
/// per-author message timestamp histories.
///
/// Thread safety: each channel's author map is only touched while holding
/// that channel's `DashMap` entry guard, so evaluations for the same
/// channel are mutually exclusive while different channels proceed in
/// parallel.
pub struct ModerationRegistry {
    channels: DashMap<ChannelId, HashMap<AuthorId, Vec<DateTime<Utc>>>>,
    window_ms: i64,
    message_limit: usize,
}

impl ModerationRegistry {
    /// Create a registry with the given filter configuration.
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            channels: DashMap::new(),
            window_ms: config.window_ms,
            message_limit: config.message_limit,
        }
    }

    /// Put a channel under moderation.
    ///
    /// Returns `false` without touching anything if it already was.
    pub fn enable(&self, channel_id: &str) -> bool {
        match self.channels.entry(channel_id.to_string()) {
            ChannelEntry::Occupied(_) => false,
            ChannelEntry::Vacant(slot) => {
                slot.insert(HashMap::new());
                info!(channel = %channel_id, "spam filter enabled");
                true
            }
        }
    }

    /// Lift moderation from a channel, discarding every author history it
    /// held. Returns `false` if the channel was not moderated.
    pub fn disable(&self, channel_id: &str) -> bool {
        let removed = self.channels.remove(channel_id).is_some();
        if removed {
            info!(channel = %channel_id, "spam filter disabled");
        }
        removed
    }

    /// Whether a channel is currently under moderation.
    pub fn is_moderated(&self, channel_id: &str) -> bool {
        self.channels.contains_key(channel_id)
    }

    /// Fold one message into its author's history and classify it.
    ///
    /// Returns `None` when the channel is not under moderation. Timestamps
    /// that have aged out of the rate window as of `now` are dropped here,
    /// before counting; the current message counts as one regardless of the
    /// classification.
    pub fn record_and_evaluate(
        &self,
        channel_id: &str,
        author_id: &str,
        now: DateTime<Utc>,
        sent_at: DateTime<Utc>,
    ) -> Option<Evaluation> {
        let mut channel = self.channels.get_mut(channel_id)?;

        let history = match channel.entry(author_id.to_string()) {
            AuthorEntry::Vacant(slot) => {
                slot.insert(vec![sent_at]);
                debug!(channel = %channel_id, author = %author_id, "author history created");
                return Some(Evaluation::NoHistory);
            }
            AuthorEntry::Occupied(slot) => slot.into_mut(),
        };

        history.retain(|sent| (now - *sent).num_milliseconds() <= self.window_ms);
        let count = history.len() + 1;

        if count >= self.message_limit {
            debug!(
                channel = %channel_id,
                author = %author_id,
                count,
                "message rate limit exceeded"
            );
            return Some(Evaluation::Filtered(count));
        }

        history.push(sent_at);
        Some(Evaluation::Allowed(count))
    }
}
