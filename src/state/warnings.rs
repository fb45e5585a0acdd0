//! Per-author warning cooldown tracking.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use crate::config::FilterConfig;
use crate::gateway::AuthorId;

/// Tracks the last warning issued to each author, across all channels.
///
/// A stored timestamp that has aged past the cooldown is removed when the
/// next check encounters it, not merely ignored, so the map does not grow
/// with authors that went quiet.
pub struct WarningTracker {
    warned_at: DashMap<AuthorId, DateTime<Utc>>,
    cooldown_ms: i64,
}

impl WarningTracker {
    /// Create a tracker with the given filter configuration.
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            warned_at: DashMap::new(),
            cooldown_ms: config.warning_cooldown_ms,
        }
    }

    /// Whether a warning was issued to `author_id` within the cooldown as
    /// of `now`. A stale entry is dropped on the way out.
    ///
    /// Callers pair this with [`record_warning`](Self::record_warning); the
    /// pair is not atomic, the engine serializes warning decisions per
    /// author.
    pub fn was_warned_recently(&self, author_id: &str, now: DateTime<Utc>) -> bool {
        let Some(warned_at) = self.warned_at.get(author_id).map(|entry| *entry.value()) else {
            return false;
        };

        if (now - warned_at).num_milliseconds() <= self.cooldown_ms {
            return true;
        }

        self.warned_at.remove(author_id);
        debug!(author = %author_id, "stale warning entry dropped");
        false
    }

    /// Record that a warning was issued to `author_id` at `now`,
    /// overwriting any previous entry.
    pub fn record_warning(&self, author_id: &str, now: DateTime<Utc>) {
        self.warned_at.insert(author_id.to_string(), now);
    }

    /// Whether an entry currently exists for `author_id`, stale or not.
    pub fn has_entry(&self, author_id: &str) -> bool {
        self.warned_at.contains_key(author_id)
    }
}
