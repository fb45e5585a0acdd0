//! spamwarden - per-channel chat message-rate moderation.
//!
//! Watches the event stream of an external chat gateway, detects bursts of
//! messages from a single author inside a short trailing window, removes the
//! offending messages and warns the author at a bounded rate. Moderation is
//! toggled per channel through the `spamfilter` command.
//!
//! The gateway itself (connection, delivery, permission enforcement) lives
//! outside this crate and is consumed through the event types and capability
//! traits in [`gateway`].

pub mod config;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod state;

pub use config::{ConfigError, FilterConfig};
pub use engine::SpamFilter;
pub use error::{HandlerError, HandlerResult, TransportError};
pub use gateway::{
    AuthorId, AutocompleteEvent, ChannelId, Choice, ChoiceResponder, Clock, CommandEvent,
    CommandSpec, Event, MessageEvent, MessageHandle, OptionSpec, Responder, Scheduler,
    SystemClock, TokioScheduler, Transport,
};
pub use state::{Evaluation, ModerationRegistry, WarningTracker};
