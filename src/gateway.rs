//! External chat-gateway boundary.
//!
//! The gateway connection, message delivery and command registration all
//! live outside this crate. The engine consumes them through the event
//! types and capability traits defined here, which keeps every collaborator
//! substitutable in tests (fake transport, manual clock, manual scheduler).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::TransportError;

/// Opaque stable channel identifier as assigned by the chat surface.
pub type ChannelId = String;

/// Opaque stable author identifier.
pub type AuthorId = String;

/// Opaque handle to a specific message the gateway can delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHandle {
    pub channel_id: ChannelId,
    pub message_id: String,
}

/// Render a user mention the way the chat surface expects it.
pub fn mention_user(author_id: &str) -> String {
    format!("<@{author_id}>")
}

/// Render a channel mention.
pub fn mention_channel(channel_id: &str) -> String {
    format!("<#{channel_id}>")
}

/// Inbound chat message event.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub channel_id: ChannelId,
    pub author_id: AuthorId,
    /// Set by the gateway for bots and webhooks; those are never moderated.
    pub author_is_automated: bool,
    /// Send timestamp as stamped by the chat surface.
    pub sent_at: DateTime<Utc>,
    /// Handle for deleting this specific message.
    pub handle: MessageHandle,
}

/// Inbound command invocation.
#[derive(Clone)]
pub struct CommandEvent {
    pub name: String,
    /// Channel the command was invoked from.
    pub channel_id: ChannelId,
    /// String option values by option name.
    pub options: HashMap<String, String>,
    /// Ephemeral reply sink for this invocation.
    pub responder: Arc<dyn Responder>,
}

/// Inbound autocomplete query for a command option.
#[derive(Clone)]
pub struct AutocompleteEvent {
    pub name: String,
    /// Name of the option currently being typed.
    pub focused_option: String,
    /// The partially typed option value.
    pub partial: String,
    /// Suggestion sink for this query.
    pub responder: Arc<dyn ChoiceResponder>,
}

/// A single autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    /// Suggestion whose label and value are the same word.
    pub fn of(word: impl Into<String>) -> Self {
        let value = word.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Any event the gateway can deliver to the engine.
#[derive(Clone)]
pub enum Event {
    Message(MessageEvent),
    Command(CommandEvent),
    Autocomplete(AutocompleteEvent),
}

/// Registration descriptor for a command, consumed by the gateway layer at
/// startup. The gateway owns wire registration and permission enforcement.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub options: Vec<OptionSpec>,
    /// Restrict invocation to members with channel-management privilege.
    pub requires_channel_management: bool,
}

/// Registration descriptor for a single string option of a command.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub autocomplete: bool,
}

/// Outbound message capabilities of the gateway.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Delete a message. Deleting a message that is already gone must be a
    /// no-op on the gateway side, not an error the caller has to handle.
    async fn delete_message(&self, handle: &MessageHandle) -> Result<(), TransportError>;

    /// Send a message to a channel, returning a handle usable for later
    /// deletion.
    async fn send_message(
        &self,
        channel_id: &str,
        text: &str,
    ) -> Result<MessageHandle, TransportError>;
}

/// Ephemeral reply sink for a command invocation. Replies are visible only
/// to the invoking user.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn reply_ephemeral(&self, text: &str) -> Result<(), TransportError>;
}

/// Suggestion sink for an autocomplete query.
#[async_trait]
pub trait ChoiceResponder: Send + Sync {
    async fn suggest(&self, choices: Vec<Choice>) -> Result<(), TransportError>;
}

/// Deferred execution capability.
pub trait Scheduler: Send + Sync {
    /// Run `task` once after `delay` elapses, on an unspecified task/thread.
    fn schedule(&self, delay: Duration, task: BoxFuture<'static, ()>);
}

/// Tokio-backed scheduler.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: BoxFuture<'static, ()>) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
    }
}

/// Current-time source.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
