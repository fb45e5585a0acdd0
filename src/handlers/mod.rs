//! Gateway command handlers.
//!
//! The registry maps command names to handlers and dispatches incoming
//! command and autocomplete events to them. Handlers mutate moderation
//! state through the [`Context`] and reply through the event's responder.

mod spamfilter;

pub use spamfilter::SpamfilterHandler;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{HandlerError, HandlerResult};
use crate::gateway::{AutocompleteEvent, CommandEvent, CommandSpec};
use crate::state::ModerationRegistry;

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// Shared moderation state.
    pub moderation: &'a ModerationRegistry,
    /// Cap on autocomplete suggestions returned to the gateway.
    pub max_choices: usize,
}

/// A command handler: one slash command plus its autocomplete surface.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Handle a command invocation.
    async fn handle(&self, ctx: &Context<'_>, event: &CommandEvent) -> HandlerResult;

    /// Handle an autocomplete query for one of this command's options.
    async fn autocomplete(&self, ctx: &Context<'_>, event: &AutocompleteEvent) -> HandlerResult;
}

/// Command handler registry.
pub struct Registry {
    handlers: HashMap<&'static str, Arc<dyn CommandHandler>>,
}

impl Registry {
    /// Create a registry with all known handlers installed.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Arc<dyn CommandHandler>> = HashMap::new();
        handlers.insert(spamfilter::COMMAND_NAME, Arc::new(SpamfilterHandler));
        Self { handlers }
    }

    /// Registration descriptors for every installed command.
    pub fn command_specs(&self) -> Vec<CommandSpec> {
        vec![spamfilter::command_spec()]
    }

    /// Dispatch a command invocation to its handler.
    pub async fn dispatch_command(
        &self,
        ctx: &Context<'_>,
        event: &CommandEvent,
    ) -> HandlerResult {
        let handler = self
            .handlers
            .get(event.name.as_str())
            .ok_or_else(|| HandlerError::UnknownCommand(event.name.clone()))?;
        handler.handle(ctx, event).await
    }

    /// Dispatch an autocomplete query. Queries for commands this registry
    /// does not serve are ignored.
    pub async fn dispatch_autocomplete(
        &self,
        ctx: &Context<'_>,
        event: &AutocompleteEvent,
    ) -> HandlerResult {
        match self.handlers.get(event.name.as_str()) {
            Some(handler) => handler.autocomplete(ctx, event).await,
            None => Ok(()),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
