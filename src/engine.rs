//! Message-event orchestration: evaluate, delete, warn, schedule cleanup.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::FilterConfig;
use crate::gateway::{
    self, AutocompleteEvent, Clock, CommandEvent, CommandSpec, Event, MessageEvent, Scheduler,
    Transport,
};
use crate::handlers::{Context, Registry};
use crate::state::{Evaluation, ModerationRegistry, WarningTracker};

/// Per-channel message-rate spam filter.
///
/// One instance owns the moderation state for the whole process and is
/// shared across event-handling tasks behind an `Arc`. Outbound actions
/// (delete, warn) are fire-and-forget; their failure never affects future
/// evaluations.
pub struct SpamFilter {
    registry: ModerationRegistry,
    warnings: WarningTracker,
    commands: Registry,
    transport: Arc<dyn Transport>,
    scheduler: Arc<dyn Scheduler>,
    clock: Arc<dyn Clock>,
    warning_ttl: Duration,
    max_choices: usize,
}

impl SpamFilter {
    /// Build an engine over the given gateway capabilities.
    pub fn new(
        config: &FilterConfig,
        transport: Arc<dyn Transport>,
        scheduler: Arc<dyn Scheduler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry: ModerationRegistry::new(config),
            warnings: WarningTracker::new(config),
            commands: Registry::new(),
            transport,
            scheduler,
            clock,
            warning_ttl: Duration::from_secs(config.warning_ttl_secs),
            max_choices: config.max_choices,
        }
    }

    /// Shared moderation registry.
    pub fn registry(&self) -> &ModerationRegistry {
        &self.registry
    }

    /// Registration descriptors for the commands this engine serves; the
    /// gateway installs these at startup.
    pub fn command_specs(&self) -> Vec<CommandSpec> {
        self.commands.command_specs()
    }

    /// Drive the engine from a gateway event stream, handling each event on
    /// its own task. Returns when the stream closes.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<Event>) {
        while let Some(event) = events.recv().await {
            let engine = Arc::clone(&self);
            tokio::spawn(async move {
                engine.handle_event(event).await;
            });
        }
    }

    /// Process one gateway event.
    pub async fn handle_event(&self, event: Event) {
        match event {
            Event::Message(message) => self.on_message(message).await,
            Event::Command(command) => self.on_command(command).await,
            Event::Autocomplete(query) => self.on_autocomplete(query).await,
        }
    }

    /// Process one inbound chat message end-to-end.
    pub async fn on_message(&self, event: MessageEvent) {
        if event.author_is_automated {
            return;
        }

        let now = self.clock.now();
        let Some(evaluation) = self.registry.record_and_evaluate(
            &event.channel_id,
            &event.author_id,
            now,
            event.sent_at,
        ) else {
            // Channel is not moderated
            return;
        };

        let count = match evaluation {
            Evaluation::NoHistory | Evaluation::Allowed(_) => return,
            Evaluation::Filtered(count) => count,
        };

        debug!(
            channel = %event.channel_id,
            author = %event.author_id,
            count,
            "removing message sent too quickly"
        );
        if let Err(error) = self.transport.delete_message(&event.handle).await {
            warn!(error = %error, "failed to delete filtered message");
        }

        if self.warnings.was_warned_recently(&event.author_id, now) {
            debug!(author = %event.author_id, "warning suppressed by cooldown");
            return;
        }
        self.warnings.record_warning(&event.author_id, now);

        let text = format!(
            "Please do not spam {}, thank you 😮",
            gateway::mention_user(&event.author_id)
        );
        let warning = match self.transport.send_message(&event.channel_id, &text).await {
            Ok(handle) => handle,
            Err(error) => {
                warn!(error = %error, channel = %event.channel_id, "failed to send warning");
                return;
            }
        };

        // The warning is transient noise; take it down again shortly. If it
        // was already removed by other means, deletion is a no-op.
        let transport = Arc::clone(&self.transport);
        self.scheduler.schedule(
            self.warning_ttl,
            Box::pin(async move {
                if let Err(error) = transport.delete_message(&warning).await {
                    debug!(error = %error, "deferred warning deletion failed");
                }
            }),
        );
    }

    async fn on_command(&self, event: CommandEvent) {
        let ctx = Context {
            moderation: &self.registry,
            max_choices: self.max_choices,
        };
        if let Err(error) = self.commands.dispatch_command(&ctx, &event).await {
            warn!(
                command = %event.name,
                code = error.error_code(),
                error = %error,
                "command handling failed"
            );
        }
    }

    async fn on_autocomplete(&self, event: AutocompleteEvent) {
        let ctx = Context {
            moderation: &self.registry,
            max_choices: self.max_choices,
        };
        if let Err(error) = self.commands.dispatch_autocomplete(&ctx, &event).await {
            warn!(
                command = %event.name,
                code = error.error_code(),
                error = %error,
                "autocomplete handling failed"
            );
        }
    }
}
