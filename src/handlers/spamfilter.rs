//! `spamfilter` command: toggle message-rate moderation for a channel.
//!
//! `spamfilter state:<enable|disable>`
//!
//! Replies are ephemeral and distinguish a state change from a redundant
//! request. The `state` option autocompletes by prefix over the fixed
//! option set.

use async_trait::async_trait;

use super::{CommandHandler, Context};
use crate::error::{HandlerError, HandlerResult};
use crate::gateway::{
    AutocompleteEvent, Choice, CommandEvent, CommandSpec, OptionSpec, mention_channel,
};

/// Name the command is registered under.
pub const COMMAND_NAME: &str = "spamfilter";

/// Valid values for the `state` option.
pub const STATE_OPTIONS: [&str; 2] = ["enable", "disable"];

/// Registration descriptor for the `spamfilter` command.
pub fn command_spec() -> CommandSpec {
    CommandSpec {
        name: COMMAND_NAME,
        description: "Filter chat for spam.",
        options: vec![OptionSpec {
            name: "state",
            description: "Enable/disable the spam filter",
            required: true,
            autocomplete: true,
        }],
        requires_channel_management: true,
    }
}

/// Handler for the `spamfilter` command.
pub struct SpamfilterHandler;

#[async_trait]
impl CommandHandler for SpamfilterHandler {
    async fn handle(&self, ctx: &Context<'_>, event: &CommandEvent) -> HandlerResult {
        let state = event
            .options
            .get("state")
            .ok_or(HandlerError::NeedMoreParams("state"))?
            .to_lowercase();

        if !STATE_OPTIONS.contains(&state.as_str()) {
            event
                .responder
                .reply_ephemeral(&unknown_state_reply(&state))
                .await?;
            return Ok(());
        }

        let channel = mention_channel(&event.channel_id);
        let reply = if state == "enable" {
            if ctx.moderation.enable(&event.channel_id) {
                format!("Spam filter has been enabled for {channel} ✅")
            } else {
                format!("Spam filter is already enabled for {channel} ❌")
            }
        } else if ctx.moderation.disable(&event.channel_id) {
            format!("Spam filter has been disabled for {channel} ✅")
        } else {
            format!("Spam filter is already disabled for {channel} ❌")
        };

        event.responder.reply_ephemeral(&reply).await?;
        Ok(())
    }

    async fn autocomplete(&self, ctx: &Context<'_>, event: &AutocompleteEvent) -> HandlerResult {
        if event.focused_option != "state" {
            return Ok(());
        }

        let choices = state_choices(&event.partial, ctx.max_choices);
        event.responder.suggest(choices).await?;
        Ok(())
    }
}

/// Prefix-match the typed fragment against the fixed option set.
fn state_choices(partial: &str, max: usize) -> Vec<Choice> {
    STATE_OPTIONS
        .iter()
        .copied()
        .filter(|word| word.starts_with(partial))
        .take(max)
        .map(Choice::of)
        .collect()
}

/// Validation-failure reply enumerating the valid options.
fn unknown_state_reply(state: &str) -> String {
    let mut reply = format!("Unknown state argument: `{state}` 🤔");
    reply.push_str("\n\nAvailable options:");
    for option in STATE_OPTIONS {
        reply.push_str(&format!("\n- *{option}*"));
    }
    reply
}
