//! Shared fakes for driving the engine deterministically.
//!
//! The real gateway is replaced by a recording transport, the scheduler by
//! one that only fires when told to, and the clock by a manually advanced
//! instant.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

use spamwarden::{
    Choice, ChoiceResponder, Clock, CommandEvent, Event, FilterConfig, MessageEvent,
    MessageHandle, Responder, Scheduler, SpamFilter, Transport, TransportError,
};

/// Install a tracing subscriber for the test run; repeated calls are
/// no-ops. Output shows up under `--nocapture` with `RUST_LOG` set.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Millisecond timestamp as a `DateTime<Utc>`.
pub fn ts(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().expect("valid millis")
}

/// Build an inbound message event for `channel`/`author` sent at `ms`.
pub fn message(channel: &str, author: &str, ms: i64, message_id: &str) -> MessageEvent {
    MessageEvent {
        channel_id: channel.to_string(),
        author_id: author.to_string(),
        author_is_automated: false,
        sent_at: ts(ms),
        handle: MessageHandle {
            channel_id: channel.to_string(),
            message_id: message_id.to_string(),
        },
    }
}

/// Build a `spamfilter` command event against the given responder.
pub fn spamfilter_command(
    channel: &str,
    state: &str,
    responder: Arc<RecordingResponder>,
) -> CommandEvent {
    CommandEvent {
        name: "spamfilter".to_string(),
        channel_id: channel.to_string(),
        options: HashMap::from([("state".to_string(), state.to_string())]),
        responder,
    }
}

/// Records outbound actions instead of talking to a real gateway.
#[derive(Default)]
pub struct RecordingTransport {
    pub deleted: Mutex<Vec<MessageHandle>>,
    /// (channel_id, text) pairs in send order.
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail_sends: AtomicBool,
    counter: AtomicU64,
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn delete_message(&self, handle: &MessageHandle) -> Result<(), TransportError> {
        self.deleted.lock().push(handle.clone());
        Ok(())
    }

    async fn send_message(
        &self,
        channel_id: &str,
        text: &str,
    ) -> Result<MessageHandle, TransportError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError("send refused".to_string()));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.sent
            .lock()
            .push((channel_id.to_string(), text.to_string()));
        Ok(MessageHandle {
            channel_id: channel_id.to_string(),
            message_id: format!("warning-{n}"),
        })
    }
}

/// A deferred task captured by the manual scheduler.
pub struct ScheduledTask {
    pub delay: Duration,
    pub task: BoxFuture<'static, ()>,
}

/// Captures scheduled tasks so tests can fire them on demand.
#[derive(Default)]
pub struct ManualScheduler {
    tasks: Mutex<Vec<ScheduledTask>>,
}

impl ManualScheduler {
    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.tasks.lock().iter().map(|t| t.delay).collect()
    }

    /// Run every captured task to completion, in schedule order.
    pub async fn run_all(&self) {
        let tasks = std::mem::take(&mut *self.tasks.lock());
        for scheduled in tasks {
            scheduled.task.await;
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: BoxFuture<'static, ()>) {
        self.tasks.lock().push(ScheduledTask { delay, task });
    }
}

/// Clock pinned to a test-controlled instant.
#[derive(Default)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn at(ms: i64) -> Self {
        Self {
            millis: AtomicI64::new(ms),
        }
    }

    pub fn set(&self, ms: i64) {
        self.millis.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: i64) {
        self.millis.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        ts(self.millis.load(Ordering::SeqCst))
    }
}

/// Records ephemeral command replies.
#[derive(Default)]
pub struct RecordingResponder {
    pub replies: Mutex<Vec<String>>,
}

#[async_trait]
impl Responder for RecordingResponder {
    async fn reply_ephemeral(&self, text: &str) -> Result<(), TransportError> {
        self.replies.lock().push(text.to_string());
        Ok(())
    }
}

/// Records autocomplete suggestion batches.
#[derive(Default)]
pub struct RecordingChoices {
    pub batches: Mutex<Vec<Vec<Choice>>>,
}

#[async_trait]
impl ChoiceResponder for RecordingChoices {
    async fn suggest(&self, choices: Vec<Choice>) -> Result<(), TransportError> {
        self.batches.lock().push(choices);
        Ok(())
    }
}

/// An engine wired to fakes, plus handles to every fake.
pub struct Harness {
    pub engine: Arc<SpamFilter>,
    pub transport: Arc<RecordingTransport>,
    pub scheduler: Arc<ManualScheduler>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();
        let transport = Arc::new(RecordingTransport::default());
        let scheduler = Arc::new(ManualScheduler::default());
        let clock = Arc::new(ManualClock::at(0));
        let engine = Arc::new(SpamFilter::new(
            &FilterConfig::default(),
            Arc::clone(&transport) as Arc<dyn Transport>,
            Arc::clone(&scheduler) as Arc<dyn Scheduler>,
            Arc::clone(&clock) as Arc<dyn Clock>,
        ));
        Self {
            engine,
            transport,
            scheduler,
            clock,
        }
    }

    /// Deliver a message sent at `ms`, with the clock pinned to the same
    /// instant (messages normally arrive as they are sent).
    pub async fn deliver(&self, channel: &str, author: &str, ms: i64, message_id: &str) {
        self.clock.set(ms);
        self.engine
            .handle_event(Event::Message(message(channel, author, ms, message_id)))
            .await;
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
