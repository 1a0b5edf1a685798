//! PreviewSession - runtime driver for the preview gate.
//!
//! Owns an `EntitlementGate` on a background task that reacts to three
//! inputs: playback commands, a countdown tick per second of playback, and the
//! user's entitlement stream from the store. Observers read the current
//! `EntitlementState` from a watch channel and receive `GateEvent`s from a
//! broadcast channel.
//!
//! Closing the session (or dropping the handle) stops the task and drops the
//! entitlement subscription, so updates arriving afterwards are ignored.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::domain::entitlement::{
    EntitlementGate, EntitlementState, GateEvent, TickOutcome, DEFAULT_PREVIEW_SECONDS,
};
use crate::domain::foundation::{ContentId, UserId};
use crate::domain::payment::PaymentError;
use crate::ports::{EntitlementStore, EntitlementStream};

const EVENT_CAPACITY: usize = 16;

/// Called with the unlocked content id each time the gate unlocks.
pub type UnlockCallback = Box<dyn Fn(&ContentId) + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSessionConfig {
    pub preview_seconds: u32,
    pub tick_interval: Duration,
}

impl Default for PreviewSessionConfig {
    fn default() -> Self {
        Self {
            preview_seconds: DEFAULT_PREVIEW_SECONDS,
            tick_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    #[error("preview session is closed")]
    Closed,

    #[error(transparent)]
    Entitlement(#[from] PaymentError),
}

enum Command {
    Play,
    Pause,
    SwitchContent(ContentId),
    OnUnlock(UnlockCallback),
    Close,
}

/// Handle to a running preview.
pub struct PreviewSession {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<EntitlementState>,
    events: broadcast::Sender<GateEvent>,
    task: Option<JoinHandle<()>>,
}

impl PreviewSession {
    /// Loads the user's entitlement, subscribes to changes and starts the
    /// countdown task for `content_id`. Playback starts stopped.
    pub async fn start(
        store: Arc<dyn EntitlementStore>,
        user_id: UserId,
        content_id: ContentId,
        config: PreviewSessionConfig,
    ) -> Result<Self, PreviewError> {
        let entitlement = store.get(&user_id).await?;
        let updates = store.watch(&user_id).await?;

        let gate = EntitlementGate::open(content_id, entitlement, config.preview_seconds);
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(gate.state());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        tracing::debug!(
            user_id = %user_id,
            content_id = %gate.content_id(),
            has_access = gate.state().has_access,
            "Preview session started"
        );

        let driver = Driver {
            gate,
            clock: PlaybackClock::new(config.tick_interval),
            callbacks: Vec::new(),
            state: state_tx,
            events: events.clone(),
        };
        let task = tokio::spawn(driver.run(command_rx, updates));

        Ok(Self {
            commands,
            state,
            events,
            task: Some(task),
        })
    }

    fn send(&self, command: Command) -> Result<(), PreviewError> {
        self.commands.send(command).map_err(|_| PreviewError::Closed)
    }

    /// Starts or resumes playback. Ignored once the preview has expired.
    pub fn play(&self) -> Result<(), PreviewError> {
        self.send(Command::Play)
    }

    pub fn pause(&self) -> Result<(), PreviewError> {
        self.send(Command::Pause)
    }

    /// Moves the gate to another item, resetting the preview unless the
    /// entitlement already grants it.
    pub fn switch_content(&self, content_id: ContentId) -> Result<(), PreviewError> {
        self.send(Command::SwitchContent(content_id))
    }

    /// Registers a callback fired on every lock-to-unlock transition.
    pub fn on_unlock<F>(&self, callback: F) -> Result<(), PreviewError>
    where
        F: Fn(&ContentId) + Send + 'static,
    {
        self.send(Command::OnUnlock(Box::new(callback)))
    }

    /// Current state snapshot.
    pub fn state(&self) -> EntitlementState {
        *self.state.borrow()
    }

    /// Receiver that sees every state change.
    pub fn watch(&self) -> watch::Receiver<EntitlementState> {
        self.state.clone()
    }

    /// Gate events from now on.
    pub fn events(&self) -> broadcast::Receiver<GateEvent> {
        self.events.subscribe()
    }

    /// Stops the task and waits for it to finish.
    pub async fn close(&mut self) {
        let _ = self.commands.send(Command::Close);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Preview session task ended abnormally");
            }
        }
    }
}

impl Drop for PreviewSession {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Playing time banked toward the next countdown tick. Runs only while the
/// gate is counting, so pausing keeps the partial second instead of dropping it.
#[derive(Debug)]
struct PlaybackClock {
    interval: Duration,
    banked: Duration,
    next_tick: Option<Instant>,
}

impl PlaybackClock {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            banked: Duration::ZERO,
            next_tick: None,
        }
    }

    fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    fn deadline(&self) -> Instant {
        self.next_tick.unwrap_or_else(Instant::now)
    }

    fn resume(&mut self, now: Instant) {
        if self.next_tick.is_none() {
            self.next_tick = Some(now + self.interval.saturating_sub(self.banked));
        }
    }

    fn suspend(&mut self, now: Instant) {
        if let Some(deadline) = self.next_tick.take() {
            self.banked = self
                .interval
                .saturating_sub(deadline.saturating_duration_since(now));
        }
    }

    fn ticked(&mut self, deadline: Instant) {
        self.banked = Duration::ZERO;
        self.next_tick = Some(deadline + self.interval);
    }

    fn reset(&mut self) {
        self.banked = Duration::ZERO;
        self.next_tick = None;
    }
}

struct Driver {
    gate: EntitlementGate,
    clock: PlaybackClock,
    callbacks: Vec<UnlockCallback>,
    state: watch::Sender<EntitlementState>,
    events: broadcast::Sender<GateEvent>,
}

impl Driver {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut updates: EntitlementStream,
    ) {
        let mut watching = true;

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Close) | None => break,
                    Some(command) => self.apply(command),
                },
                _ = time::sleep_until(self.clock.deadline()), if self.clock.is_running() => {
                    let deadline = self.clock.deadline();
                    self.clock.ticked(deadline);
                    if self.gate.tick() == TickOutcome::Expired {
                        tracing::debug!(content_id = %self.gate.content_id(), "Preview expired");
                        self.emit(self.gate.expired_event());
                    }
                },
                update = updates.next(), if watching => match update {
                    Some(Ok(entitlement)) => {
                        if let Some(event) = self.gate.apply_entitlement(entitlement) {
                            self.unlocked(event);
                        }
                    }
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Entitlement update failed");
                    }
                    None => watching = false,
                },
            }

            let now = Instant::now();
            if self.gate.is_counting() {
                self.clock.resume(now);
            } else {
                self.clock.suspend(now);
            }
            self.state.send_replace(self.gate.state());
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Play => {
                self.gate.play();
            }
            Command::Pause => self.gate.pause(),
            Command::SwitchContent(content_id) => {
                self.clock.reset();
                let event = self.gate.switch_content(content_id);
                self.emit(event);
            }
            Command::OnUnlock(callback) => self.callbacks.push(callback),
            Command::Close => {}
        }
    }

    fn unlocked(&self, event: GateEvent) {
        if let GateEvent::Unlocked { content_id } = &event {
            tracing::info!(content_id = %content_id, "Content unlocked");
            for callback in &self.callbacks {
                callback(content_id);
            }
        }
        self.emit(event);
    }

    fn emit(&self, event: GateEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }
}
