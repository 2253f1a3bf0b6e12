//! The publisher facade and its lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread::{self, JoinHandle};

use fierymud_events_core::category::GameEventType;
use fierymud_events_core::clock::{Clock, SystemClock};
use fierymud_events_core::config::PublisherConfig;
use fierymud_events_core::event::GameEvent;
use fierymud_events_core::transport::{ConnectionStatus, Transport};
use tracing::{error, info, warn};

use crate::error::PublisherError;
use crate::queue::{DropReason, EnqueueOutcome, EventQueue, QueuedMessage};
use crate::stats::{Counters, DropCause, PublisherStats};
use crate::worker::Worker;

type BoxedTransport = Box<dyn Transport>;

enum Lifecycle {
    /// Constructed, not yet initialized.
    Idle(BoxedTransport),
    /// Initialized with publishing disabled; permanently a no-op.
    Disabled,
    /// Worker thread alive.
    Running(JoinHandle<BoxedTransport>),
    /// Shut down; terminal.
    Stopped,
}

/// Non-blocking game event publisher.
///
/// Create one per process, call [`initialize`](Self::initialize) once, share
/// it (e.g. behind an `Arc`) with every producer thread, and call
/// [`shutdown`](Self::shutdown) on exit. Publishing never blocks on the
/// broker and never fails; lost events show up in [`stats`](Self::stats).
pub struct EventPublisher {
    lifecycle: Mutex<Lifecycle>,
    running: AtomicBool,
    enabled: AtomicBool,
    initialized: AtomicBool,
    queue: OnceLock<Arc<EventQueue>>,
    counters: Arc<Counters>,
    status: ConnectionStatus,
    clock: Arc<dyn Clock>,
}

impl EventPublisher {
    /// Creates a stopped publisher that will deliver through `transport`.
    #[must_use]
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_clock(transport, Arc::new(SystemClock))
    }

    /// Creates a stopped publisher whose convenience methods stamp events
    /// with `clock`.
    #[must_use]
    pub fn with_clock(transport: impl Transport + 'static, clock: Arc<dyn Clock>) -> Self {
        let status = transport.status().clone();
        Self {
            lifecycle: Mutex::new(Lifecycle::Idle(Box::new(transport))),
            running: AtomicBool::new(false),
            enabled: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            queue: OnceLock::new(),
            counters: Arc::new(Counters::default()),
            status,
            clock,
        }
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts the publisher.
    ///
    /// Idempotent: a second call while initialized logs a warning and
    /// succeeds without restarting. With `enabled = false` no worker is
    /// started and every publish is a no-op. Otherwise one connection attempt
    /// is made up front (failure is logged, not fatal) and the worker thread
    /// is spawned.
    ///
    /// # Errors
    ///
    /// Returns `PublisherError::AlreadyShutDown` after [`shutdown`](Self::shutdown),
    /// or `PublisherError::Spawn` if the worker thread cannot be started.
    pub fn initialize(&self, config: PublisherConfig) -> Result<(), PublisherError> {
        let mut lifecycle = self.lifecycle();

        let mut transport = match std::mem::replace(&mut *lifecycle, Lifecycle::Stopped) {
            Lifecycle::Idle(transport) => transport,
            Lifecycle::Stopped => return Err(PublisherError::AlreadyShutDown),
            already @ (Lifecycle::Disabled | Lifecycle::Running(_)) => {
                *lifecycle = already;
                warn!("event publisher already initialized");
                return Ok(());
            }
        };

        self.enabled.store(config.enabled, Ordering::Release);
        if !config.enabled {
            *lifecycle = Lifecycle::Disabled;
            self.initialized.store(true, Ordering::Release);
            info!("event publisher disabled by configuration");
            return Ok(());
        }

        if let Err(e) = transport.connect(&config) {
            warn!(
                host = %config.host,
                port = config.port,
                error = %e,
                "initial event broker connection failed, will retry in background"
            );
        }

        let queue = Arc::clone(
            self.queue
                .get_or_init(|| Arc::new(EventQueue::new(config.queue_capacity))),
        );
        let (host, port) = (config.host.clone(), config.port);
        let worker = Worker::new(transport, queue, Arc::clone(&self.counters), config);

        let handle = thread::Builder::new()
            .name("event-publisher".to_owned())
            .spawn(move || worker.run())
            .map_err(PublisherError::Spawn)?;

        *lifecycle = Lifecycle::Running(handle);
        self.running.store(true, Ordering::Release);
        self.initialized.store(true, Ordering::Release);

        info!(%host, port, "event publisher initialized");
        Ok(())
    }

    /// Starts the publisher from `REDIS_URL` / `REDIS_HOST` / `REDIS_PORT` /
    /// `REDIS_PASSWORD` / `FIERYMUD_EVENTS_ENABLED`.
    ///
    /// # Errors
    ///
    /// Returns `PublisherError::Config` if the environment holds an invalid
    /// port or URL, and otherwise whatever [`initialize`](Self::initialize)
    /// returns.
    pub fn initialize_from_environment(&self) -> Result<(), PublisherError> {
        let config = PublisherConfig::from_env().inspect_err(|e| {
            error!(error = %e, "invalid event publisher environment");
        })?;
        self.initialize(config)
    }

    /// Stops the worker, disconnects and discards anything still queued.
    ///
    /// Safe to call any number of times; only the first call after a
    /// successful [`initialize`](Self::initialize) does anything.
    pub fn shutdown(&self) {
        if !self.running.swap(false, Ordering::AcqRel) {
            return;
        }

        info!("event publisher shutting down");

        let mut lifecycle = self.lifecycle();
        let Lifecycle::Running(handle) = std::mem::replace(&mut *lifecycle, Lifecycle::Stopped)
        else {
            return;
        };

        let discarded = self.queue.get().map_or(0, |queue| queue.close());

        match handle.join() {
            Ok(mut transport) => transport.disconnect(),
            Err(_) => error!("event publisher worker panicked"),
        }

        let stats = self.stats();
        info!(
            published = stats.events_published,
            dropped = stats.events_dropped,
            discarded,
            "event publisher shutdown complete"
        );
    }

    /// Returns whether the worker is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Returns whether [`initialize`](Self::initialize) has ever succeeded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Returns whether publishing was enabled at initialization.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Returns whether the worker currently holds a broker connection.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.status.is_connected()
    }

    /// Queues `event` for publishing on its category's channel.
    pub fn publish(&self, event: &GameEvent) {
        if !self.is_running() {
            return;
        }
        self.enqueue(QueuedMessage::new(event.channel(), event.to_wire_string()));
    }

    /// Queues an already-serialized `message` for `channel`.
    pub fn publish_raw(&self, channel: &str, message: impl Into<String>) {
        if !self.is_running() {
            return;
        }
        self.enqueue(QueuedMessage::new(channel, message));
    }

    fn enqueue(&self, message: QueuedMessage) {
        let Some(queue) = self.queue.get() else {
            return;
        };
        match queue.enqueue(message) {
            EnqueueOutcome::Enqueued | EnqueueOutcome::Dropped(DropReason::Closed) => {}
            EnqueueOutcome::Dropped(DropReason::QueueFull) => {
                self.counters.record_drop(DropCause::QueueFull);
            }
        }
    }

    /// Publishes a player lifecycle event (login, logout, death, ...).
    pub fn publish_player(
        &self,
        event_type: GameEventType,
        player_name: &str,
        message: &str,
        zone_id: Option<i32>,
        room_id: Option<&str>,
    ) {
        if !self.is_running() {
            return;
        }
        let mut event =
            GameEvent::player_event_at(event_type, player_name, message, self.clock.as_ref());
        event.zone_id = zone_id;
        event.room_id = room_id.map(str::to_owned);
        self.publish(&event);
    }

    /// Publishes a chat message. `target` is the recipient of directed
    /// channels such as tells.
    pub fn publish_chat(
        &self,
        event_type: GameEventType,
        player_name: &str,
        message: &str,
        target: Option<&str>,
    ) {
        if !self.is_running() {
            return;
        }
        self.publish(&GameEvent::chat_event_at(
            event_type,
            player_name,
            message,
            target,
            self.clock.as_ref(),
        ));
    }

    /// Publishes an admin or system alert.
    pub fn publish_admin(&self, event_type: GameEventType, message: &str) {
        if !self.is_running() {
            return;
        }
        self.publish(&GameEvent::create_at(event_type, message, self.clock.as_ref()));
    }

    /// Publishes a zone or world event.
    pub fn publish_zone(&self, event_type: GameEventType, zone_id: i32, message: &str) {
        if !self.is_running() {
            return;
        }
        self.publish(&GameEvent::zone_event_at(
            event_type,
            zone_id,
            message,
            self.clock.as_ref(),
        ));
    }

    /// Returns a snapshot of the publisher's counters.
    #[must_use]
    pub fn stats(&self) -> PublisherStats {
        let queue_depth = self.queue.get().map_or(0, |queue| queue.len());
        self.counters.snapshot(queue_depth, self.is_connected())
    }
}

impl Drop for EventPublisher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for EventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPublisher")
            .field("running", &self.is_running())
            .field("enabled", &self.is_enabled())
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}
