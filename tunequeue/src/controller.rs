//! Playback controller: the component that owns "what plays next".
//!
//! One controller is constructed per player-engine lifetime and handed to
//! callers explicitly; nothing here is looked up through ambient or
//! global state. The controller owns the single piece of mutable shared
//! state of the core (the [`Queue`]) behind a FIFO-fair async mutex, so
//! concurrent mutation requests are applied strictly in arrival order
//! and are never merged or reordered relative to each other.
//!
//! RadioSession and SleepTimer never reach into queue internals: they go
//! through the same documented operations as everyone else.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};
use tunecatalog::Continuation;

use crate::config::PlayerConfig;
use crate::engine::{EngineEvent, PlayerEngine};
use crate::error::{Error, Result};
use crate::events::{QueueEvent, QueueEventEnvelope};
use crate::item::{PlayableItem, SourceEndpoint};
use crate::queue::{Queue, RemovalEffect};
use crate::radio::{RadioState, RelatedSource};
use crate::sleep_timer::SleepTimer;
use crate::snapshot::QueueSnapshot;

struct ControllerInner {
    config: PlayerConfig,
    queue: Mutex<Queue>,
    engine: Arc<dyn PlayerEngine>,
    related: Arc<dyn RelatedSource>,
    radio: RadioState,
    sleep: SleepTimer,
    event_tx: broadcast::Sender<QueueEventEnvelope>,
}

impl ControllerInner {
    fn emit(&self, event: QueueEvent) {
        // Diffusion ignorée si aucun abonné.
        let _ = self.event_tx.send(QueueEventEnvelope::now(event));
    }

    /// Full stop: radio session, transport, event. The queue contents
    /// are kept so playback can resume from the same place.
    async fn stop_playback(&self, event: QueueEvent) {
        if self.radio.is_active() {
            let generation = self.radio.stop();
            self.emit(QueueEvent::RadioStopped { generation });
        }
        if let Err(e) = self.engine.stop().await {
            warn!(error = %e, "engine stop failed");
        }
        self.emit(event);
    }
}

/// Orchestrateur central de la file de lecture.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tunequeue::{PlaybackController, PlayerConfig};
/// # use tunequeue::{PlayerEngine, RelatedSource};
///
/// # fn demo(engine: Arc<dyn PlayerEngine>, related: Arc<dyn RelatedSource>) {
/// let controller = PlaybackController::new(engine, related, PlayerConfig::default());
/// let mut events = controller.subscribe_events();
/// # }
/// ```
pub struct PlaybackController {
    inner: Arc<ControllerInner>,
}

impl Clone for PlaybackController {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl PlaybackController {
    /// Builds the controller around its two collaborators. Spawns the
    /// engine-event listener that tracks natural track transitions.
    pub fn new(
        engine: Arc<dyn PlayerEngine>,
        related: Arc<dyn RelatedSource>,
        config: PlayerConfig,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_capacity.max(1));

        let inner = Arc::new_cyclic(|weak: &Weak<ControllerInner>| {
            let weak = weak.clone();
            let sleep = SleepTimer::new(move || {
                if let Some(inner) = weak.upgrade() {
                    tokio::spawn(async move {
                        inner.stop_playback(QueueEvent::SleepTimerFired).await;
                    });
                }
            });

            ControllerInner {
                config,
                queue: Mutex::new(Queue::new()),
                engine,
                related,
                radio: RadioState::default(),
                sleep,
                event_tx,
            }
        });

        spawn_engine_listener(Arc::clone(&inner));
        Self { inner }
    }

    /// Subscribes to the queue event stream. Each observer gets its own
    /// receiver; a slow observer never blocks the core.
    pub fn subscribe_events(&self) -> broadcast::Receiver<QueueEventEnvelope> {
        self.inner.event_tx.subscribe()
    }

    // ------------------------------------------------------------------
    // Forced playback (queue replacement)
    // ------------------------------------------------------------------

    /// Atomically replaces the queue and starts playback from the first
    /// item. Any active radio session is stopped first: a hard replace
    /// invalidates the radio context.
    pub async fn force_play_from_beginning(&self, items: Vec<PlayableItem>) -> Result<()> {
        self.replace_and_play(items, 0).await
    }

    /// Like [`force_play_from_beginning`](Self::force_play_from_beginning)
    /// but starting at `index` ("play this song from this list").
    pub async fn force_play_at(&self, items: Vec<PlayableItem>, index: usize) -> Result<()> {
        if index >= items.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: items.len(),
            });
        }
        self.replace_and_play(items, index).await
    }

    /// Replaces the queue with a single item and plays it.
    pub async fn force_play(&self, item: PlayableItem) -> Result<()> {
        self.replace_and_play(vec![item], 0).await
    }

    async fn replace_and_play(&self, items: Vec<PlayableItem>, index: usize) -> Result<()> {
        self.stop_radio();

        if items.is_empty() {
            return self.clear().await;
        }

        let mut queue = self.inner.queue.lock().await;
        queue.replace(items, index);
        let index = queue.current_index().unwrap_or(0);
        let len = queue.len();

        self.inner
            .engine
            .load(queue.items(), index)
            .await
            .map_err(Error::Engine)?;
        self.inner.engine.play().await.map_err(Error::Engine)?;
        drop(queue);

        self.inner.emit(QueueEvent::QueueReplaced { len, index });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Non-interrupting mutations
    // ------------------------------------------------------------------

    /// Appends items at the end of the queue; the cursor and the playing
    /// track are untouched. An empty batch is a silent no-op.
    pub async fn enqueue(&self, items: Vec<PlayableItem>) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        let count = items.len();
        let mut queue = self.inner.queue.lock().await;
        // Engine first: a rejected append leaves the queue untouched and
        // emits nothing, so engine, queue and observers stay in agreement.
        self.inner
            .engine
            .append(&items)
            .await
            .map_err(Error::Engine)?;
        queue.append(items);
        drop(queue);

        self.inner.emit(QueueEvent::Enqueued { count });
        Ok(())
    }

    /// Inserts items at `index`, shifting later items down; the cursor
    /// keeps pointing at the playing track. `index == len` appends.
    pub async fn insert_at(&self, index: usize, items: Vec<PlayableItem>) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        let count = items.len();
        let mut queue = self.inner.queue.lock().await;
        if index > queue.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: queue.len(),
            });
        }
        self.inner
            .engine
            .insert(index, &items)
            .await
            .map_err(Error::Engine)?;
        queue.insert_at(index, items)?;
        drop(queue);

        self.inner.emit(QueueEvent::Inserted { index, count });
        Ok(())
    }

    /// Reorders one item; the cursor follows the "now playing" track.
    pub async fn move_item(&self, from: usize, to: usize) -> Result<()> {
        let mut queue = self.inner.queue.lock().await;
        queue.move_item(from, to)?;
        self.inner
            .engine
            .move_item(from, to)
            .await
            .map_err(Error::Engine)?;
        drop(queue);

        self.inner.emit(QueueEvent::ItemMoved { from, to });
        Ok(())
    }

    /// Removes the item at `index`. Removing the current item advances
    /// playback to the next one when it exists; removing the last
    /// remaining item stops the transport.
    pub async fn remove_at(&self, index: usize) -> Result<()> {
        let mut queue = self.inner.queue.lock().await;
        let effect = queue.remove_at(index)?;
        self.inner
            .engine
            .remove(index)
            .await
            .map_err(Error::Engine)?;

        match effect {
            RemovalEffect::None => {}
            RemovalEffect::AdvancedToNext => {
                if let Some(current) = queue.current_index() {
                    self.inner
                        .engine
                        .seek_to(current)
                        .await
                        .map_err(Error::Engine)?;
                }
            }
            RemovalEffect::PlaybackStopped | RemovalEffect::Emptied => {
                self.inner.engine.stop().await.map_err(Error::Engine)?;
            }
        }
        drop(queue);

        self.inner.emit(QueueEvent::ItemRemoved { index });
        Ok(())
    }

    /// Shuffles the queue, keeping the currently-playing item first.
    pub async fn shuffle(&self) -> Result<()> {
        let mut queue = self.inner.queue.lock().await;
        if queue.is_empty() {
            return Ok(());
        }
        queue.shuffle(&mut rand::rng());
        let index = queue.current_index().unwrap_or(0);
        self.inner
            .engine
            .load(queue.items(), index)
            .await
            .map_err(Error::Engine)?;
        drop(queue);

        self.inner.emit(QueueEvent::Shuffled);
        Ok(())
    }

    /// Empties the queue and stops everything attached to it.
    pub async fn clear(&self) -> Result<()> {
        self.stop_radio();

        let mut queue = self.inner.queue.lock().await;
        queue.clear();
        self.inner.engine.stop().await.map_err(Error::Engine)?;
        drop(queue);

        self.inner.emit(QueueEvent::Cleared);
        Ok(())
    }

    /// Stops playback (and the radio session) without touching the
    /// queue contents.
    pub async fn stop(&self) {
        self.inner.stop_playback(QueueEvent::PlaybackStopped).await;
    }

    // ------------------------------------------------------------------
    // Radio session
    // ------------------------------------------------------------------

    /// Starts a radio session seeded from `seed`, cancelling any prior
    /// session (at most one is ever active). Related items are fetched
    /// in the background and appended through the regular enqueue path.
    pub fn start_radio(&self, seed: SourceEndpoint) {
        let generation = self.inner.radio.begin();
        info!(generation, seed = seed.as_str(), "radio session started");
        self.inner.emit(QueueEvent::RadioStarted {
            generation,
            seed: seed.clone(),
        });

        tokio::spawn(radio_loop(Arc::clone(&self.inner), seed, generation));
    }

    /// Marks the radio session inactive. In-flight fetches are not
    /// cancelled; their results are discarded on completion.
    pub fn stop_radio(&self) {
        if self.inner.radio.is_active() {
            let generation = self.inner.radio.stop();
            info!(generation, "radio session stopped");
            self.inner.emit(QueueEvent::RadioStopped { generation });
        }
    }

    /// `true` while the active radio session is fetching its first page
    /// (UI "radio is loading" affordance).
    pub fn is_radio_loading(&self) -> bool {
        self.inner.radio.is_loading()
    }

    pub fn is_radio_active(&self) -> bool {
        self.inner.radio.is_active()
    }

    // ------------------------------------------------------------------
    // Sleep timer
    // ------------------------------------------------------------------

    /// Arms the sleep timer: playback stops after `duration`. Re-arming
    /// replaces the previous deadline atomically.
    pub fn set_sleep_timer(&self, duration: Duration) {
        self.inner.sleep.set(duration);
        self.inner.emit(QueueEvent::SleepTimerSet);
    }

    /// Disarms the sleep timer; a concurrently firing callback is
    /// suppressed.
    pub fn cancel_sleep_timer(&self) {
        self.inner.sleep.cancel();
        self.inner.emit(QueueEvent::SleepTimerCancelled);
    }

    pub fn sleep_timer_fire_at(&self) -> Option<tokio::time::Instant> {
        self.inner.sleep.fire_at()
    }

    // ------------------------------------------------------------------
    // Observation, persistence, derived views
    // ------------------------------------------------------------------

    /// Immutable snapshot of the queue for observers and persistence.
    pub async fn snapshot(&self) -> QueueSnapshot {
        self.inner.queue.lock().await.snapshot()
    }

    /// Restores a previously snapshotted queue and loads it into the
    /// engine without starting playback.
    pub async fn restore(&self, snapshot: QueueSnapshot) -> Result<()> {
        self.stop_radio();

        let mut queue = self.inner.queue.lock().await;
        queue.restore(snapshot);
        let len = queue.len();
        let index = queue.current_index().unwrap_or(0);
        if len > 0 {
            self.inner
                .engine
                .load(queue.items(), index)
                .await
                .map_err(Error::Engine)?;
        }
        drop(queue);

        self.inner.emit(QueueEvent::QueueReplaced { len, index });
        Ok(())
    }

    /// Derived "offline items" view: queue items fully present in the
    /// local media cache, as reported by the external predicate.
    pub async fn offline_items<F>(&self, is_fully_cached: F) -> Vec<PlayableItem>
    where
        F: Fn(&str) -> bool,
    {
        let queue = self.inner.queue.lock().await;
        queue
            .items()
            .iter()
            .filter(|item| is_fully_cached(&item.id))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.queue.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.queue.lock().await.is_empty()
    }

    pub async fn current_item(&self) -> Option<PlayableItem> {
        self.inner.queue.lock().await.current_item().cloned()
    }

    pub async fn current_index(&self) -> Option<usize> {
        self.inner.queue.lock().await.current_index()
    }
}

/// Tracks natural engine transitions (end-of-track advance) so the queue
/// cursor stays in sync and a paused radio session refills.
fn spawn_engine_listener(inner: Arc<ControllerInner>) {
    // Subscribe before spawning so no event emitted right after
    // construction can slip past the listener.
    let mut rx = inner.engine.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(EngineEvent::AdvancedTo { index }) => {
                    let mut queue = inner.queue.lock().await;
                    match queue.set_index(index) {
                        Ok(()) => {
                            drop(queue);
                            inner.emit(QueueEvent::IndexChanged { index: Some(index) });
                            inner.radio.refill.notify_waiters();
                        }
                        Err(e) => {
                            warn!(index, error = %e, "engine advanced outside the queue");
                        }
                    }
                }
                Ok(EngineEvent::Ended) => {
                    // Keep the cursor and the emitted value in agreement.
                    let mut queue = inner.queue.lock().await;
                    queue.clear_cursor();
                    drop(queue);
                    inner.emit(QueueEvent::IndexChanged { index: None });
                }
                Ok(EngineEvent::Playing(_)) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "engine event stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Background fetch-and-append loop of one radio session.
///
/// Every application point re-checks the captured generation; a fetch
/// completing under a stale generation discards its result silently
/// (expected concurrent behaviour, not a fault).
async fn radio_loop(inner: Arc<ControllerInner>, seed: SourceEndpoint, generation: u64) {
    let mut continuation: Option<Continuation> = None;
    let mut pages = 0usize;

    loop {
        if !inner.radio.is_current(generation) {
            debug!(generation, "radio session superseded before fetch");
            break;
        }

        let fetched = inner
            .related
            .related_page(&seed, continuation.as_ref())
            .await;

        let page = match fetched {
            Ok(page) => page,
            Err(e) => {
                // Recovered here: radio errors never propagate upwards.
                warn!(generation, error = %e, "radio page fetch failed");
                break;
            }
        };

        // Application point: the queue is only touched while the
        // generation is still current, checked under the queue lock.
        let appended = {
            let mut queue = inner.queue.lock().await;
            if !inner.radio.is_current(generation) {
                debug!(generation, "stale radio page discarded");
                None
            } else {
                let items = page.items.unwrap_or_default();
                if items.is_empty() {
                    Some(0)
                } else {
                    queue.append(items.clone());
                    if let Err(e) = inner.engine.append(&items).await {
                        warn!(generation, error = %e, "engine append failed");
                    }
                    Some(items.len())
                }
            }
        };

        let Some(count) = appended else { break };
        inner.radio.set_loading(false);

        if count == 0 {
            debug!(generation, "radio source exhausted");
            break;
        }
        inner.emit(QueueEvent::RadioAppended { count });

        pages += 1;
        continuation = page.continuation;
        if continuation.is_none() || pages >= inner.config.radio_max_pages {
            break;
        }

        // Idle until the upcoming buffer runs low, then fetch more.
        loop {
            let notified = inner.radio.refill.notified();
            tokio::pin!(notified);
            // Register for wakeups before sampling: `notify_waiters` only
            // reaches enabled futures, so a notification landing between
            // the checks and the await would otherwise be lost.
            notified.as_mut().enable();
            if !inner.radio.is_current(generation) {
                return;
            }
            let upcoming = inner.queue.lock().await.upcoming_len();
            if upcoming < inner.config.radio_lookahead {
                break;
            }
            notified.await;
        }
    }

    if inner.radio.is_current(generation) {
        inner.radio.set_loading(false);
    }
}
