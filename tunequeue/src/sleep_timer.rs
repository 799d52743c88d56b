//! Cancellable one-shot sleep timer.
//!
//! Replacing or cancelling the timer must be atomic with respect to a
//! concurrently firing callback: a scheduled task captures the generation
//! it was armed with and re-checks it, under the same lock `set`/`cancel`
//! mutate, before acting. A cancelled or superseded timer therefore never
//! stops playback, even when the scheduler already woke it up.
//!
//! Scheduling failures (process death) are not recovered here;
//! persistence of an armed timer across restarts is a collaborator
//! responsibility.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

struct TimerState {
    generation: u64,
    fire_at: Option<Instant>,
}

/// One-shot delayed "stop playback" action.
pub struct SleepTimer {
    state: Arc<Mutex<TimerState>>,
    on_fire: Arc<dyn Fn() + Send + Sync>,
}

impl SleepTimer {
    /// `on_fire` runs at most once per armed timer, and only when the
    /// timer is still current at its deadline.
    pub fn new(on_fire: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            state: Arc::new(Mutex::new(TimerState {
                generation: 0,
                fire_at: None,
            })),
            on_fire: Arc::new(on_fire),
        }
    }

    /// Arms (or re-arms) the timer. Any previously scheduled firing is
    /// invalidated by the generation bump.
    pub fn set(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        let generation = {
            let mut state = self.state.lock().unwrap();
            state.generation += 1;
            state.fire_at = Some(deadline);
            state.generation
        };
        debug!(generation, ?duration, "sleep timer armed");

        let state = Arc::clone(&self.state);
        let on_fire = Arc::clone(&self.on_fire);
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;

            // Generation check and state clear happen under the lock so a
            // racing cancel() either wins entirely or loses entirely.
            let fire = {
                let mut state = state.lock().unwrap();
                if state.generation == generation {
                    state.fire_at = None;
                    true
                } else {
                    false
                }
            };

            if fire {
                debug!(generation, "sleep timer fired");
                on_fire();
            } else {
                debug!(generation, "stale sleep timer discarded");
            }
        });
    }

    /// Disarms the timer. A firing callback racing with this call is
    /// suppressed by the generation bump.
    pub fn cancel(&self) {
        let mut state = self.state.lock().unwrap();
        state.generation += 1;
        state.fire_at = None;
    }

    /// Deadline of the armed timer, if any (for UI display).
    pub fn fire_at(&self) -> Option<Instant> {
        self.state.lock().unwrap().fire_at
    }

    pub fn is_armed(&self) -> bool {
        self.fire_at().is_some()
    }
}
