//! # TuneQueue
//!
//! Orchestrateur de file de lecture: la couche qui décide de « ce qui
//! joue ensuite » pour un lecteur de musique en continu.
//!
//! Three cooperating pieces:
//!   - [`Queue`]: the pure in-memory list of items plus a cursor, mutated
//!     only through documented operations behind a FIFO mutex.
//!   - [`PlaybackController`]: the orchestrator that applies mutations,
//!     drives the [`PlayerEngine`] transport and broadcasts
//!     [`QueueEvent`]s to observers.
//!   - Radio and sleep-timer sessions: background behaviours identified
//!     by generations, so that a stale fetch or a cancelled timer can
//!     never mutate the queue after being superseded.
//!
//! The controller depends on two collaborator traits, [`PlayerEngine`]
//! and [`RelatedSource`]; audio output and remote catalog access live
//! entirely behind them.

mod config;
mod controller;
mod engine;
mod error;
mod events;
mod item;
mod queue;
mod radio;
mod sleep_timer;
mod snapshot;

pub use config::PlayerConfig;
pub use controller::PlaybackController;
pub use engine::{EngineEvent, PlayerEngine};
pub use error::{Error, Result};
pub use events::{QueueEvent, QueueEventEnvelope};
pub use item::{
    CatalogEntry, ItemMetadata, LocalEntry, PlayableItem, SongEntry, SourceEndpoint, VideoEntry,
};
pub use queue::{Queue, RemovalEffect};
pub use radio::RelatedSource;
pub use sleep_timer::SleepTimer;
pub use snapshot::QueueSnapshot;
