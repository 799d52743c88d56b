//! Player engine collaborator trait.
//!
//! The core issues transport commands to an external player and observes
//! its progress through a broadcast subscription. Audio decoding, output
//! and buffering live entirely behind this trait.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::item::PlayableItem;

/// State change reported by the player engine.
#[derive(Clone, Debug)]
pub enum EngineEvent {
    /// The engine advanced to queue position `index` on its own
    /// (natural end-of-track transition).
    AdvancedTo { index: usize },
    /// Playback reached the end of the loaded items.
    Ended,
    /// Play/pause state changed.
    Playing(bool),
}

/// Commands the orchestrator issues to the external player.
///
/// Implementations are expected to be cheap to clone behind an `Arc` and
/// safe to call from multiple tasks. Errors are surfaced as
/// `anyhow::Error` and wrapped at the orchestrator boundary.
#[async_trait]
pub trait PlayerEngine: Send + Sync {
    /// Replaces the engine's loaded items and moves to `start_index`.
    ///
    /// When the item at `start_index` is already the current one the
    /// engine should keep the playback position (seamless reorder);
    /// otherwise it starts the new item from the beginning.
    async fn load(&self, items: &[PlayableItem], start_index: usize) -> anyhow::Result<()>;

    /// Appends items after the currently loaded ones without touching
    /// the playing track.
    async fn append(&self, items: &[PlayableItem]) -> anyhow::Result<()>;

    /// Inserts items at `index` in the engine's window without touching
    /// the playing track.
    async fn insert(&self, index: usize, items: &[PlayableItem]) -> anyhow::Result<()>;

    /// Removes the item at `index` from the engine's window.
    async fn remove(&self, index: usize) -> anyhow::Result<()>;

    /// Moves the item at `from` to position `to` without interrupting
    /// the playing track.
    async fn move_item(&self, from: usize, to: usize) -> anyhow::Result<()>;

    /// Jumps to the item at `index`.
    async fn seek_to(&self, index: usize) -> anyhow::Result<()>;

    async fn play(&self) -> anyhow::Result<()>;

    async fn pause(&self) -> anyhow::Result<()>;

    async fn stop(&self) -> anyhow::Result<()>;

    /// Subscribes to engine state changes.
    fn subscribe(&self) -> broadcast::Receiver<EngineEvent>;
}
