//! Configuration du contrôleur de lecture.

use serde::{Deserialize, Serialize};

/// Tuning of the playback controller.
///
/// Injected at construction; there is no global configuration lookup.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Radio keeps at least this many upcoming items buffered before it
    /// pauses fetching (recommandé: 5-15).
    pub radio_lookahead: usize,
    /// Hard cap on related-item pages fetched by one radio session.
    pub radio_max_pages: usize,
    /// Capacity of the queue-event broadcast channel.
    pub event_capacity: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radio_lookahead: 10,
            radio_max_pages: 5,
            event_capacity: 256,
        }
    }
}
