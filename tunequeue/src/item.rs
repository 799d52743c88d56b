//! Playable item model and catalog-entry conversions.
//!
//! The remote catalog exposes several item shapes (songs, videos, local
//! files). They all funnel into [`PlayableItem`], the single currency of
//! the playback queue. The union is a real sum type with one conversion
//! arm per variant; there is no nullable-field probing to guess what an
//! item is.

use serde::{Deserialize, Serialize};
use tunecatalog::PagedItem;

/// Opaque token enabling "start radio from this item".
///
/// The queue orchestrator never interprets it; it is handed back to the
/// [`RelatedSource`](crate::RelatedSource) collaborator as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceEndpoint(String);

impl SourceEndpoint {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Display metadata attached to a playable item.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_secs: Option<u64>,
    /// Reference to the artwork, resolved by the (out-of-scope) UI layer.
    pub artwork_url: Option<String>,
}

/// One playable entry of the queue.
///
/// Identity is the `id`: two items with the same id are the same track
/// for dedup and click-routing purposes, whatever their metadata says.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayableItem {
    /// Stable identifier, globally unique within a queue.
    pub id: String,
    pub metadata: ItemMetadata,
    /// Radio seed for this item, when the catalog provides one.
    pub source_endpoint: Option<SourceEndpoint>,
}

impl PlayableItem {
    pub fn new(id: impl Into<String>, metadata: ItemMetadata) -> Self {
        Self {
            id: id.into(),
            metadata,
            source_endpoint: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: SourceEndpoint) -> Self {
        self.source_endpoint = Some(endpoint);
        self
    }

    /// Same logical track, regardless of metadata differences.
    pub fn same_track(&self, other: &PlayableItem) -> bool {
        self.id == other.id
    }
}

impl PagedItem for PlayableItem {
    fn key(&self) -> &str {
        &self.id
    }
}

/// A song from the remote catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct SongEntry {
    pub id: String,
    pub title: Option<String>,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub duration_secs: Option<u64>,
    pub artwork_url: Option<String>,
    pub endpoint: Option<SourceEndpoint>,
}

/// A music video from the remote catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoEntry {
    pub id: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub duration_secs: Option<u64>,
    pub thumbnail_url: Option<String>,
    pub endpoint: Option<SourceEndpoint>,
}

/// A track stored on the device, outside the remote catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalEntry {
    pub id: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration_secs: Option<u64>,
}

/// Union of the item shapes that can enter the playback queue.
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogEntry {
    Song(SongEntry),
    Video(VideoEntry),
    Local(LocalEntry),
}

impl CatalogEntry {
    /// Converts the entry into the queue's canonical item type.
    pub fn into_playable(self) -> PlayableItem {
        match self {
            CatalogEntry::Song(song) => PlayableItem {
                id: song.id,
                metadata: ItemMetadata {
                    title: song.title,
                    artist: if song.artists.is_empty() {
                        None
                    } else {
                        Some(song.artists.join(", "))
                    },
                    album: song.album,
                    duration_secs: song.duration_secs,
                    artwork_url: song.artwork_url,
                },
                source_endpoint: song.endpoint,
            },
            CatalogEntry::Video(video) => PlayableItem {
                id: video.id,
                metadata: ItemMetadata {
                    title: video.title,
                    artist: video.author,
                    album: None,
                    duration_secs: video.duration_secs,
                    artwork_url: video.thumbnail_url,
                },
                source_endpoint: video.endpoint,
            },
            CatalogEntry::Local(local) => PlayableItem {
                id: local.id,
                metadata: ItemMetadata {
                    title: local.title,
                    artist: local.artist,
                    album: None,
                    duration_secs: local.duration_secs,
                    artwork_url: None,
                },
                // Local files carry no radio seed.
                source_endpoint: None,
            },
        }
    }
}

impl From<CatalogEntry> for PlayableItem {
    fn from(entry: CatalogEntry) -> Self {
        entry.into_playable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_conversion_joins_artists() {
        let item = CatalogEntry::Song(SongEntry {
            id: "s1".into(),
            title: Some("Song".into()),
            artists: vec!["A".into(), "B".into()],
            album: Some("Album".into()),
            duration_secs: Some(180),
            artwork_url: None,
            endpoint: Some(SourceEndpoint::new("watch?v=s1")),
        })
        .into_playable();

        assert_eq!(item.id, "s1");
        assert_eq!(item.metadata.artist.as_deref(), Some("A, B"));
        assert!(item.source_endpoint.is_some());
    }

    #[test]
    fn local_conversion_never_carries_a_radio_seed() {
        let item = CatalogEntry::Local(LocalEntry {
            id: "local:42".into(),
            title: Some("Ripped".into()),
            artist: None,
            duration_secs: None,
        })
        .into_playable();

        assert!(item.source_endpoint.is_none());
    }

    #[test]
    fn identity_is_the_id() {
        let a = PlayableItem::new("x", ItemMetadata::default());
        let mut b = PlayableItem::new("x", ItemMetadata::default());
        b.metadata.title = Some("other".into());

        assert!(a.same_track(&b));
        assert_ne!(a, b);
    }
}
