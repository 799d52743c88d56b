//! # tunecatalog - Moteur de pagination incrémentale de catalogue
//!
//! Cette crate fournit le moteur qui fusionne des réponses paginées
//! (curseur de continuation opaque) d'un service de catalogue distant en
//! une collection logique unique :
//! - Fusion pure de pages ([`merge`]) sans dédoublonnage
//! - Aplatissement complet avec borne de profondeur ([`fetch_all`])
//! - Chargement incrémental à la demande ([`PageFeed`]) pour le scroll infini
//!
//! # Architecture
//!
//! - **CatalogPage** : une page d'items + curseur de continuation optionnel
//! - **merge** : primitive pure de fusion (ordre préservé, curseur adopté)
//! - **fetch_all** : boucle fetch-et-fusionne avec politique d'arrêt
//!   explicite ([`StopReason`])
//! - **PageFeed** : état accumulé d'une vue, au plus un fetch en vol
//!
//! The engine is transport-agnostic: providers are plain async callbacks
//! returning `anyhow::Result<CatalogPage<T>>`, so the remote catalog's
//! authentication and wire format never leak in here.
//!
//! # Exemple d'utilisation
//!
//! ```no_run
//! use tunecatalog::{fetch_all, CatalogPage, Continuation, FetchAllOptions, PagedItem};
//!
//! #[derive(Clone)]
//! struct Track { id: String }
//!
//! impl PagedItem for Track {
//!     fn key(&self) -> &str { &self.id }
//! }
//!
//! async fn fetch_page(cursor: Continuation) -> anyhow::Result<CatalogPage<Track>> {
//!     // call the remote catalog here
//!     unimplemented!()
//! }
//!
//! # async fn demo(first_page: CatalogPage<Track>) {
//! let flattened = fetch_all(first_page, fetch_page, FetchAllOptions::default()).await;
//! println!("{} tracks, complete: {}", flattened.page.item_count(), flattened.is_complete());
//! # }
//! ```

mod error;
mod feed;
mod fetcher;
mod merge;
mod page;

// Réexports publics
pub use error::{Error, Result};
pub use feed::PageFeed;
pub use fetcher::{fetch_all, FetchAllOptions, Flattened, StopReason};
pub use merge::merge;
pub use page::{CatalogPage, Continuation, PagedItem};
