//! Types d'erreurs pour tunecatalog

/// Erreurs du moteur de pagination
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The page provider (remote catalog call) failed.
    #[error("Page provider error: {0}")]
    Provider(#[source] anyhow::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Type Result spécialisé pour tunecatalog
pub type Result<T> = std::result::Result<T, Error>;
