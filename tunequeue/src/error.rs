//! Types d'erreurs pour tunequeue

/// Erreurs de l'orchestrateur de lecture
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Queue index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The external player engine rejected a command.
    #[error("Player engine error: {0}")]
    Engine(#[source] anyhow::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Type Result spécialisé pour tunequeue
pub type Result<T> = std::result::Result<T, Error>;
