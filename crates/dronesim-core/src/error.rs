//! Error type shared by the simulator crates.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown movement strategy '{0}' (expected 'hover' or 'random-walk')")]
    UnknownStrategy(String),

    #[error("failed to start simulation worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
