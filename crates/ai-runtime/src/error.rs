//! Error types surfaced by the AI runtime.
//!
//! Task execution failures (`strategy_core::TaskError`) are handled inside
//! the turn loop; these errors are for everything around it.

use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The priority rule file is required at startup; without it no goal can
    /// be scored and the engine refuses to serve turns.
    #[error("priority configuration missing at {}", path.display())]
    ConfigMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("priority configuration is invalid")]
    ConfigInvalid(#[from] fuzzy_logic::FuzzyError),

    #[error("worker command channel closed")]
    CommandChannelClosed,

    #[error("worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("turn was interrupted before completion")]
    Interrupted,
}
