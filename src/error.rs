use crate::reconcile::Correction;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The classifier could not tell us what it currently believes.
    #[error("classifier unavailable for {path:?}: {reason}")]
    ClassifierUnavailable { path: PathBuf, reason: String },
    /// A training command was issued but did not succeed.
    #[error("classifier failed to apply {correction} to {path:?}: {reason}")]
    ClassifierFailed {
        path: PathBuf,
        correction: Correction,
        reason: String,
    },
    /// A directory could not be added to the watched tree.
    #[error("failed to watch {path:?}")]
    WatchRegistration {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}
