//! Error types for the tour scheduler.
//!
//! None of these are fatal to a running tour: every error path degrades
//! to "keep the current view and retry at the next natural boundary".

use thiserror::Error;
use wanderlens_world::WorldError;

/// Errors surfaced by the scheduler.
#[derive(Debug, Error)]
pub enum TourError {
    /// Every non-gate room is filtered out and even the history-reset
    /// fallback found nothing to show
    #[error("no eligible destination room in the active region")]
    NoDestinationAvailable,

    /// A command needed a loaded region and the world is still loading
    #[error("world not ready")]
    WorldNotReady,

    /// A host asked for a region the scheduler cannot resolve
    #[error("invalid region request: {0}")]
    InvalidRegionRequest(String),

    /// A host named a room that is not in the active region's room list
    #[error("stale room reference: {0}")]
    StaleRoomReference(String),

    /// The world model reported a failure
    #[error(transparent)]
    World(#[from] WorldError),
}
