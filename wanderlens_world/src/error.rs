//! Error types for the world abstraction layer.

use thiserror::Error;

/// Errors reported by a world model.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The named room does not exist in the loaded region
    #[error("room not found: {0}")]
    RoomNotFound(String),

    /// An operation needed a loaded region and none is present
    #[error("no region loaded")]
    RegionNotLoaded,

    /// The room exists but could not be brought into memory
    #[error("failed to realize room {room}: {reason}")]
    RealizeFailed { room: String, reason: String },
}

impl WorldError {
    /// Creates a room-not-found error.
    pub fn room_not_found(name: impl Into<String>) -> Self {
        Self::RoomNotFound(name.into())
    }

    /// Creates a realize-failed error.
    pub fn realize_failed(room: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RealizeFailed {
            room: room.into(),
            reason: reason.into(),
        }
    }
}
