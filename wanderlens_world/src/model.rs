//! Core world-model trait for the tour scheduler.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::region::RegionCode;

/// Name prefix marking inter-region connector corridors.
///
/// Gate rooms exist so creatures and players can cross between regions;
/// they are never worth pointing a camera at.
pub const GATE_PREFIX: &str = "GATE_";

/// What the world reports about a room before it is realized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStub {
    /// Room name, unique within the loaded region
    pub name: String,

    /// True for inter-region connector corridors
    pub gate: bool,
}

impl RoomStub {
    /// Builds a stub from a raw room name.
    ///
    /// Names carrying the [`GATE_PREFIX`] are marked as connectors.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let gate = name.starts_with(GATE_PREFIX);
        Self { name, gate }
    }
}

/// Snapshot of the world's cycle clock.
///
/// The cycle is the world's own reset rhythm (the storm). The scheduler
/// only ever reads it; the world advances it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CyclePhase {
    /// Seconds elapsed in the current cycle
    pub timer_secs: f32,

    /// Total cycle length in seconds (<= 0 means the world has no cycle)
    pub length_secs: f32,
}

impl CyclePhase {
    /// Creates a cycle snapshot.
    pub fn new(timer_secs: f32, length_secs: f32) -> Self {
        Self {
            timer_secs,
            length_secs,
        }
    }

    /// Normalized progress through the cycle, or `None` when the world
    /// has no cycle. Clamped to `[0, 1]` so threshold checks stay sane
    /// even if the timer briefly overruns the nominal length.
    pub fn progress(&self) -> Option<f32> {
        if self.length_secs <= 0.0 {
            None
        } else {
            Some((self.timer_secs / self.length_secs).clamp(0.0, 1.0))
        }
    }
}

/// The central interface between the scheduler and its host world.
///
/// # Implementations
///
/// - **Production**: an adapter over the live game process
/// - **Test**: [`crate::StaticWorld`] - a deterministic in-memory world
///
/// # Contract
///
/// - `rooms()` is empty while no region is loaded.
/// - `realize_room` is idempotent: realizing an already-realized room
///   returns its anchors again.
/// - `abstractize_room` on an unknown or already-released room is a no-op.
/// - `request_region` may complete asynchronously; callers poll
///   `loaded_region()` until the requested code appears.
pub trait WorldModel {
    /// The region currently loaded, if any.
    fn loaded_region(&self) -> Option<&RegionCode>;

    /// Room stubs for the loaded region (empty while loading).
    fn rooms(&self) -> &[RoomStub];

    /// The world's preferred entry room for the loaded region, if it has one.
    fn start_room(&self) -> Option<&str>;

    /// Loads a room into memory and returns its camera anchors.
    ///
    /// A realized room may legitimately have zero anchors; the scheduler
    /// then parks the camera where it already is.
    fn realize_room(&mut self, name: &str) -> Result<Vec<Vector2<f32>>, WorldError>;

    /// Releases a room the camera has left.
    fn abstractize_room(&mut self, name: &str);

    /// Current cycle clock.
    fn cycle(&self) -> CyclePhase;

    /// Current camera position.
    fn camera_position(&self) -> Vector2<f32>;

    /// Moves the camera.
    fn set_camera_position(&mut self, position: Vector2<f32>);

    /// Asks the world to load a different region.
    fn request_region(&mut self, region: &RegionCode);
}
