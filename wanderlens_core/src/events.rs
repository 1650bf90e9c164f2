//! Events emitted by the scheduler toward its host.

use serde::{Deserialize, Serialize};
use wanderlens_world::RegionCode;

/// Something the host may want to react to (HUD updates, music cues,
/// metrics). Returned from [`crate::TourController::on_tick`] in firing
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TourEvent {
    /// The camera finished arriving in a different room
    RoomChanged { room: String },

    /// A region finished loading and the tour resumed inside it
    RegionActivated { region: RegionCode, reload: bool },

    /// The scheduler asked the world to load a different region
    ReloadRequested { region: RegionCode },

    /// The world-cycle countdown armed its pre-storm delay
    CountdownArmed { delay_secs: f32 },

    /// Every region in the campaign has been visited
    SweepCompleted,
}
