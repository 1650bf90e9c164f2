//! Tour scenarios for deterministic harness runs.

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// TOUR-001: Hours of virtual touring under default settings
    LongHaul,

    /// TOUR-002: Storm-driven region rotation over many short cycles
    StormChaser,

    /// TOUR-003: Fixed-duration rotation until the campaign sweep
    /// completes and resets
    GrandSweep,

    /// TOUR-004: Sequential camera mode visits every anchor of every
    /// room, in order
    GalleryWalk,

    /// TOUR-005: Skip spam - force_immediate_change pressed constantly
    RestlessEye,

    /// TOUR-006: Slow region loads, tour suspends and resumes cleanly
    SlowBoat,

    /// TOUR-007: Room lock holds through a full storm
    LockedRoom,

    /// TOUR-008: Same seed replays the exact same tour
    ReplayTwins,

    /// TOUR-009: Gate-heavy region - corridors never become destinations
    GateMaze,

    /// TOUR-010: hold_until_peak rotation fires right at the storm peak
    PeakHold,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::LongHaul,
            ScenarioId::StormChaser,
            ScenarioId::GrandSweep,
            ScenarioId::GalleryWalk,
            ScenarioId::RestlessEye,
            ScenarioId::SlowBoat,
            ScenarioId::LockedRoom,
            ScenarioId::ReplayTwins,
            ScenarioId::GateMaze,
            ScenarioId::PeakHold,
        ]
    }

    /// Returns the quick set (everything except the long soak).
    pub fn standard() -> Vec<ScenarioId> {
        vec![
            ScenarioId::StormChaser,
            ScenarioId::GrandSweep,
            ScenarioId::GalleryWalk,
            ScenarioId::RestlessEye,
            ScenarioId::SlowBoat,
            ScenarioId::LockedRoom,
            ScenarioId::ReplayTwins,
            ScenarioId::GateMaze,
            ScenarioId::PeakHold,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::LongHaul => "long_haul",
            ScenarioId::StormChaser => "storm_chaser",
            ScenarioId::GrandSweep => "grand_sweep",
            ScenarioId::GalleryWalk => "gallery_walk",
            ScenarioId::RestlessEye => "restless_eye",
            ScenarioId::SlowBoat => "slow_boat",
            ScenarioId::LockedRoom => "locked_room",
            ScenarioId::ReplayTwins => "replay_twins",
            ScenarioId::GateMaze => "gate_maze",
            ScenarioId::PeakHold => "peak_hold",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::LongHaul => "Hours of touring: no gates, no stalls, no panics",
            ScenarioId::StormChaser => "Short storm cycles: countdown arms once per cycle, rotation fires",
            ScenarioId::GrandSweep => "Fixed rotation until every region is visited, then campaign reset",
            ScenarioId::GalleryWalk => "Sequential mode walks each room's anchors in order, all of them",
            ScenarioId::RestlessEye => "force_immediate_change hammered: a new view every call",
            ScenarioId::SlowBoat => "3-second region loads: tour suspends, resumes, never double-fires",
            ScenarioId::LockedRoom => "Room lock held through a storm: nothing moves until unlocked",
            ScenarioId::ReplayTwins => "Two runs, one seed, identical event streams",
            ScenarioId::GateMaze => "More gates than rooms: corridors stay off-camera, history fallback engages",
            ScenarioId::PeakHold => "hold_until_peak: no arming delay, rotation lands right at the peak",
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "long_haul" | "longhaul" | "tour-001" => Ok(ScenarioId::LongHaul),
            "storm_chaser" | "stormchaser" | "tour-002" => Ok(ScenarioId::StormChaser),
            "grand_sweep" | "grandsweep" | "tour-003" => Ok(ScenarioId::GrandSweep),
            "gallery_walk" | "gallerywalk" | "tour-004" => Ok(ScenarioId::GalleryWalk),
            "restless_eye" | "restlesseye" | "tour-005" => Ok(ScenarioId::RestlessEye),
            "slow_boat" | "slowboat" | "tour-006" => Ok(ScenarioId::SlowBoat),
            "locked_room" | "lockedroom" | "tour-007" => Ok(ScenarioId::LockedRoom),
            "replay_twins" | "replaytwins" | "tour-008" => Ok(ScenarioId::ReplayTwins),
            "gate_maze" | "gatemaze" | "tour-009" => Ok(ScenarioId::GateMaze),
            "peak_hold" | "peakhold" | "tour-010" => Ok(ScenarioId::PeakHold),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for scenario in ScenarioId::all() {
            assert_eq!(scenario.name().parse::<ScenarioId>(), Ok(scenario));
        }
    }

    #[test]
    fn test_standard_is_all_minus_soak() {
        assert_eq!(ScenarioId::standard().len(), ScenarioId::all().len() - 1);
        assert!(!ScenarioId::standard().contains(&ScenarioId::LongHaul));
    }
}
