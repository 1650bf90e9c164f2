//! Scheduler configuration.

use serde::{Deserialize, Serialize};

use crate::selector::CameraMode;

/// How long the camera rests at an anchor (default: 15s, clamped 5-60)
pub const DEFAULT_DWELL_SECS: f32 = 15.0;
pub const MIN_DWELL_SECS: f32 = 5.0;
pub const MAX_DWELL_SECS: f32 = 60.0;

/// How long a camera glide takes (default: 5s, clamped 1-15)
pub const DEFAULT_TRANSITION_SECS: f32 = 5.0;
pub const MIN_TRANSITION_SECS: f32 = 1.0;
pub const MAX_TRANSITION_SECS: f32 = 15.0;

/// Fixed region rotation period (default: 300s, clamped 60-1800 in 60s steps)
pub const DEFAULT_REGION_SECS: f32 = 300.0;
pub const MIN_REGION_SECS: f32 = 60.0;
pub const MAX_REGION_SECS: f32 = 1800.0;
pub const REGION_SECS_STEP: f32 = 60.0;

/// Cycle progress at which the pre-storm countdown arms (default: 0.85)
pub const DEFAULT_CYCLE_THRESHOLD: f32 = 0.85;

/// Countdown delay bounds in seconds (default: uniform in [60, 180])
pub const DEFAULT_MIN_DELAY_SECS: f32 = 60.0;
pub const DEFAULT_MAX_DELAY_SECS: f32 = 180.0;

/// Rooms remembered before a room may repeat (default: 10)
pub const DEFAULT_ROOM_HISTORY: usize = 10;

/// What drives automatic region rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RotationTrigger {
    /// Rotate after the active region has been on screen this long
    FixedDuration { secs: f32 },

    /// Rotate ahead of the world's own cycle: once progress crosses
    /// `threshold`, wait a random delay in `[min_delay_secs,
    /// max_delay_secs]` and then rotate. With `hold_until_peak` the
    /// random delay is skipped and rotation fires right at the peak.
    WorldCycle {
        threshold: f32,
        min_delay_secs: f32,
        max_delay_secs: f32,
        hold_until_peak: bool,
    },
}

impl Default for RotationTrigger {
    fn default() -> Self {
        Self::WorldCycle {
            threshold: DEFAULT_CYCLE_THRESHOLD,
            min_delay_secs: DEFAULT_MIN_DELAY_SECS,
            max_delay_secs: DEFAULT_MAX_DELAY_SECS,
            hold_until_peak: false,
        }
    }
}

/// Configuration for a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourConfig {
    /// Seconds the camera rests at each anchor
    pub dwell_secs: f32,

    /// Seconds a camera glide takes
    pub transition_secs: f32,

    /// How anchors are walked within a room
    pub camera_mode: CameraMode,

    /// Include the expansion content set in the campaign
    pub include_expansion: bool,

    /// Rooms remembered before a room may repeat (0 disables the history)
    pub room_history_len: usize,

    /// What drives automatic region rotation
    pub rotation: RotationTrigger,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            dwell_secs: DEFAULT_DWELL_SECS,
            transition_secs: DEFAULT_TRANSITION_SECS,
            camera_mode: CameraMode::RandomExploration,
            include_expansion: true,
            room_history_len: DEFAULT_ROOM_HISTORY,
            rotation: RotationTrigger::default(),
        }
    }
}

impl TourConfig {
    /// Returns a copy with every field forced into its legal range.
    ///
    /// Out-of-range values never panic; hosts hand us whatever their
    /// settings UI produced and we clamp.
    pub fn sanitized(mut self) -> Self {
        self.dwell_secs = self.dwell_secs.clamp(MIN_DWELL_SECS, MAX_DWELL_SECS);
        self.transition_secs = self
            .transition_secs
            .clamp(MIN_TRANSITION_SECS, MAX_TRANSITION_SECS);

        match &mut self.rotation {
            RotationTrigger::FixedDuration { secs } => {
                *secs = snap_region_secs(*secs);
            }
            RotationTrigger::WorldCycle {
                threshold,
                min_delay_secs,
                max_delay_secs,
                ..
            } => {
                *threshold = threshold.clamp(0.05, 0.99);
                *min_delay_secs = min_delay_secs.max(0.0);
                *max_delay_secs = max_delay_secs.max(*min_delay_secs);
            }
        }
        self
    }
}

/// Snaps a region duration to 60-second steps within its legal range.
pub fn snap_region_secs(secs: f32) -> f32 {
    let stepped = (secs / REGION_SECS_STEP).round() * REGION_SECS_STEP;
    stepped.clamp(MIN_REGION_SECS, MAX_REGION_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TourConfig::default();
        assert_eq!(config.dwell_secs, 15.0);
        assert_eq!(config.transition_secs, 5.0);
        assert_eq!(config.camera_mode, CameraMode::RandomExploration);
        assert_eq!(config.room_history_len, 10);
        assert!(matches!(
            config.rotation,
            RotationTrigger::WorldCycle {
                threshold,
                hold_until_peak: false,
                ..
            } if (threshold - 0.85).abs() < f32::EPSILON
        ));
    }

    #[test]
    fn test_sanitize_clamps_timings() {
        let config = TourConfig {
            dwell_secs: 0.5,
            transition_secs: 99.0,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(config.dwell_secs, 5.0);
        assert_eq!(config.transition_secs, 15.0);
    }

    #[test]
    fn test_sanitize_snaps_region_duration() {
        let config = TourConfig {
            rotation: RotationTrigger::FixedDuration { secs: 437.0 },
            ..Default::default()
        }
        .sanitized();

        assert_eq!(config.rotation, RotationTrigger::FixedDuration { secs: 420.0 });

        assert_eq!(snap_region_secs(10.0), 60.0);
        assert_eq!(snap_region_secs(5000.0), 1800.0);
    }

    #[test]
    fn test_sanitize_orders_delay_bounds() {
        let config = TourConfig {
            rotation: RotationTrigger::WorldCycle {
                threshold: 2.0,
                min_delay_secs: 120.0,
                max_delay_secs: 30.0,
                hold_until_peak: false,
            },
            ..Default::default()
        }
        .sanitized();

        let RotationTrigger::WorldCycle {
            threshold,
            min_delay_secs,
            max_delay_secs,
            ..
        } = config.rotation
        else {
            panic!("rotation mode changed");
        };
        assert_eq!(threshold, 0.99);
        assert_eq!(min_delay_secs, 120.0);
        assert_eq!(max_delay_secs, 120.0);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = TourConfig {
            camera_mode: CameraMode::Sequential,
            rotation: RotationTrigger::FixedDuration { secs: 600.0 },
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: TourConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
