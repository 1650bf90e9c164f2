//! Transition state machine - dwell phases, camera glides, easing.
//!
//! The camera is always in one of two phases:
//!
//! ```text
//!            dwell expires, destination picked
//!   ┌──────────┐ ──────────────────────────────► ┌───────────────┐
//!   │ Dwelling │                                 │ Transitioning │
//!   └──────────┘ ◄────────────────────────────── └───────────────┘
//!            glide completes (camera snapped to target)
//! ```
//!
//! A glide interpolates the camera from its current position to the
//! target anchor over a fixed duration, eased so the camera accelerates
//! out of the old view and settles gently into the new one.

use nalgebra::Vector2;

use crate::selector::VantageState;

/// Ease-in-out cubic: slow start, fast middle, slow finish.
///
/// `t` is clamped to `[0, 1]`; the output is `4t^3` below the midpoint
/// and `1 - (-2t + 2)^3 / 2` above it.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// What a completed glide lands on.
#[derive(Debug, Clone, PartialEq)]
pub enum GlideTarget {
    /// A different anchor in the current room (no room swap)
    Anchor,

    /// A different room, applied at completion
    Room(PendingRoom),
}

/// A room swap carried by an in-flight glide.
///
/// Everything the controller needs to install the room is staged here
/// and applied only at completion, so a glide that gets discarded (say
/// by a region change) leaves no half-applied state behind.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRoom {
    /// Destination room name
    pub name: String,

    /// The destination room's camera anchors (already realized)
    pub anchors: Vec<Vector2<f32>>,

    /// Entry vantage bookkeeping for the destination room
    pub vantage: VantageState,
}

/// An in-flight camera glide.
#[derive(Debug, Clone, PartialEq)]
pub struct Glide {
    /// Start position
    pub from: Vector2<f32>,

    /// End position
    pub to: Vector2<f32>,

    /// Total glide time in seconds
    pub duration_secs: f32,

    /// Time spent gliding so far
    pub elapsed_secs: f32,

    /// What arrival means
    pub target: GlideTarget,
}

impl Glide {
    /// Starts a glide.
    pub fn new(
        from: Vector2<f32>,
        to: Vector2<f32>,
        duration_secs: f32,
        target: GlideTarget,
    ) -> Self {
        Self {
            from,
            to,
            duration_secs,
            elapsed_secs: 0.0,
            target,
        }
    }

    /// Advances the glide clock.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed_secs += dt;
    }

    /// True once the glide has run its full duration. Zero or negative
    /// durations count as complete immediately.
    pub fn is_complete(&self) -> bool {
        self.duration_secs <= 0.0 || self.elapsed_secs >= self.duration_secs
    }

    /// Camera position at the current (eased) progress.
    pub fn sample(&self) -> Vector2<f32> {
        let t = if self.duration_secs <= 0.0 {
            1.0
        } else {
            (self.elapsed_secs / self.duration_secs).clamp(0.0, 1.0)
        };
        self.from.lerp(&self.to, ease_in_out_cubic(t))
    }
}

/// The two phases of the tour clock.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionPhase {
    /// Camera parked at an anchor, dwell timer running
    Dwelling { elapsed_secs: f32 },

    /// Camera gliding toward its next target
    Transitioning { glide: Glide },
}

impl TransitionPhase {
    /// A fresh dwell with zero elapsed time.
    pub fn dwelling() -> Self {
        Self::Dwelling { elapsed_secs: 0.0 }
    }

    /// A dwell that expires on the next tick. Used right after a region
    /// activation so the first move happens promptly.
    pub fn dwelling_expired(dwell_secs: f32) -> Self {
        Self::Dwelling {
            elapsed_secs: dwell_secs,
        }
    }

    /// True while a glide is in flight.
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Transitioning { .. })
    }
}
