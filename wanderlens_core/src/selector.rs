//! Room & vantage selection.
//!
//! Two layers of choice happen inside the active region:
//! - **Rooms**: uniformly random among non-gate rooms not seen recently.
//!   When the history has starved the pool, it is cleared and the filter
//!   re-run (gates stay excluded). A genuinely empty pool is an error the
//!   controller degrades on, never a panic.
//! - **Anchors**: each room carries camera anchors, walked according to
//!   the configured [`CameraMode`]. The per-room bookkeeping lives in
//!   [`VantageState`] and is rebuilt at every room entry.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use wanderlens_world::RoomStub;

use crate::error::TourError;

/// How the camera walks a room's anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// Park at the first anchor, move rooms at every dwell expiry
    FirstOnly,

    /// Walk anchors in order, then move rooms
    Sequential,

    /// Random start, then a random number of jumps to unvisited anchors
    RandomExploration,

    /// One random anchor per visit, move rooms at every dwell expiry
    Random,
}

impl CameraMode {
    /// All modes, in settings-menu order.
    pub fn all() -> Vec<CameraMode> {
        vec![
            CameraMode::FirstOnly,
            CameraMode::Sequential,
            CameraMode::RandomExploration,
            CameraMode::Random,
        ]
    }

    /// Stable lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            CameraMode::FirstOnly => "first_only",
            CameraMode::Sequential => "sequential",
            CameraMode::RandomExploration => "random_exploration",
            CameraMode::Random => "random",
        }
    }
}

impl Default for CameraMode {
    fn default() -> Self {
        CameraMode::RandomExploration
    }
}

impl std::fmt::Display for CameraMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for CameraMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first_only" | "firstonly" | "first" => Ok(CameraMode::FirstOnly),
            "sequential" => Ok(CameraMode::Sequential),
            "random_exploration" | "randomexploration" | "explore" => {
                Ok(CameraMode::RandomExploration)
            }
            "random" => Ok(CameraMode::Random),
            _ => Err(format!("unknown camera mode: {}", s)),
        }
    }
}

/// FIFO of recently visited room names.
///
/// Pushing a name already present is a no-op (no reordering); the oldest
/// entry is evicted once the cap is exceeded. A cap of 0 disables the
/// history entirely.
#[derive(Debug, Clone)]
pub struct RoomHistory {
    rooms: VecDeque<String>,
    cap: usize,
}

impl RoomHistory {
    /// Creates an empty history with the given cap.
    pub fn new(cap: usize) -> Self {
        Self {
            rooms: VecDeque::new(),
            cap,
        }
    }

    /// Records a visit. Duplicates are ignored, overflow evicts oldest.
    pub fn push(&mut self, name: &str) {
        if self.cap == 0 || self.contains(name) {
            return;
        }
        self.rooms.push_back(name.to_string());
        while self.rooms.len() > self.cap {
            self.rooms.pop_front();
        }
    }

    /// True if the room was visited recently.
    pub fn contains(&self, name: &str) -> bool {
        self.rooms.iter().any(|r| r == name)
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.rooms.clear();
    }

    /// Number of remembered rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// True when nothing is remembered.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Remembered rooms, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.rooms.iter().map(String::as_str)
    }
}

/// Picks the next destination room.
///
/// Gates are always excluded. Rooms in `history` are excluded on the
/// first pass; if that starves the pool, the history is cleared and the
/// filter re-run, so a small region cycles rather than stalling.
pub fn select_room(
    stubs: &[RoomStub],
    history: &mut RoomHistory,
    rng: &mut impl Rng,
) -> Result<String, TourError> {
    let fresh: Vec<&RoomStub> = stubs
        .iter()
        .filter(|r| !r.gate && !history.contains(&r.name))
        .collect();

    let pool = if fresh.is_empty() {
        history.clear();
        stubs.iter().filter(|r| !r.gate).collect()
    } else {
        fresh
    };

    pool.choose(rng)
        .map(|r| r.name.clone())
        .ok_or(TourError::NoDestinationAvailable)
}

/// Per-room anchor bookkeeping, rebuilt at every room entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VantageState {
    anchor_index: usize,
    unvisited: Vec<usize>,
    remaining_jumps: usize,
}

impl VantageState {
    /// Builds the entry state for a room with `anchor_count` anchors.
    pub fn enter_room(mode: CameraMode, anchor_count: usize, rng: &mut impl Rng) -> Self {
        if anchor_count == 0 {
            return Self::default();
        }
        match mode {
            CameraMode::FirstOnly | CameraMode::Sequential => Self {
                anchor_index: 0,
                unvisited: Vec::new(),
                remaining_jumps: 0,
            },
            CameraMode::RandomExploration => {
                let anchor_index = rng.gen_range(0..anchor_count);
                let unvisited: Vec<usize> =
                    (0..anchor_count).filter(|&i| i != anchor_index).collect();
                let remaining_jumps = rng.gen_range(0..=unvisited.len());
                Self {
                    anchor_index,
                    unvisited,
                    remaining_jumps,
                }
            }
            CameraMode::Random => Self {
                anchor_index: rng.gen_range(0..anchor_count),
                unvisited: Vec::new(),
                remaining_jumps: 0,
            },
        }
    }

    /// The anchor the camera is at (or heading to).
    pub fn anchor_index(&self) -> usize {
        self.anchor_index
    }

    /// Jumps still budgeted for this stay (RandomExploration only).
    pub fn remaining_jumps(&self) -> usize {
        self.remaining_jumps
    }

    /// Whether the room should hold through the next dwell expiry.
    ///
    /// Note the Sequential rule: a single-anchor room never holds, so
    /// every dwell expiry moves to a new room.
    pub fn wants_to_stay(&self, mode: CameraMode, anchor_count: usize) -> bool {
        match mode {
            CameraMode::FirstOnly | CameraMode::Random => false,
            CameraMode::Sequential => {
                anchor_count > 1 && self.anchor_index < anchor_count - 1
            }
            CameraMode::RandomExploration => {
                self.remaining_jumps > 0 && !self.unvisited.is_empty()
            }
        }
    }

    /// Advances to the next anchor within the room, consuming the stay
    /// budget. Returns the new anchor index, or `None` when the mode has
    /// nowhere further to go.
    pub fn next_anchor(
        &mut self,
        mode: CameraMode,
        anchor_count: usize,
        rng: &mut impl Rng,
    ) -> Option<usize> {
        match mode {
            CameraMode::Sequential => {
                if self.anchor_index + 1 < anchor_count {
                    self.anchor_index += 1;
                    Some(self.anchor_index)
                } else {
                    None
                }
            }
            CameraMode::RandomExploration => {
                if self.remaining_jumps == 0 || self.unvisited.is_empty() {
                    return None;
                }
                let slot = rng.gen_range(0..self.unvisited.len());
                let index = self.unvisited.swap_remove(slot);
                self.remaining_jumps -= 1;
                self.anchor_index = index;
                Some(index)
            }
            CameraMode::FirstOnly | CameraMode::Random => None,
        }
    }
}
