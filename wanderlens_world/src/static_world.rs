//! StaticWorld - a deterministic in-memory world model.
//!
//! Used as the substrate for scheduler tests: regions are registered up
//! front as templates, loads are instant by default (or stepped manually
//! for reload-latency tests), and every realize/abstractize call is
//! recorded so tests can assert on room lifecycle.

use nalgebra::Vector2;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::error::WorldError;
use crate::model::{CyclePhase, RoomStub, WorldModel};
use crate::region::RegionCode;

/// Blueprint for one region of a [`StaticWorld`].
#[derive(Debug, Clone)]
pub struct RegionTemplate {
    code: RegionCode,
    rooms: Vec<RoomStub>,
    anchors: HashMap<String, Vec<Vector2<f32>>>,
    start_room: Option<String>,
    cycle_length_secs: f32,
}

impl RegionTemplate {
    /// Creates an empty template for the given region code.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self {
            code: RegionCode::new(code),
            rooms: Vec::new(),
            anchors: HashMap::new(),
            start_room: None,
            cycle_length_secs: 0.0,
        }
    }

    /// Adds a room with the given camera anchors.
    pub fn room(mut self, name: &str, anchors: Vec<Vector2<f32>>) -> Self {
        self.rooms.push(RoomStub {
            name: name.to_string(),
            gate: false,
        });
        self.anchors.insert(name.to_string(), anchors);
        self
    }

    /// Adds a connector gate (never a tour destination).
    pub fn gate(mut self, name: &str) -> Self {
        self.rooms.push(RoomStub {
            name: name.to_string(),
            gate: true,
        });
        self
    }

    /// Sets the preferred entry room.
    pub fn start_room(mut self, name: &str) -> Self {
        self.start_room = Some(name.to_string());
        self
    }

    /// Sets the cycle length (0 = this region's world has no cycle).
    pub fn cycle_length(mut self, secs: f32) -> Self {
        self.cycle_length_secs = secs;
        self
    }

    /// The region code this template describes.
    pub fn code(&self) -> &RegionCode {
        &self.code
    }
}

/// A deterministic in-memory [`WorldModel`].
#[derive(Debug, Default)]
pub struct StaticWorld {
    templates: HashMap<RegionCode, RegionTemplate>,

    loaded: Option<RegionCode>,
    rooms: Vec<RoomStub>,
    anchors: HashMap<String, Vec<Vector2<f32>>>,
    start_room: Option<String>,

    /// Rooms currently held in memory
    realized: HashSet<String>,
    /// Every room released so far, in release order
    abstractized: Vec<String>,
    /// Rooms whose realization is rigged to fail
    broken_rooms: HashSet<String>,

    cycle: Option<CyclePhase>,
    camera: Vector2<f32>,

    pending: Option<RegionCode>,
    manual_loads: bool,
}

impl StaticWorld {
    /// Creates an empty world with no region loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a region template.
    pub fn with_region(mut self, template: RegionTemplate) -> Self {
        self.templates.insert(template.code.clone(), template);
        self
    }

    /// Switches region loads to manual stepping: `request_region` parks
    /// the request until [`StaticWorld::finish_load`] is called.
    pub fn with_manual_loads(mut self) -> Self {
        self.manual_loads = true;
        self
    }

    /// Rigs a room so that realizing it fails.
    pub fn with_broken_room(mut self, name: &str) -> Self {
        self.broken_rooms.insert(name.to_string());
        self
    }

    /// Completes a pending manual load, if any.
    pub fn finish_load(&mut self) {
        if let Some(code) = self.pending.take() {
            self.apply_template(&code);
        }
    }

    /// The region currently being loaded, if any.
    pub fn pending_region(&self) -> Option<&RegionCode> {
        self.pending.as_ref()
    }

    /// Advances the cycle clock, wrapping at the cycle length.
    pub fn advance_cycle(&mut self, dt: f32) {
        if let Some(cycle) = &mut self.cycle {
            if cycle.length_secs > 0.0 {
                cycle.timer_secs += dt;
                if cycle.timer_secs >= cycle.length_secs {
                    cycle.timer_secs -= cycle.length_secs;
                }
            }
        }
    }

    /// Pins the cycle clock to an exact phase.
    pub fn set_cycle(&mut self, timer_secs: f32, length_secs: f32) {
        self.cycle = Some(CyclePhase::new(timer_secs, length_secs));
    }

    /// True if the named room is currently realized.
    pub fn is_realized(&self, name: &str) -> bool {
        self.realized.contains(name)
    }

    /// Rooms released so far, in release order.
    pub fn abstractized(&self) -> &[String] {
        &self.abstractized
    }

    fn apply_template(&mut self, code: &RegionCode) {
        let Some(template) = self.templates.get(code) else {
            warn!(region = %code, "no template registered, load stalls");
            return;
        };
        self.loaded = Some(template.code.clone());
        self.rooms = template.rooms.clone();
        self.anchors = template.anchors.clone();
        self.start_room = template.start_room.clone();
        self.realized.clear();
        self.cycle = Some(CyclePhase::new(0.0, template.cycle_length_secs));
        debug!(region = %code, rooms = self.rooms.len(), "region loaded");
    }
}

impl WorldModel for StaticWorld {
    fn loaded_region(&self) -> Option<&RegionCode> {
        self.loaded.as_ref()
    }

    fn rooms(&self) -> &[RoomStub] {
        &self.rooms
    }

    fn start_room(&self) -> Option<&str> {
        self.start_room.as_deref()
    }

    fn realize_room(&mut self, name: &str) -> Result<Vec<Vector2<f32>>, WorldError> {
        if self.loaded.is_none() {
            return Err(WorldError::RegionNotLoaded);
        }
        if !self.rooms.iter().any(|r| r.name == name) {
            return Err(WorldError::room_not_found(name));
        }
        if self.broken_rooms.contains(name) {
            return Err(WorldError::realize_failed(name, "rigged to fail"));
        }
        self.realized.insert(name.to_string());
        Ok(self.anchors.get(name).cloned().unwrap_or_default())
    }

    fn abstractize_room(&mut self, name: &str) {
        if self.realized.remove(name) {
            debug!(room = name, "room released");
            self.abstractized.push(name.to_string());
        }
    }

    fn cycle(&self) -> CyclePhase {
        self.cycle.unwrap_or(CyclePhase::new(0.0, 0.0))
    }

    fn camera_position(&self) -> Vector2<f32> {
        self.camera
    }

    fn set_camera_position(&mut self, position: Vector2<f32>) {
        self.camera = position;
    }

    fn request_region(&mut self, region: &RegionCode) {
        self.loaded = None;
        self.rooms.clear();
        self.anchors.clear();
        self.start_room = None;
        self.realized.clear();
        if self.manual_loads {
            self.pending = Some(region.clone());
        } else {
            self.apply_template(region);
        }
    }
}
