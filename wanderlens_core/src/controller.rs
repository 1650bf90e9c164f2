//! Tour controller - orchestrates the scheduling engines over a world.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       TourController                        │
//! │  ┌──────────┐ ┌──────────┐ ┌────────────┐ ┌─────────────┐   │
//! │  │ ROTATION │ │ SELECTOR │ │ TRANSITION │ │  COUNTDOWN  │   │
//! │  │ (regions)│ │ (rooms & │ │ (dwell &   │ │ (pre-storm  │   │
//! │  │          │ │  anchors)│ │  glides)   │ │  rotation)  │   │
//! │  └──────────┘ └──────────┘ └────────────┘ └─────────────┘   │
//! │            one ChaCha8Rng feeds every random choice         │
//! └───────────────────────────┬─────────────────────────────────┘
//!                             │ on_tick(world, dt) → Vec<TourEvent>
//!                     ┌───────▼────────┐
//!                     │   WorldModel   │
//!                     └────────────────┘
//! ```
//!
//! The controller never stores the world; the host passes it into each
//! call. One tick does, in order: pending-reload polling, phase advance
//! (dwell clock or glide interpolation), then rotation-trigger
//! evaluation. Events come back in firing order and at most one region
//! change happens per tick.

use nalgebra::Vector2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use wanderlens_world::{RegionCode, WorldModel};

use crate::config::{snap_region_secs, RotationTrigger, TourConfig};
use crate::countdown::{CountdownStep, CycleCountdown};
use crate::directory;
use crate::error::TourError;
use crate::events::TourEvent;
use crate::rotation::RegionRotation;
use crate::selector::{self, CameraMode, RoomHistory, VantageState};
use crate::transition::{Glide, GlideTarget, PendingRoom, TransitionPhase};

/// The autonomous tour guide.
///
/// Construct it once per session, then drive it with
/// [`TourController::on_tick`]. All randomness derives from the seed, so
/// a tour replays exactly from `(config, seed)` against a deterministic
/// world.
pub struct TourController {
    config: TourConfig,
    rng: ChaCha8Rng,

    rotation: RegionRotation,
    history: RoomHistory,
    vantage: VantageState,
    phase: TransitionPhase,
    countdown: Option<CycleCountdown>,

    /// Elapsed screen time of the active region (fixed-duration trigger)
    region_elapsed_secs: f32,

    current_room: Option<String>,
    previous_room: Option<String>,
    anchors: Vec<Vector2<f32>>,

    /// Room realized for a glide that was cancelled mid-flight; released
    /// back to the world on the next call that carries one
    abandoned_room: Option<String>,

    /// Region we are waiting on the world to load
    awaiting_region: Option<RegionCode>,
    /// Whether the pending load has been announced to the world yet
    reload_announced: bool,

    room_locked: bool,
    rooms_explored: u64,
    activations: u64,
}

impl TourController {
    /// Creates a controller touring the built-in region directory.
    pub fn new(config: TourConfig, seed: u64) -> Self {
        let include_expansion = config.include_expansion;
        Self::with_regions(config, seed, directory::all_regions(include_expansion))
    }

    /// Creates a controller touring a custom region list (modded or
    /// partial installs).
    pub fn with_regions(config: TourConfig, seed: u64, regions: Vec<RegionCode>) -> Self {
        let config = config.sanitized();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let rotation = RegionRotation::new(regions, &mut rng);
        let countdown = CycleCountdown::from_trigger(&config.rotation);
        let history = RoomHistory::new(config.room_history_len);
        let awaiting_region = rotation.current().cloned();

        Self {
            config,
            rng,
            rotation,
            history,
            vantage: VantageState::default(),
            phase: TransitionPhase::dwelling(),
            countdown,
            region_elapsed_secs: 0.0,
            current_room: None,
            previous_room: None,
            anchors: Vec::new(),
            abandoned_room: None,
            awaiting_region,
            reload_announced: false,
            room_locked: false,
            rooms_explored: 0,
            activations: 0,
        }
    }

    // ========== Lifecycle ==========

    /// Advances the tour by one tick.
    ///
    /// Returns the events that fired this tick, in firing order.
    pub fn on_tick<W: WorldModel>(&mut self, world: &mut W, dt: f32) -> Vec<TourEvent> {
        let mut events = Vec::new();
        self.release_abandoned(world);

        if let Some(region) = self.awaiting_region.clone() {
            if !self.reload_announced {
                world.request_region(&region);
                self.reload_announced = true;
                info!(region = %region, "requested region load");
                events.push(TourEvent::ReloadRequested {
                    region: region.clone(),
                });
            }
            let ready = matches!(world.loaded_region(), Some(loaded) if *loaded == region);
            if !ready {
                return events;
            }
            self.awaiting_region = None;
            self.activate_region(world, region, true, &mut events);
        }

        self.advance_phase(world, dt, &mut events);
        self.evaluate_rotation_trigger(world, dt, &mut events);

        events
    }

    /// Tells the controller its world finished loading.
    ///
    /// Adopts whatever region the world actually has (hosts may load a
    /// region the rotation didn't ask for) and opens the tour inside it.
    /// Optional when the host just ticks - `on_tick` polls for pending
    /// loads - but gives an immediate activation when the host knows.
    pub fn on_world_ready<W: WorldModel>(&mut self, world: &mut W) -> Vec<TourEvent> {
        let mut events = Vec::new();
        let Some(region) = world.loaded_region().cloned() else {
            warn!("on_world_ready called with no region loaded");
            return events;
        };
        if self.rotation.current() != Some(&region) {
            self.rotation.force(region.clone());
        }
        self.awaiting_region = None;
        self.reload_announced = true;
        self.activate_region(world, region, false, &mut events);
        events
    }

    /// Discards transient state ahead of the world going away.
    ///
    /// Campaign memory (the rotation order and visited set) survives;
    /// room, glide, history, and countdown state do not. The controller
    /// resumes when the world reports the current region loaded again.
    pub fn on_shutdown(&mut self) {
        info!("tour paused, discarding transient state");
        self.phase = TransitionPhase::dwelling();
        self.history.clear();
        self.vantage = VantageState::default();
        self.current_room = None;
        self.previous_room = None;
        self.abandoned_room = None;
        self.anchors = Vec::new();
        self.region_elapsed_secs = 0.0;
        if let Some(countdown) = &mut self.countdown {
            countdown.reset();
        }
        self.awaiting_region = self.rotation.current().cloned();
        self.reload_announced = true;
    }

    // ========== Host commands ==========

    /// Skips ahead right now: an in-flight glide completes instantly, a
    /// dwelling camera starts and completes its next move in one call.
    /// Ignored while the world is loading. Under a room lock it only
    /// completes an in-flight glide, never starts a new move.
    pub fn force_immediate_change<W: WorldModel>(&mut self, world: &mut W) -> Vec<TourEvent> {
        let mut events = Vec::new();
        if self.awaiting_region.is_some() {
            debug!("skip ignored, world still loading");
            return events;
        }
        if !self.phase.is_transitioning() {
            if self.room_locked {
                debug!("skip ignored, room locked");
                return events;
            }
            self.begin_next_move(world);
        }
        self.complete_transition(world, &mut events);
        events
    }

    /// Glides to a named room in the active region.
    ///
    /// The room must exist and not be a gate. A glide already in flight
    /// is dropped first and its realized target released. A room lock
    /// stays engaged and simply guards the new room afterwards.
    pub fn force_room_change<W: WorldModel>(
        &mut self,
        world: &mut W,
        name: &str,
    ) -> Result<(), TourError> {
        if self.awaiting_region.is_some() {
            return Err(TourError::WorldNotReady);
        }
        if self.current_room.as_deref() == Some(name) {
            // Already here; drop any glide heading elsewhere.
            self.cancel_glide();
            self.release_abandoned(world);
            return Ok(());
        }
        let Some(stub) = world.rooms().iter().find(|r| r.name == name) else {
            warn!(room = name, "jump requested to a room not in this region");
            return Err(TourError::StaleRoomReference(name.to_string()));
        };
        if stub.gate {
            return Err(TourError::NoDestinationAvailable);
        }
        self.cancel_glide();
        self.release_abandoned(world);
        self.begin_room_glide(world, name.to_string())
    }

    /// Steps the campaign cursor and reloads into that region.
    /// Clears any room lock.
    pub fn advance_region<W: WorldModel>(&mut self, world: &mut W, step: i64) -> Vec<TourEvent> {
        let mut events = Vec::new();
        if let Some(region) = self.rotation.advance(step).cloned() {
            self.unlock();
            self.request_region_change(world, region, &mut events);
        }
        events
    }

    /// Jumps the campaign to the named region and reloads into it.
    ///
    /// Codes outside the campaign are appended rather than rejected, so
    /// hosts can tour regions the directory doesn't know about.
    /// Clears any room lock.
    pub fn force_region<W: WorldModel>(&mut self, world: &mut W, code: &str) -> Vec<TourEvent> {
        let mut events = Vec::new();
        let region = self.rotation.force(RegionCode::new(code)).clone();
        self.unlock();
        self.request_region_change(world, region, &mut events);
        events
    }

    /// Rotates to a random unvisited region (resetting the campaign
    /// first if the sweep is already complete). Clears any room lock.
    pub fn random_region<W: WorldModel>(&mut self, world: &mut W) -> Vec<TourEvent> {
        let mut events = Vec::new();
        self.unlock();
        self.rotate_to_unvisited(world, &mut events);
        events
    }

    /// Changes how anchors are walked. The in-room walk state resets
    /// immediately, so the next dwell expiry moves under the new mode's
    /// rules from a clean slate.
    pub fn set_camera_mode(&mut self, mode: CameraMode) {
        if self.config.camera_mode != mode {
            info!(mode = %mode, "camera mode changed");
            self.config.camera_mode = mode;
            self.vantage = VantageState::default();
        }
    }

    /// Freezes/unfreezes the tour in place. Engaging the lock cancels
    /// any glide in flight; while locked no automatic move starts -
    /// anchor or room - and the region rotation and countdown hold.
    pub fn toggle_room_lock(&mut self) -> bool {
        self.room_locked = !self.room_locked;
        if self.room_locked {
            self.cancel_glide();
        }
        if let Some(countdown) = &mut self.countdown {
            countdown.set_frozen(self.room_locked);
        }
        info!(locked = self.room_locked, "room lock toggled");
        self.room_locked
    }

    /// Nudges the fixed rotation period, snapped to 60-second steps
    /// within its legal range. Returns the new period, or `None` under
    /// world-cycle rotation.
    pub fn adjust_region_duration(&mut self, delta_secs: f32) -> Option<f32> {
        if let RotationTrigger::FixedDuration { secs } = &mut self.config.rotation {
            *secs = snap_region_secs(*secs + delta_secs);
            Some(*secs)
        } else {
            None
        }
    }

    /// Starts a fresh sweep in place: the visited set shrinks to just
    /// the current region, which reloads.
    pub fn reset_campaign<W: WorldModel>(&mut self, world: &mut W) -> Vec<TourEvent> {
        let mut events = Vec::new();
        self.rotation.reset_campaign();
        if let Some(region) = self.rotation.current().cloned() {
            self.request_region_change(world, region, &mut events);
        }
        events
    }

    // ========== Status surface ==========

    /// Region the tour is in (or heading into).
    pub fn current_region(&self) -> Option<&RegionCode> {
        self.rotation.current()
    }

    /// Next region in campaign order.
    pub fn next_region(&self) -> Option<&RegionCode> {
        self.rotation.peek(1)
    }

    /// Previous region in campaign order.
    pub fn previous_region(&self) -> Option<&RegionCode> {
        self.rotation.peek(-1)
    }

    /// Room currently on screen.
    pub fn current_room(&self) -> Option<&str> {
        self.current_room.as_deref()
    }

    /// Room the tour was in before the current one.
    pub fn previous_room(&self) -> Option<&str> {
        self.previous_room.as_deref()
    }

    /// Room an in-flight glide will land in, if it carries a room swap.
    pub fn next_room(&self) -> Option<&str> {
        match &self.phase {
            TransitionPhase::Transitioning { glide } => match &glide.target {
                GlideTarget::Room(pending) => Some(&pending.name),
                GlideTarget::Anchor => None,
            },
            TransitionPhase::Dwelling { .. } => None,
        }
    }

    /// Active camera mode.
    pub fn camera_mode(&self) -> CameraMode {
        self.config.camera_mode
    }

    /// True while a glide is in flight.
    pub fn is_transitioning(&self) -> bool {
        self.phase.is_transitioning()
    }

    /// True while the world is loading a region for us.
    pub fn is_awaiting_world(&self) -> bool {
        self.awaiting_region.is_some()
    }

    /// True while room changes are frozen.
    pub fn room_locked(&self) -> bool {
        self.room_locked
    }

    /// Rooms entered since construction.
    pub fn rooms_explored(&self) -> u64 {
        self.rooms_explored
    }

    /// Regions toured this campaign.
    pub fn regions_explored(&self) -> usize {
        self.rotation.visited_count()
    }

    /// Regions in the campaign.
    pub fn regions_total(&self) -> usize {
        self.rotation.len()
    }

    /// Seconds until the pre-storm countdown fires, if armed.
    pub fn countdown_remaining_secs(&self) -> Option<f32> {
        self.countdown.as_ref().and_then(|c| c.remaining_secs())
    }

    /// The effective (sanitized) configuration.
    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    // ========== Tick internals ==========

    fn advance_phase<W: WorldModel>(
        &mut self,
        world: &mut W,
        dt: f32,
        events: &mut Vec<TourEvent>,
    ) {
        let mut dwell_expired = false;
        let mut glide_arrived = false;

        match &mut self.phase {
            TransitionPhase::Dwelling { elapsed_secs } => {
                *elapsed_secs += dt;
                dwell_expired = *elapsed_secs >= self.config.dwell_secs;
            }
            TransitionPhase::Transitioning { glide } => {
                glide.advance(dt);
                world.set_camera_position(glide.sample());
                glide_arrived = glide.is_complete();
            }
        }

        // A lock holds the camera entirely; the dwell clock keeps
        // accumulating so unlocking moves on the very next expiry.
        if dwell_expired && !self.room_locked {
            self.begin_next_move(world);
        }
        if glide_arrived {
            self.complete_transition(world, events);
        }
    }

    /// Decides what the next move is once a dwell expires: another
    /// anchor in this room, or a glide into a different room.
    /// Room-change events fire at glide completion, not here.
    fn begin_next_move<W: WorldModel>(&mut self, world: &mut W) {
        let anchor_count = self.anchors.len();

        if self.current_room.is_some()
            && self.vantage.wants_to_stay(self.config.camera_mode, anchor_count)
        {
            if let Some(index) =
                self.vantage
                    .next_anchor(self.config.camera_mode, anchor_count, &mut self.rng)
            {
                let to = self.anchors[index];
                debug!(anchor = index, "gliding to next anchor");
                self.start_glide(world, to, GlideTarget::Anchor);
                return;
            }
        }

        match selector::select_room(world.rooms(), &mut self.history, &mut self.rng) {
            Ok(name) => {
                if let Err(err) = self.begin_room_glide(world, name.clone()) {
                    warn!(room = %name, error = %err, "could not start glide, staying put");
                    self.phase = TransitionPhase::dwelling();
                }
            }
            Err(err) => {
                warn!(error = %err, "no destination this cycle, staying put");
                self.phase = TransitionPhase::dwelling();
            }
        }
    }

    /// Realizes `name` and starts a glide that will land in it.
    fn begin_room_glide<W: WorldModel>(
        &mut self,
        world: &mut W,
        name: String,
    ) -> Result<(), TourError> {
        let anchors = world.realize_room(&name)?;
        let vantage =
            VantageState::enter_room(self.config.camera_mode, anchors.len(), &mut self.rng);
        let to = anchors
            .get(vantage.anchor_index())
            .copied()
            .unwrap_or_else(|| world.camera_position());
        debug!(room = %name, "gliding to room");
        self.start_glide(
            world,
            to,
            GlideTarget::Room(PendingRoom {
                name,
                anchors,
                vantage,
            }),
        );
        Ok(())
    }

    fn start_glide<W: WorldModel>(&mut self, world: &W, to: Vector2<f32>, target: GlideTarget) {
        let glide = Glide::new(
            world.camera_position(),
            to,
            self.config.transition_secs,
            target,
        );
        self.phase = TransitionPhase::Transitioning { glide };
    }

    /// Lands the in-flight glide. The ordering here is the contract the
    /// host relies on: camera snap, then room swap, then releasing the
    /// previous room, then history and counters, then the event.
    fn complete_transition<W: WorldModel>(&mut self, world: &mut W, events: &mut Vec<TourEvent>) {
        if !self.phase.is_transitioning() {
            return;
        }
        let TransitionPhase::Transitioning { glide } =
            std::mem::replace(&mut self.phase, TransitionPhase::dwelling())
        else {
            return;
        };

        world.set_camera_position(glide.to);

        match glide.target {
            GlideTarget::Anchor => {
                debug!(anchor = self.vantage.anchor_index(), "settled at anchor");
            }
            GlideTarget::Room(pending) => {
                let previous = self.current_room.replace(pending.name.clone());
                self.anchors = pending.anchors;
                self.vantage = pending.vantage;

                let changed = previous.as_deref() != Some(pending.name.as_str());
                if changed {
                    if let Some(previous) = previous {
                        world.abstractize_room(&previous);
                        self.previous_room = Some(previous);
                    }
                    self.rooms_explored += 1;
                    info!(room = %pending.name, "entered room");
                }
                self.history.push(&pending.name);
                if changed {
                    events.push(TourEvent::RoomChanged { room: pending.name });
                }
            }
        }
    }

    /// Drops an in-flight glide and reverts to dwelling. A room target
    /// realized for the glide is remembered for release; the camera
    /// stays wherever the glide left it.
    fn cancel_glide(&mut self) {
        if !self.phase.is_transitioning() {
            return;
        }
        let TransitionPhase::Transitioning { glide } =
            std::mem::replace(&mut self.phase, TransitionPhase::dwelling())
        else {
            return;
        };
        if let GlideTarget::Room(pending) = glide.target {
            if self.current_room.as_deref() != Some(pending.name.as_str()) {
                debug!(room = %pending.name, "glide cancelled, target released");
                self.abandoned_room = Some(pending.name);
            }
        }
    }

    /// Gives an abandoned glide target back to the world.
    fn release_abandoned<W: WorldModel>(&mut self, world: &mut W) {
        if let Some(room) = self.abandoned_room.take() {
            world.abstractize_room(&room);
        }
    }

    // ========== Region rotation internals ==========

    fn evaluate_rotation_trigger<W: WorldModel>(
        &mut self,
        world: &mut W,
        dt: f32,
        events: &mut Vec<TourEvent>,
    ) {
        match self.config.rotation {
            RotationTrigger::FixedDuration { secs } => {
                if self.room_locked {
                    return;
                }
                self.region_elapsed_secs += dt;
                if self.region_elapsed_secs >= secs {
                    self.region_elapsed_secs = 0.0;
                    self.rotate_to_unvisited(world, events);
                }
            }
            RotationTrigger::WorldCycle { .. } => {
                let progress = world.cycle().progress();
                let step = match &mut self.countdown {
                    Some(countdown) => countdown.observe(progress, dt, &mut self.rng),
                    None => CountdownStep::Idle,
                };
                match step {
                    CountdownStep::Armed { delay_secs } => {
                        info!(delay_secs, "pre-storm countdown armed");
                        events.push(TourEvent::CountdownArmed { delay_secs });
                    }
                    CountdownStep::Fired => {
                        info!("pre-storm countdown fired");
                        self.rotate_to_unvisited(world, events);
                    }
                    CountdownStep::Idle => {}
                }
            }
        }
    }

    /// Rotates to a random unvisited region; on a completed sweep,
    /// announces it, resets the campaign, and rotates somewhere fresh.
    /// The reset leaves the region on screen marked visited, so the new
    /// sweep never repeats it immediately.
    fn rotate_to_unvisited<W: WorldModel>(&mut self, world: &mut W, events: &mut Vec<TourEvent>) {
        match self.rotation.random_unvisited(&mut self.rng) {
            Some(region) => self.request_region_change(world, region, events),
            None => {
                if self.rotation.is_empty() {
                    return;
                }
                info!("campaign sweep complete");
                events.push(TourEvent::SweepCompleted);
                self.rotation.reset_campaign();
                if let Some(region) = self.rotation.random_unvisited(&mut self.rng) {
                    self.request_region_change(world, region, events);
                }
            }
        }
    }

    fn request_region_change<W: WorldModel>(
        &mut self,
        world: &mut W,
        region: RegionCode,
        events: &mut Vec<TourEvent>,
    ) {
        info!(region = %region, "rotating to region");
        self.phase = TransitionPhase::dwelling();
        self.region_elapsed_secs = 0.0;
        if let Some(countdown) = &mut self.countdown {
            countdown.reset();
        }
        world.request_region(&region);
        events.push(TourEvent::ReloadRequested {
            region: region.clone(),
        });
        self.awaiting_region = Some(region);
        self.reload_announced = true;
    }

    /// Opens the tour inside a freshly loaded region.
    fn activate_region<W: WorldModel>(
        &mut self,
        world: &mut W,
        region: RegionCode,
        reload: bool,
        events: &mut Vec<TourEvent>,
    ) {
        info!(region = %region, reload, "region activated");
        self.history.clear();
        self.previous_room = self.current_room.take();
        self.anchors = Vec::new();
        self.vantage = VantageState::default();
        self.region_elapsed_secs = 0.0;
        if let Some(countdown) = &mut self.countdown {
            countdown.reset();
        }
        self.rotation.mark_visited(&region);
        self.activations += 1;
        events.push(TourEvent::RegionActivated {
            region: region.clone(),
            reload,
        });

        self.enter_start_room(world, &region, events);

        // Pre-arm the dwell so the first move happens promptly.
        self.phase = TransitionPhase::dwelling_expired(self.config.dwell_secs);
    }

    /// Resolves and enters the region's start room, degrading first to
    /// any tourable room and then to "no room yet" (a later dwell expiry
    /// retries selection).
    fn enter_start_room<W: WorldModel>(
        &mut self,
        world: &mut W,
        region: &RegionCode,
        events: &mut Vec<TourEvent>,
    ) {
        let start = world
            .start_room()
            .map(str::to_string)
            .unwrap_or_else(|| region.default_start_room());

        let opened = match world.realize_room(&start) {
            Ok(anchors) => Some((start, anchors)),
            Err(err) => {
                warn!(room = %start, error = %err, "start room unavailable, picking another");
                match selector::select_room(world.rooms(), &mut self.history, &mut self.rng) {
                    Ok(fallback) => match world.realize_room(&fallback) {
                        Ok(anchors) => Some((fallback, anchors)),
                        Err(err) => {
                            warn!(room = %fallback, error = %err, "fallback room failed to realize");
                            None
                        }
                    },
                    Err(err) => {
                        warn!(error = %err, "region has no tourable rooms");
                        None
                    }
                }
            }
        };

        let Some((name, anchors)) = opened else {
            return;
        };

        self.vantage =
            VantageState::enter_room(self.config.camera_mode, anchors.len(), &mut self.rng);
        if let Some(anchor) = anchors.get(self.vantage.anchor_index()) {
            world.set_camera_position(*anchor);
        }
        self.anchors = anchors;
        self.current_room = Some(name.clone());
        self.history.push(&name);
        self.rooms_explored += 1;
        info!(room = %name, "tour opened in room");
        events.push(TourEvent::RoomChanged { room: name });
    }

    fn unlock(&mut self) {
        if self.room_locked {
            self.room_locked = false;
            if let Some(countdown) = &mut self.countdown {
                countdown.set_frozen(false);
            }
        }
    }
}
