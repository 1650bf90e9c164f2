//! Scenario runner - executes tour scenarios against synthetic worlds.

use crate::scenarios::ScenarioId;
use crate::world::{SimConfig, SimWorld};

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use wanderlens_core::{CameraMode, RotationTrigger, TourConfig, TourController, TourEvent};
use wanderlens_world::{WorldModel, GATE_PREFIX};

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether the scenario passed all assertions
    pub passed: bool,

    /// Total ticks executed
    pub total_ticks: u64,

    /// Final virtual time in seconds
    pub final_time_secs: f32,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Metrics collected during the run
    pub metrics: ScenarioMetrics,
}

/// Event counts collected during scenario execution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScenarioMetrics {
    /// Rooms entered
    pub rooms_changed: u64,

    /// Region loads requested
    pub reloads_requested: u64,

    /// Regions activated after loading
    pub regions_activated: u64,

    /// Pre-storm countdowns armed
    pub countdowns_armed: u64,

    /// Campaign sweeps completed
    pub sweeps_completed: u64,
}

impl ScenarioMetrics {
    fn record(&mut self, event: &TourEvent) {
        match event {
            TourEvent::RoomChanged { .. } => self.rooms_changed += 1,
            TourEvent::ReloadRequested { .. } => self.reloads_requested += 1,
            TourEvent::RegionActivated { .. } => self.regions_activated += 1,
            TourEvent::CountdownArmed { .. } => self.countdowns_armed += 1,
            TourEvent::SweepCompleted => self.sweeps_completed += 1,
        }
    }
}

/// Runs tour scenarios.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Tick rate in Hz
    tick_rate_hz: u32,

    /// Maximum virtual duration in seconds
    max_duration_secs: f32,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            tick_rate_hz: 30,
            max_duration_secs: 600.0,
        }
    }

    /// Sets the tick rate.
    pub fn with_tick_rate(mut self, hz: u32) -> Self {
        self.tick_rate_hz = hz.max(1);
        self
    }

    /// Sets the maximum virtual duration.
    pub fn with_duration(mut self, secs: f32) -> Self {
        self.max_duration_secs = secs;
        self
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);

        match scenario {
            ScenarioId::LongHaul => self.run_long_haul(),
            ScenarioId::StormChaser => self.run_storm_chaser(),
            ScenarioId::GrandSweep => self.run_grand_sweep(),
            ScenarioId::GalleryWalk => self.run_gallery_walk(),
            ScenarioId::RestlessEye => self.run_restless_eye(),
            ScenarioId::SlowBoat => self.run_slow_boat(),
            ScenarioId::LockedRoom => self.run_locked_room(),
            ScenarioId::ReplayTwins => self.run_replay_twins(),
            ScenarioId::GateMaze => self.run_gate_maze(),
            ScenarioId::PeakHold => self.run_peak_hold(),
        }
    }

    fn dt(&self) -> f32 {
        1.0 / self.tick_rate_hz as f32
    }

    fn result(
        &self,
        scenario: ScenarioId,
        total_ticks: u64,
        final_time_secs: f32,
        metrics: ScenarioMetrics,
        failure_reason: Option<String>,
    ) -> ScenarioResult {
        if let Some(reason) = &failure_reason {
            warn!("{} failed: {}", scenario.name(), reason);
        }
        ScenarioResult {
            scenario,
            seed: self.seed,
            passed: failure_reason.is_none(),
            total_ticks,
            final_time_secs,
            failure_reason,
            metrics,
        }
    }

    /// TOUR-001: LongHaul - hours of touring under default-ish settings.
    ///
    /// **Assertion**: no gate is ever toured, rooms and regions keep
    /// changing, and the scheduler never stalls or panics.
    fn run_long_haul(&self) -> ScenarioResult {
        info!("TOUR-001: LongHaul - virtual soak");

        let mut sim = SimWorld::new(SimConfig {
            seed: self.seed,
            ..SimConfig::default()
        });
        let config = TourConfig {
            dwell_secs: 5.0,
            transition_secs: 1.0,
            rotation: RotationTrigger::WorldCycle {
                threshold: 0.85,
                min_delay_secs: 10.0,
                max_delay_secs: 30.0,
                hold_until_peak: false,
            },
            ..Default::default()
        };
        let mut tour = TourController::with_regions(config, self.seed, sim.region_codes());

        let dt = self.dt();
        let duration = self.max_duration_secs.max(3600.0);
        let target_ticks = (duration / dt) as u64;

        let mut metrics = ScenarioMetrics::default();
        let mut failure = None;

        for tick in 0..target_ticks {
            sim.tick(dt);
            for event in tour.on_tick(&mut sim, dt) {
                metrics.record(&event);
                if let TourEvent::RoomChanged { room } = &event {
                    if room.starts_with(GATE_PREFIX) {
                        failure = Some(format!("toured a gate: {room}"));
                    }
                }
            }
            if failure.is_some() {
                break;
            }
            if tick % (self.tick_rate_hz as u64 * 300) == 0 {
                debug!(
                    "  t={:.0}s | rooms={} | regions={}",
                    sim.elapsed_secs(),
                    metrics.rooms_changed,
                    metrics.regions_activated
                );
            }
        }

        if failure.is_none() && metrics.rooms_changed < 20 {
            failure = Some(format!("tour stalled: only {} room changes", metrics.rooms_changed));
        }
        if failure.is_none() && metrics.regions_activated < 2 {
            failure = Some("storm rotation never fired".to_string());
        }
        if failure.is_none() && metrics.regions_activated > metrics.reloads_requested {
            failure = Some("more activations than load requests".to_string());
        }

        info!(
            "✓ LongHaul complete: {} rooms, {} regions, {} sweeps",
            metrics.rooms_changed, metrics.regions_activated, metrics.sweeps_completed
        );
        self.result(ScenarioId::LongHaul, target_ticks, sim.elapsed_secs(), metrics, failure)
    }

    /// TOUR-002: StormChaser - storm-cycle-driven rotation.
    ///
    /// **Assertion**: the countdown arms with a delay inside its
    /// configured bounds, the remaining time only counts down, and every
    /// arming is followed by exactly one rotation request.
    fn run_storm_chaser(&self) -> ScenarioResult {
        info!("TOUR-002: StormChaser - storm rotation test");

        let mut sim = SimWorld::new(SimConfig {
            seed: self.seed,
            cycle_length_secs: 120.0,
            ..SimConfig::default()
        });
        let config = TourConfig {
            dwell_secs: 5.0,
            transition_secs: 1.0,
            rotation: RotationTrigger::WorldCycle {
                threshold: 0.85,
                min_delay_secs: 5.0,
                max_delay_secs: 10.0,
                hold_until_peak: false,
            },
            ..Default::default()
        };
        let mut tour = TourController::with_regions(config, self.seed, sim.region_codes());

        let dt = self.dt();
        let target_ticks = (self.max_duration_secs / dt) as u64;

        let mut metrics = ScenarioMetrics::default();
        let mut failure = None;
        let mut previous_remaining: Option<f32> = None;

        for _ in 0..target_ticks {
            sim.tick(dt);
            for event in tour.on_tick(&mut sim, dt) {
                metrics.record(&event);
                if let TourEvent::CountdownArmed { delay_secs } = event {
                    if !(5.0..=10.0).contains(&delay_secs) {
                        failure = Some(format!("armed delay {delay_secs}s outside [5, 10]"));
                    }
                }
            }

            let remaining = tour.countdown_remaining_secs();
            if let (Some(prev), Some(now)) = (previous_remaining, remaining) {
                if now > prev + 1e-3 {
                    failure = Some(format!("countdown went up: {prev:.2}s -> {now:.2}s"));
                }
            }
            previous_remaining = remaining;

            if failure.is_some() {
                break;
            }
        }

        if failure.is_none() && metrics.countdowns_armed < 2 {
            failure = Some(format!(
                "expected repeated armings over {} storms, saw {}",
                (self.max_duration_secs / 120.0) as u32,
                metrics.countdowns_armed
            ));
        }
        if failure.is_none() && metrics.reloads_requested + 1 < metrics.countdowns_armed {
            failure = Some(format!(
                "{} armings but only {} rotations",
                metrics.countdowns_armed, metrics.reloads_requested
            ));
        }

        info!(
            "✓ StormChaser complete: {} armings, {} rotations",
            metrics.countdowns_armed, metrics.reloads_requested
        );
        self.result(ScenarioId::StormChaser, target_ticks, sim.elapsed_secs(), metrics, failure)
    }

    /// TOUR-003: GrandSweep - fixed rotation through a full campaign.
    ///
    /// **Assertion**: every region gets activated, the sweep completes
    /// exactly when the visited set covers the campaign, and the reset
    /// campaign keeps touring.
    fn run_grand_sweep(&self) -> ScenarioResult {
        info!("TOUR-003: GrandSweep - full campaign test");

        let num_regions = 4;
        let mut sim = SimWorld::new(SimConfig {
            seed: self.seed,
            num_regions,
            ..SimConfig::default()
        });
        let config = TourConfig {
            dwell_secs: 5.0,
            transition_secs: 1.0,
            rotation: RotationTrigger::FixedDuration { secs: 60.0 },
            ..Default::default()
        };
        let mut tour = TourController::with_regions(config, self.seed, sim.region_codes());

        let dt = self.dt();
        let duration = self.max_duration_secs.max(420.0);
        let target_ticks = (duration / dt) as u64;

        let mut metrics = ScenarioMetrics::default();
        let mut failure = None;
        let mut activated = HashSet::new();

        for _ in 0..target_ticks {
            sim.tick(dt);
            for event in tour.on_tick(&mut sim, dt) {
                metrics.record(&event);
                if let TourEvent::RegionActivated { region, .. } = &event {
                    activated.insert(region.clone());
                }
            }
            if tour.regions_explored() > tour.regions_total() {
                failure = Some("visited count exceeded campaign size".to_string());
                break;
            }
        }

        if failure.is_none() && metrics.sweeps_completed < 1 {
            failure = Some("campaign sweep never completed".to_string());
        }
        if failure.is_none() && activated.len() < num_regions {
            failure = Some(format!(
                "only {}/{} regions activated",
                activated.len(),
                num_regions
            ));
        }

        info!(
            "✓ GrandSweep complete: {} activations across {} regions, {} sweeps",
            metrics.regions_activated,
            activated.len(),
            metrics.sweeps_completed
        );
        self.result(ScenarioId::GrandSweep, target_ticks, sim.elapsed_secs(), metrics, failure)
    }

    /// TOUR-004: GalleryWalk - sequential anchor coverage.
    ///
    /// **Assertion**: in Sequential mode, every completed room stay
    /// rests the camera at exactly as many distinct positions as the
    /// room has anchors.
    fn run_gallery_walk(&self) -> ScenarioResult {
        info!("TOUR-004: GalleryWalk - sequential coverage test");

        let mut sim = SimWorld::new(SimConfig {
            seed: self.seed,
            num_regions: 1,
            rooms_per_region: 6,
            max_anchors_per_room: 4,
            ..SimConfig::default()
        });
        let config = TourConfig {
            dwell_secs: 5.0,
            transition_secs: 1.0,
            camera_mode: CameraMode::Sequential,
            rotation: RotationTrigger::FixedDuration { secs: 1800.0 },
            ..Default::default()
        };
        let mut tour = TourController::with_regions(config, self.seed, sim.region_codes());

        let dt = self.dt();
        let target_ticks = (self.max_duration_secs / dt) as u64;

        let mut metrics = ScenarioMetrics::default();
        let mut failure = None;

        // Distinct camera rest positions observed during the current stay.
        // The stay entered at activation starts with its dwell pre-armed
        // (the camera leaves its entry anchor without resting), so it is
        // not held to the coverage assertion.
        let mut stay_room: Option<String> = None;
        let mut rest_positions: HashSet<(i64, i64)> = HashSet::new();
        let mut stays_checked = 0u32;
        let mut skip_stay = true;

        for _ in 0..target_ticks {
            sim.tick(dt);
            for event in tour.on_tick(&mut sim, dt) {
                if matches!(event, TourEvent::RegionActivated { .. }) {
                    skip_stay = true;
                }
                metrics.record(&event);
            }

            let current = tour.current_room().map(str::to_string);
            if current != stay_room {
                if let Some(previous) = stay_room.take() {
                    if skip_stay {
                        skip_stay = false;
                    } else {
                        let expected = sim.anchor_count(&previous).unwrap_or(0);
                        if rest_positions.len() != expected {
                            failure = Some(format!(
                                "{previous}: rested at {} positions, has {expected} anchors",
                                rest_positions.len()
                            ));
                            break;
                        }
                        stays_checked += 1;
                    }
                }
                stay_room = current;
                rest_positions.clear();
            }

            if stay_room.is_some() && !tour.is_transitioning() && !tour.is_awaiting_world() {
                let pos = sim.camera_position();
                rest_positions
                    .insert(((pos.x * 1000.0) as i64, (pos.y * 1000.0) as i64));
            }
        }

        if failure.is_none() && stays_checked < 5 {
            failure = Some(format!("only {stays_checked} complete stays observed"));
        }

        info!("✓ GalleryWalk complete: {stays_checked} stays fully covered");
        self.result(ScenarioId::GalleryWalk, target_ticks, sim.elapsed_secs(), metrics, failure)
    }

    /// TOUR-005: RestlessEye - force_immediate_change under pressure.
    ///
    /// **Assertion**: every skip lands synchronously (never leaves a
    /// glide in flight) and the tour keeps producing fresh rooms.
    fn run_restless_eye(&self) -> ScenarioResult {
        info!("TOUR-005: RestlessEye - skip spam test");

        let mut sim = SimWorld::new(SimConfig {
            seed: self.seed,
            ..SimConfig::default()
        });
        let config = TourConfig {
            dwell_secs: 60.0,
            transition_secs: 5.0,
            camera_mode: CameraMode::Random,
            rotation: RotationTrigger::FixedDuration { secs: 1800.0 },
            ..Default::default()
        };
        let mut tour = TourController::with_regions(config, self.seed, sim.region_codes());

        let dt = self.dt();
        let duration = self.max_duration_secs.min(300.0);
        let target_ticks = (duration / dt) as u64;

        let mut metrics = ScenarioMetrics::default();
        let mut failure = None;
        let mut skips = 0u64;

        for tick in 0..target_ticks {
            sim.tick(dt);
            for event in tour.on_tick(&mut sim, dt) {
                metrics.record(&event);
            }

            if tick % 10 == 0 && !tour.is_awaiting_world() {
                skips += 1;
                for event in tour.force_immediate_change(&mut sim) {
                    metrics.record(&event);
                }
                if tour.is_transitioning() {
                    failure = Some("skip left a glide in flight".to_string());
                    break;
                }
            }
        }

        if failure.is_none() && metrics.rooms_changed < skips / 2 {
            failure = Some(format!(
                "{} skips produced only {} room changes",
                skips, metrics.rooms_changed
            ));
        }

        info!(
            "✓ RestlessEye complete: {} skips, {} room changes",
            skips, metrics.rooms_changed
        );
        self.result(ScenarioId::RestlessEye, target_ticks, sim.elapsed_secs(), metrics, failure)
    }

    /// TOUR-006: SlowBoat - region loads take 3 seconds.
    ///
    /// **Assertion**: the tour suspends while the world loads (no room
    /// changes mid-load), resumes afterwards, and every load request
    /// eventually activates.
    fn run_slow_boat(&self) -> ScenarioResult {
        info!("TOUR-006: SlowBoat - slow load test");

        let mut sim = SimWorld::new(SimConfig {
            seed: self.seed,
            load_latency_ticks: self.tick_rate_hz * 3,
            ..SimConfig::default()
        });
        let config = TourConfig {
            dwell_secs: 5.0,
            transition_secs: 1.0,
            rotation: RotationTrigger::FixedDuration { secs: 60.0 },
            ..Default::default()
        };
        let mut tour = TourController::with_regions(config, self.seed, sim.region_codes());

        let dt = self.dt();
        let duration = self.max_duration_secs.max(300.0);
        let target_ticks = (duration / dt) as u64;

        let mut metrics = ScenarioMetrics::default();
        let mut failure = None;

        for _ in 0..target_ticks {
            let was_loading = tour.is_awaiting_world();
            sim.tick(dt);
            let events = tour.on_tick(&mut sim, dt);
            for event in &events {
                metrics.record(event);
            }

            if was_loading && tour.is_awaiting_world() {
                if events
                    .iter()
                    .any(|e| matches!(e, TourEvent::RoomChanged { .. }))
                {
                    failure = Some("room changed while the world was loading".to_string());
                    break;
                }
            }
        }

        if failure.is_none() && metrics.regions_activated < 3 {
            failure = Some(format!(
                "tour never got going: {} activations",
                metrics.regions_activated
            ));
        }
        // The last request may still be in flight when time runs out
        if failure.is_none()
            && metrics.reloads_requested > metrics.regions_activated + 1
        {
            failure = Some(format!(
                "{} requests but only {} activations",
                metrics.reloads_requested, metrics.regions_activated
            ));
        }

        info!(
            "✓ SlowBoat complete: {} loads survived",
            metrics.regions_activated
        );
        self.result(ScenarioId::SlowBoat, target_ticks, sim.elapsed_secs(), metrics, failure)
    }

    /// TOUR-007: LockedRoom - room lock held through a storm.
    ///
    /// **Assertion**: while locked, no room change, no rotation, no
    /// countdown arming - even as storm cycles complete. Unlocking lets
    /// the next storm rotate normally.
    fn run_locked_room(&self) -> ScenarioResult {
        info!("TOUR-007: LockedRoom - lock-through-storm test");

        let mut sim = SimWorld::new(SimConfig {
            seed: self.seed,
            cycle_length_secs: 60.0,
            ..SimConfig::default()
        });
        let config = TourConfig {
            dwell_secs: 5.0,
            transition_secs: 1.0,
            rotation: RotationTrigger::WorldCycle {
                threshold: 0.85,
                min_delay_secs: 2.0,
                max_delay_secs: 4.0,
                hold_until_peak: false,
            },
            ..Default::default()
        };
        let mut tour = TourController::with_regions(config, self.seed, sim.region_codes());

        let dt = self.dt();
        let mut metrics = ScenarioMetrics::default();
        let mut failure = None;
        let mut total_ticks = 0u64;

        // Open the tour, then lock the first room
        sim.tick(dt);
        for event in tour.on_tick(&mut sim, dt) {
            metrics.record(&event);
        }
        total_ticks += 1;
        let locked_room = tour.current_room().map(str::to_string);
        if locked_room.is_none() {
            return self.result(
                ScenarioId::LockedRoom,
                total_ticks,
                sim.elapsed_secs(),
                metrics,
                Some("tour failed to open".to_string()),
            );
        }
        if !tour.toggle_room_lock() {
            failure = Some("toggle_room_lock did not engage".to_string());
        }

        // Hold the lock through two and a half storms
        let locked_ticks = (150.0 / dt) as u64;
        for _ in 0..locked_ticks {
            sim.tick(dt);
            let events = tour.on_tick(&mut sim, dt);
            total_ticks += 1;
            for event in &events {
                metrics.record(event);
            }
            if events.iter().any(|e| {
                matches!(
                    e,
                    TourEvent::RoomChanged { .. }
                        | TourEvent::ReloadRequested { .. }
                        | TourEvent::CountdownArmed { .. }
                )
            }) {
                failure = Some("lock was breached".to_string());
                break;
            }
        }
        if failure.is_none() && tour.current_room() != locked_room.as_deref() {
            failure = Some("room changed under lock".to_string());
        }

        // Unlock: the next storm approach should arm and rotate
        if failure.is_none() {
            tour.toggle_room_lock();
            let unlocked_ticks = (150.0 / dt) as u64;
            let mut rotated = false;
            for _ in 0..unlocked_ticks {
                sim.tick(dt);
                total_ticks += 1;
                for event in tour.on_tick(&mut sim, dt) {
                    metrics.record(&event);
                    if matches!(event, TourEvent::ReloadRequested { .. }) {
                        rotated = true;
                    }
                }
                if rotated {
                    break;
                }
            }
            if !rotated {
                failure = Some("tour never rotated after unlock".to_string());
            }
        }

        info!("✓ LockedRoom complete: lock held, then released cleanly");
        self.result(ScenarioId::LockedRoom, total_ticks, sim.elapsed_secs(), metrics, failure)
    }

    /// TOUR-008: ReplayTwins - determinism check.
    ///
    /// **Assertion**: two runs with the same seed produce the identical
    /// event stream; a different seed diverges.
    fn run_replay_twins(&self) -> ScenarioResult {
        info!("TOUR-008: ReplayTwins - determinism test");

        let dt = self.dt();
        let target_ticks = (self.max_duration_secs / dt) as u64;

        let run_once = |seed: u64| -> (Vec<TourEvent>, ScenarioMetrics) {
            let mut sim = SimWorld::new(SimConfig {
                seed,
                cycle_length_secs: 120.0,
                ..SimConfig::default()
            });
            let config = TourConfig {
                dwell_secs: 5.0,
                transition_secs: 1.0,
                rotation: RotationTrigger::WorldCycle {
                    threshold: 0.85,
                    min_delay_secs: 5.0,
                    max_delay_secs: 10.0,
                    hold_until_peak: false,
                },
                ..Default::default()
            };
            let mut tour = TourController::with_regions(config, seed, sim.region_codes());
            let mut all = Vec::new();
            let mut metrics = ScenarioMetrics::default();
            for _ in 0..target_ticks {
                sim.tick(dt);
                for event in tour.on_tick(&mut sim, dt) {
                    metrics.record(&event);
                    all.push(event);
                }
            }
            (all, metrics)
        };

        let (first, metrics) = run_once(self.seed);
        let (second, _) = run_once(self.seed);
        let (other, _) = run_once(self.seed.wrapping_add(1));

        let failure = if first != second {
            Some("same seed produced different tours".to_string())
        } else if first == other {
            Some("different seeds produced identical tours".to_string())
        } else {
            None
        };

        info!(
            "✓ ReplayTwins complete: {} events replayed exactly",
            first.len()
        );
        self.result(
            ScenarioId::ReplayTwins,
            target_ticks * 3,
            self.max_duration_secs,
            metrics,
            failure,
        )
    }

    /// TOUR-009: GateMaze - far more gates than rooms.
    ///
    /// **Assertion**: gates never become destinations even when they
    /// dominate the room list, and the tiny tourable pool keeps cycling
    /// through the history-clear fallback instead of stalling.
    fn run_gate_maze(&self) -> ScenarioResult {
        info!("TOUR-009: GateMaze - gate exclusion test");

        let mut sim = SimWorld::new(SimConfig {
            seed: self.seed,
            num_regions: 2,
            rooms_per_region: 3,
            gates_per_region: 8,
            ..SimConfig::default()
        });
        let config = TourConfig {
            dwell_secs: 5.0,
            transition_secs: 1.0,
            camera_mode: CameraMode::Random,
            rotation: RotationTrigger::FixedDuration { secs: 120.0 },
            ..Default::default()
        };
        let mut tour = TourController::with_regions(config, self.seed, sim.region_codes());

        let dt = self.dt();
        let duration = self.max_duration_secs.min(300.0);
        let target_ticks = (duration / dt) as u64;

        let mut metrics = ScenarioMetrics::default();
        let mut failure = None;

        for _ in 0..target_ticks {
            sim.tick(dt);
            for event in tour.on_tick(&mut sim, dt) {
                metrics.record(&event);
                if let TourEvent::RoomChanged { room } = &event {
                    if room.starts_with(GATE_PREFIX) {
                        failure = Some(format!("toured a gate: {room}"));
                    }
                }
            }
            if failure.is_some() {
                break;
            }
        }

        // Three rooms against a ten-deep history: only the clear-and-
        // retry fallback keeps destinations flowing.
        if failure.is_none() && metrics.rooms_changed < 15 {
            failure = Some(format!(
                "history fallback stalled: {} room changes",
                metrics.rooms_changed
            ));
        }

        info!(
            "✓ GateMaze complete: {} room changes, zero gates",
            metrics.rooms_changed
        );
        self.result(ScenarioId::GateMaze, target_ticks, sim.elapsed_secs(), metrics, failure)
    }

    /// TOUR-010: PeakHold - rotation rides the storm to its peak.
    ///
    /// **Assertion**: with `hold_until_peak` there is no pre-storm
    /// arming at all; every rotation request lands at cycle progress
    /// >= 0.95.
    fn run_peak_hold(&self) -> ScenarioResult {
        info!("TOUR-010: PeakHold - peak-fire test");

        let mut sim = SimWorld::new(SimConfig {
            seed: self.seed,
            cycle_length_secs: 120.0,
            ..SimConfig::default()
        });
        let config = TourConfig {
            dwell_secs: 5.0,
            transition_secs: 1.0,
            rotation: RotationTrigger::WorldCycle {
                threshold: 0.85,
                min_delay_secs: 5.0,
                max_delay_secs: 10.0,
                hold_until_peak: true,
            },
            ..Default::default()
        };
        let mut tour = TourController::with_regions(config, self.seed, sim.region_codes());

        let dt = self.dt();
        let target_ticks = (self.max_duration_secs / dt) as u64;

        let mut metrics = ScenarioMetrics::default();
        let mut failure = None;
        let mut opened = false;

        for _ in 0..target_ticks {
            sim.tick(dt);
            let progress = sim.cycle().progress();
            for event in tour.on_tick(&mut sim, dt) {
                metrics.record(&event);
                match &event {
                    TourEvent::CountdownArmed { .. } => {
                        failure = Some("peak-hold mode armed a delay".to_string());
                    }
                    TourEvent::ReloadRequested { .. } if opened => {
                        let progress = progress.unwrap_or(0.0);
                        if progress < 0.95 {
                            failure = Some(format!(
                                "rotated at progress {progress:.3}, before the peak"
                            ));
                        }
                    }
                    TourEvent::RegionActivated { .. } => opened = true,
                    _ => {}
                }
            }
            if failure.is_some() {
                break;
            }
        }

        if failure.is_none() && metrics.reloads_requested < 3 {
            failure = Some(format!(
                "expected a rotation per storm, saw {}",
                metrics.reloads_requested
            ));
        }

        info!(
            "✓ PeakHold complete: {} peak rotations",
            metrics.reloads_requested
        );
        self.result(ScenarioId::PeakHold, target_ticks, sim.elapsed_secs(), metrics, failure)
    }
}
