//! SimWorld - a seeded synthetic world for scenario runs.
//!
//! Builds a [`StaticWorld`] from nothing but a seed: region codes, room
//! names, gate corridors, and camera anchors are all generated with a
//! `ChaCha8Rng`, so two runs with the same config see the same world.
//! On top of the static substrate it adds the two things scenarios need
//! to control: a running cycle clock and configurable region-load
//! latency.

use nalgebra::Vector2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::collections::HashMap;
use tracing::debug;
use wanderlens_world::{
    CyclePhase, RegionCode, RegionTemplate, RoomStub, StaticWorld, WorldError, WorldModel,
};

/// Configuration for a synthetic world.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Number of regions to generate
    pub num_regions: usize,

    /// Tourable rooms per region
    pub rooms_per_region: usize,

    /// Connector gates per region
    pub gates_per_region: usize,

    /// Camera anchors per room, drawn uniformly from `1..=max`
    pub max_anchors_per_room: usize,

    /// Cycle (storm) length in seconds (0 = no cycle)
    pub cycle_length_secs: f32,

    /// Ticks a region load takes (0 = instant loads)
    pub load_latency_ticks: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_regions: 5,
            rooms_per_region: 8,
            gates_per_region: 1,
            max_anchors_per_room: 5,
            cycle_length_secs: 600.0,
            load_latency_ticks: 0,
        }
    }
}

/// A generated world the scenario runner drives a tour against.
pub struct SimWorld {
    config: SimConfig,
    inner: StaticWorld,
    regions: Vec<RegionCode>,
    anchor_counts: HashMap<String, usize>,
    load_remaining: u32,
    elapsed_secs: f32,
}

impl SimWorld {
    /// Generates a world from the given configuration.
    pub fn new(config: SimConfig) -> Self {
        // Layout gets its own seed stream so scenario-level RNG use
        // never shifts the world geometry.
        let layout_seed = config.seed.wrapping_mul(0x9e3779b97f4a7c15);
        let mut rng = ChaCha8Rng::seed_from_u64(layout_seed);
        let scatter = Normal::new(0.0f32, 300.0).expect("valid std dev");

        let mut inner = StaticWorld::new();
        if config.load_latency_ticks > 0 {
            inner = inner.with_manual_loads();
        }

        let mut regions = Vec::with_capacity(config.num_regions);
        let mut anchor_counts = HashMap::new();

        for region_index in 0..config.num_regions {
            let code = format!("Z{:02}", region_index + 1);
            let center = Vector2::new(region_index as f32 * 2000.0, 0.0);

            let mut template =
                RegionTemplate::new(&code).cycle_length(config.cycle_length_secs);

            for room_index in 0..config.rooms_per_region {
                let letter = (b'A' + (room_index % 26) as u8) as char;
                let name = format!("{}_{}{:02}", code, letter, room_index + 1);

                let count = rng.gen_range(1..=config.max_anchors_per_room.max(1));
                let anchors: Vec<Vector2<f32>> = (0..count)
                    .map(|_| {
                        center
                            + Vector2::new(scatter.sample(&mut rng), scatter.sample(&mut rng))
                    })
                    .collect();

                anchor_counts.insert(name.clone(), count);
                if room_index == 0 {
                    template = template.start_room(&name);
                }
                template = template.room(&name, anchors);
            }

            for gate_index in 0..config.gates_per_region {
                template = template.gate(&format!("GATE_{}_{:02}", code, gate_index + 1));
            }

            regions.push(template.code().clone());
            inner = inner.with_region(template);
        }

        debug!(
            regions = regions.len(),
            rooms = anchor_counts.len(),
            seed = config.seed,
            "synthetic world generated"
        );

        Self {
            config,
            inner,
            regions,
            anchor_counts,
            load_remaining: 0,
            elapsed_secs: 0.0,
        }
    }

    /// Advances the world by one tick: the cycle clock runs and any
    /// pending region load gets one tick closer to completing.
    pub fn tick(&mut self, dt: f32) {
        self.inner.advance_cycle(dt);
        self.elapsed_secs += dt;
        if self.load_remaining > 0 {
            self.load_remaining -= 1;
            if self.load_remaining == 0 {
                self.inner.finish_load();
            }
        }
    }

    /// All generated region codes, in generation order.
    pub fn region_codes(&self) -> Vec<RegionCode> {
        self.regions.clone()
    }

    /// Anchor count of a generated room (gates have none).
    pub fn anchor_count(&self, room: &str) -> Option<usize> {
        self.anchor_counts.get(room).copied()
    }

    /// Virtual seconds elapsed since construction.
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_secs
    }

    /// Pins the cycle clock (scenarios that jump straight to a phase).
    pub fn set_cycle(&mut self, timer_secs: f32, length_secs: f32) {
        self.inner.set_cycle(timer_secs, length_secs);
    }
}

impl WorldModel for SimWorld {
    fn loaded_region(&self) -> Option<&RegionCode> {
        self.inner.loaded_region()
    }

    fn rooms(&self) -> &[RoomStub] {
        self.inner.rooms()
    }

    fn start_room(&self) -> Option<&str> {
        self.inner.start_room()
    }

    fn realize_room(&mut self, name: &str) -> Result<Vec<Vector2<f32>>, WorldError> {
        self.inner.realize_room(name)
    }

    fn abstractize_room(&mut self, name: &str) {
        self.inner.abstractize_room(name)
    }

    fn cycle(&self) -> CyclePhase {
        self.inner.cycle()
    }

    fn camera_position(&self) -> Vector2<f32> {
        self.inner.camera_position()
    }

    fn set_camera_position(&mut self, position: Vector2<f32>) {
        self.inner.set_camera_position(position)
    }

    fn request_region(&mut self, region: &RegionCode) {
        self.inner.request_region(region);
        self.load_remaining = self.config.load_latency_ticks;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let a = SimWorld::new(SimConfig::default());
        let b = SimWorld::new(SimConfig::default());
        assert_eq!(a.region_codes(), b.region_codes());
        assert_eq!(a.anchor_counts, b.anchor_counts);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = SimWorld::new(SimConfig::default());
        let b = SimWorld::new(SimConfig {
            seed: 43,
            ..SimConfig::default()
        });
        // Same room names, different anchor layouts
        assert_eq!(a.region_codes(), b.region_codes());
        assert_ne!(a.anchor_counts, b.anchor_counts);
    }

    #[test]
    fn test_every_region_has_rooms_and_gates() {
        let mut world = SimWorld::new(SimConfig {
            gates_per_region: 2,
            ..SimConfig::default()
        });
        for code in world.region_codes() {
            world.request_region(&code);
            let rooms = world.rooms();
            assert_eq!(rooms.len(), 10, "8 rooms + 2 gates");
            assert_eq!(rooms.iter().filter(|r| r.gate).count(), 2);
            assert!(world.start_room().is_some());
        }
    }

    #[test]
    fn test_load_latency_delays_activation() {
        let mut world = SimWorld::new(SimConfig {
            load_latency_ticks: 3,
            ..SimConfig::default()
        });
        let code = world.region_codes()[0].clone();
        world.request_region(&code);

        assert_eq!(world.loaded_region(), None);
        world.tick(0.1);
        world.tick(0.1);
        assert_eq!(world.loaded_region(), None);
        world.tick(0.1);
        assert_eq!(world.loaded_region(), Some(&code));
    }

    #[test]
    fn test_anchor_counts_within_bounds() {
        let world = SimWorld::new(SimConfig {
            max_anchors_per_room: 3,
            ..SimConfig::default()
        });
        for (room, &count) in &world.anchor_counts {
            assert!((1..=3).contains(&count), "{room} has {count} anchors");
        }
    }
}
