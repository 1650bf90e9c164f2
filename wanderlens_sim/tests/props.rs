//! Property tests for the scheduling engines.
//!
//! These exercise the core selection and rotation machinery directly,
//! across arbitrary seeds and inputs, rather than through full scenario
//! runs.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wanderlens_core::config::TourConfig;
use wanderlens_core::countdown::{CountdownStep, CycleCountdown};
use wanderlens_core::rotation::RegionRotation;
use wanderlens_core::selector::{select_room, RoomHistory, VantageState};
use wanderlens_core::transition::ease_in_out_cubic;
use wanderlens_core::CameraMode;
use wanderlens_world::{RegionCode, RoomStub};

fn regions(count: usize) -> Vec<RegionCode> {
    (0..count)
        .map(|i| RegionCode::new(format!("R{:02}", i)))
        .collect()
}

proptest! {
    /// The cursor always points at a real entry, whatever the steps.
    #[test]
    fn rotation_cursor_always_valid(
        seed in any::<u64>(),
        count in 1usize..8,
        steps in prop::collection::vec(-3i64..=3, 0..40),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut rotation = RegionRotation::new(regions(count), &mut rng);
        let order: Vec<RegionCode> = (0..count as i64)
            .filter_map(|i| rotation.peek(i).cloned())
            .collect();

        for step in steps {
            rotation.advance(step);
            let current = rotation.current().expect("non-empty order has a current");
            prop_assert!(order.contains(current));
        }
    }

    /// A forward step followed by a backward step is a round trip.
    #[test]
    fn rotation_forward_backward_round_trips(
        seed in any::<u64>(),
        count in 1usize..8,
        pairs in 1usize..20,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut rotation = RegionRotation::new(regions(count), &mut rng);
        let home = rotation.current().cloned();

        for _ in 0..pairs {
            rotation.advance(1);
            rotation.advance(-1);
        }
        prop_assert_eq!(rotation.current().cloned(), home);
    }

    /// random_unvisited never hands back a region already visited, and
    /// returns None exactly when the sweep is complete.
    #[test]
    fn rotation_unvisited_respects_visited_set(
        seed in any::<u64>(),
        count in 1usize..8,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut rotation = RegionRotation::new(regions(count), &mut rng);
        let mut visited = Vec::new();

        for _ in 0..count {
            let pick = rotation.random_unvisited(&mut rng)
                .expect("sweep not yet complete");
            prop_assert!(!visited.contains(&pick));
            rotation.mark_visited(&pick);
            visited.push(pick);
        }
        prop_assert!(rotation.sweep_complete());
        prop_assert_eq!(rotation.random_unvisited(&mut rng), None);
    }

    /// Room selection never returns a gate, and avoids the history
    /// whenever avoiding it is possible.
    #[test]
    fn room_selection_avoids_gates_and_history(
        seed in any::<u64>(),
        rooms in 1usize..10,
        gates in 0usize..4,
        remembered in 0usize..10,
    ) {
        let mut stubs: Vec<RoomStub> = (0..rooms)
            .map(|i| RoomStub::from_name(format!("R_{:02}", i)))
            .collect();
        stubs.extend((0..gates).map(|i| RoomStub::from_name(format!("GATE_{:02}", i))));

        let mut history = RoomHistory::new(10);
        for i in 0..remembered.min(rooms) {
            history.push(&format!("R_{:02}", i));
        }
        let fresh_exists = remembered.min(rooms) < rooms;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let pick = select_room(&stubs, &mut history, &mut rng).expect("rooms exist");
        prop_assert!(!pick.starts_with("GATE_"));
        if fresh_exists {
            prop_assert!(
                (remembered.min(rooms)..rooms).any(|i| pick == format!("R_{:02}", i)),
                "picked {} from history despite fresh rooms", pick
            );
        }
    }

    /// Sequential mode visits 0, 1, ..., K-1, each exactly once, in order.
    #[test]
    fn sequential_mode_covers_anchors_in_order(
        seed in any::<u64>(),
        count in 1usize..10,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut state = VantageState::enter_room(CameraMode::Sequential, count, &mut rng);

        let mut visited = vec![state.anchor_index()];
        while state.wants_to_stay(CameraMode::Sequential, count) {
            let next = state.next_anchor(CameraMode::Sequential, count, &mut rng)
                .expect("stay implies another anchor");
            visited.push(next);
        }
        prop_assert_eq!(visited, (0..count).collect::<Vec<_>>());
    }

    /// RandomExploration visits between 1 and K distinct anchors per stay.
    #[test]
    fn random_exploration_stays_distinct_and_bounded(
        seed in any::<u64>(),
        count in 1usize..10,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut state = VantageState::enter_room(CameraMode::RandomExploration, count, &mut rng);

        let mut visited = vec![state.anchor_index()];
        while state.wants_to_stay(CameraMode::RandomExploration, count) {
            let next = state.next_anchor(CameraMode::RandomExploration, count, &mut rng)
                .expect("stay implies another anchor");
            prop_assert!(!visited.contains(&next));
            visited.push(next);
        }
        prop_assert!(visited.len() >= 1 && visited.len() <= count);
        prop_assert!(visited.iter().all(|&i| i < count));
    }

    /// Sanitizing a config twice changes nothing the first pass didn't.
    #[test]
    fn config_sanitize_is_idempotent(
        dwell in -100.0f32..1000.0,
        transition in -100.0f32..1000.0,
    ) {
        let config = TourConfig {
            dwell_secs: dwell,
            transition_secs: transition,
            ..Default::default()
        };
        let once = config.sanitized();
        let twice = once.clone().sanitized();
        prop_assert_eq!(once, twice);
    }

    /// The countdown fires at most once per cycle: monotonically rising
    /// progress can produce one Armed and one Fired, never more.
    #[test]
    fn countdown_fires_at_most_once_per_cycle(
        seed in any::<u64>(),
        steps in 10usize..200,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut countdown = CycleCountdown::new(0.85, 1.0, 2.0, false);

        let mut armed = 0;
        let mut fired = 0;
        for step in 0..steps {
            let progress = (step as f32 / steps as f32).min(1.0);
            match countdown.observe(Some(progress), 0.5, &mut rng) {
                CountdownStep::Armed { .. } => armed += 1,
                CountdownStep::Fired => fired += 1,
                CountdownStep::Idle => {}
            }
        }
        prop_assert!(armed <= 1, "armed {} times in one cycle", armed);
        prop_assert!(fired <= 1, "fired {} times in one cycle", fired);
        prop_assert!(fired <= armed);
    }

    /// The ease curve is monotone on [0, 1] with fixed endpoints.
    #[test]
    fn ease_curve_is_monotone(samples in 2usize..200) {
        let mut previous = ease_in_out_cubic(0.0);
        prop_assert!(previous.abs() < 1e-6);
        for i in 1..=samples {
            let t = i as f32 / samples as f32;
            let value = ease_in_out_cubic(t);
            prop_assert!(value + 1e-6 >= previous, "ease dipped at t={}", t);
            previous = value;
        }
        prop_assert!((ease_in_out_cubic(1.0) - 1.0).abs() < 1e-6);
        prop_assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
    }
}
