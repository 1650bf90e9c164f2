//! World-cycle countdown.
//!
//! Watches the world's cycle clock and decides when to rotate regions
//! ahead of the storm. Once progress crosses the arming threshold, a
//! random pre-storm delay starts; when it elapses the countdown fires
//! and the controller rotates. One arming per cycle - a wrap in the
//! progress stream (the storm landed and the world reset) re-enables it.

use rand::Rng;

use crate::config::RotationTrigger;

/// Cycle progress at which a peak-hold countdown fires.
pub const PEAK_FIRE_THRESHOLD: f32 = 0.95;

/// What the countdown did on a given observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountdownStep {
    /// Nothing to report
    Idle,

    /// The pre-storm delay just armed
    Armed { delay_secs: f32 },

    /// The delay elapsed (or the peak was reached): rotate now
    Fired,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ArmedTimer {
    delay_secs: f32,
    elapsed_secs: f32,
}

/// Pre-storm region rotation timer.
#[derive(Debug, Clone)]
pub struct CycleCountdown {
    threshold: f32,
    min_delay_secs: f32,
    max_delay_secs: f32,
    hold_until_peak: bool,

    armed: Option<ArmedTimer>,
    triggered_this_cycle: bool,
    last_progress: f32,
    frozen: bool,
}

impl CycleCountdown {
    /// Creates a countdown with explicit parameters.
    pub fn new(
        threshold: f32,
        min_delay_secs: f32,
        max_delay_secs: f32,
        hold_until_peak: bool,
    ) -> Self {
        Self {
            threshold,
            min_delay_secs,
            max_delay_secs,
            hold_until_peak,
            armed: None,
            triggered_this_cycle: false,
            last_progress: 0.0,
            frozen: false,
        }
    }

    /// Builds a countdown from a rotation trigger, or `None` for
    /// fixed-duration rotation.
    pub fn from_trigger(trigger: &RotationTrigger) -> Option<Self> {
        match trigger {
            RotationTrigger::FixedDuration { .. } => None,
            RotationTrigger::WorldCycle {
                threshold,
                min_delay_secs,
                max_delay_secs,
                hold_until_peak,
            } => Some(Self::new(
                *threshold,
                *min_delay_secs,
                *max_delay_secs,
                *hold_until_peak,
            )),
        }
    }

    /// Feeds one tick of cycle progress into the countdown.
    ///
    /// `progress` of `None` means the world has no cycle; the countdown
    /// idles entirely. Wrap detection (progress moving backwards) always
    /// runs, even while frozen, so a storm landing under a room lock
    /// still re-enables the next cycle's arming.
    pub fn observe(
        &mut self,
        progress: Option<f32>,
        dt: f32,
        rng: &mut impl Rng,
    ) -> CountdownStep {
        let Some(progress) = progress else {
            return CountdownStep::Idle;
        };

        if progress < self.last_progress {
            self.triggered_this_cycle = false;
        }
        self.last_progress = progress;

        if self.frozen {
            return CountdownStep::Idle;
        }

        if self.hold_until_peak {
            if !self.triggered_this_cycle && progress >= PEAK_FIRE_THRESHOLD {
                self.triggered_this_cycle = true;
                return CountdownStep::Fired;
            }
            return CountdownStep::Idle;
        }

        if let Some(timer) = &mut self.armed {
            timer.elapsed_secs += dt;
            if timer.elapsed_secs >= timer.delay_secs {
                self.armed = None;
                return CountdownStep::Fired;
            }
            return CountdownStep::Idle;
        }

        if !self.triggered_this_cycle && progress >= self.threshold {
            let delay_secs = rng.gen_range(self.min_delay_secs..=self.max_delay_secs);
            self.armed = Some(ArmedTimer {
                delay_secs,
                elapsed_secs: 0.0,
            });
            self.triggered_this_cycle = true;
            return CountdownStep::Armed { delay_secs };
        }

        CountdownStep::Idle
    }

    /// Clears all countdown state. Called on region change: the fresh
    /// cycle may already be past the threshold, in which case the next
    /// observation re-arms immediately with a fresh delay.
    pub fn reset(&mut self) {
        self.armed = None;
        self.triggered_this_cycle = false;
        self.last_progress = 0.0;
    }

    /// Freezes or thaws the countdown (room lock).
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    /// True while the pre-storm delay is running.
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Seconds until the countdown fires, if armed.
    pub fn remaining_secs(&self) -> Option<f32> {
        self.armed
            .map(|timer| (timer.delay_secs - timer.elapsed_secs).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn countdown() -> CycleCountdown {
        CycleCountdown::new(0.85, 60.0, 180.0, false)
    }

    /// Drives progress linearly from `start` at `rate` per observation
    /// until the countdown fires or `max_steps` elapse.
    fn drive_until_fired(
        cd: &mut CycleCountdown,
        rng: &mut ChaCha8Rng,
        start: f32,
        dt: f32,
        max_steps: usize,
    ) -> (Option<f32>, usize) {
        let mut armed_delay = None;
        for step in 0..max_steps {
            let progress = (start + step as f32 * 0.0001).min(1.0);
            match cd.observe(Some(progress), dt, rng) {
                CountdownStep::Armed { delay_secs } => armed_delay = Some(delay_secs),
                CountdownStep::Fired => return (armed_delay, step),
                CountdownStep::Idle => {}
            }
        }
        (armed_delay, max_steps)
    }

    #[test]
    fn test_arms_once_when_threshold_crossed() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut cd = countdown();

        assert_eq!(cd.observe(Some(0.5), 1.0, &mut rng), CountdownStep::Idle);
        assert!(!cd.is_armed());

        let step = cd.observe(Some(0.86), 1.0, &mut rng);
        let CountdownStep::Armed { delay_secs } = step else {
            panic!("expected arming, got {step:?}");
        };
        assert!((60.0..=180.0).contains(&delay_secs));
        assert!(cd.is_armed());

        // No second arming while this cycle is live
        for _ in 0..5 {
            let step = cd.observe(Some(0.87), 0.1, &mut rng);
            assert_ne!(step, CountdownStep::Armed { delay_secs });
        }
    }

    #[test]
    fn test_delay_always_within_bounds() {
        for seed in 0..100 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut cd = countdown();
            let step = cd.observe(Some(0.9), 1.0, &mut rng);
            let CountdownStep::Armed { delay_secs } = step else {
                panic!("expected arming");
            };
            assert!(
                (60.0..=180.0).contains(&delay_secs),
                "delay {delay_secs} out of bounds for seed {seed}"
            );
        }
    }

    #[test]
    fn test_fires_after_its_delay() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut cd = countdown();

        let (delay, steps) = drive_until_fired(&mut cd, &mut rng, 0.86, 1.0, 400);
        let delay = delay.expect("never armed");
        // Armed on step 0, so firing happens on ceil(delay) observations
        assert!((steps as f32 - delay).abs() <= 1.0);
        assert!(!cd.is_armed());
    }

    #[test]
    fn test_remaining_secs_counts_down() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut cd = countdown();

        cd.observe(Some(0.9), 1.0, &mut rng);
        let first = cd.remaining_secs().unwrap();
        cd.observe(Some(0.9), 10.0, &mut rng);
        let second = cd.remaining_secs().unwrap();
        assert!((first - second - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_armed_delay_survives_cycle_wrap() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut cd = countdown();

        cd.observe(Some(0.9), 1.0, &mut rng);
        assert!(cd.is_armed());

        // Storm lands: progress wraps to near zero, timer keeps running
        let mut fired = false;
        for _ in 0..300 {
            if cd.observe(Some(0.01), 1.0, &mut rng) == CountdownStep::Fired {
                fired = true;
                break;
            }
        }
        assert!(fired, "armed delay should elapse across a wrap");
    }

    #[test]
    fn test_wrap_reenables_arming() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut cd = countdown();

        // First cycle: arm and fire
        cd.observe(Some(0.9), 1.0, &mut rng);
        drive_until_fired(&mut cd, &mut rng, 0.9, 1.0, 400);

        // Still the same cycle: no re-arm
        assert_eq!(cd.observe(Some(0.95), 1.0, &mut rng), CountdownStep::Idle);

        // Wrap, then climb again: fresh arming
        cd.observe(Some(0.02), 1.0, &mut rng);
        assert!(matches!(
            cd.observe(Some(0.88), 1.0, &mut rng),
            CountdownStep::Armed { .. }
        ));
    }

    #[test]
    fn test_reset_rearms_immediately_past_threshold() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut cd = countdown();

        cd.observe(Some(0.9), 1.0, &mut rng);
        cd.reset();
        assert!(!cd.is_armed());

        // Fresh cycle already deep into the storm window
        assert!(matches!(
            cd.observe(Some(0.93), 1.0, &mut rng),
            CountdownStep::Armed { .. }
        ));
    }

    #[test]
    fn test_frozen_neither_arms_nor_elapses() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut cd = countdown();

        cd.set_frozen(true);
        assert_eq!(cd.observe(Some(0.95), 1.0, &mut rng), CountdownStep::Idle);
        assert!(!cd.is_armed());

        cd.set_frozen(false);
        cd.observe(Some(0.95), 1.0, &mut rng);
        let before = cd.remaining_secs().unwrap();

        cd.set_frozen(true);
        for _ in 0..100 {
            assert_eq!(cd.observe(Some(0.96), 5.0, &mut rng), CountdownStep::Idle);
        }
        assert_eq!(cd.remaining_secs(), Some(before));
    }

    #[test]
    fn test_frozen_still_sees_wraps() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut cd = countdown();

        // Arm and fire in cycle one
        cd.observe(Some(0.9), 1.0, &mut rng);
        drive_until_fired(&mut cd, &mut rng, 0.9, 1.0, 400);

        // Freeze through the wrap
        cd.set_frozen(true);
        cd.observe(Some(0.01), 1.0, &mut rng);
        cd.set_frozen(false);

        // The new cycle can arm
        assert!(matches!(
            cd.observe(Some(0.9), 1.0, &mut rng),
            CountdownStep::Armed { .. }
        ));
    }

    #[test]
    fn test_no_cycle_means_idle() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut cd = countdown();
        for _ in 0..10 {
            assert_eq!(cd.observe(None, 10.0, &mut rng), CountdownStep::Idle);
        }
        assert!(!cd.is_armed());
    }

    #[test]
    fn test_peak_hold_skips_the_random_delay() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut cd = CycleCountdown::new(0.85, 60.0, 180.0, true);

        // Crossing the arming threshold does nothing in peak-hold mode
        assert_eq!(cd.observe(Some(0.90), 1.0, &mut rng), CountdownStep::Idle);
        assert!(!cd.is_armed());
        assert_eq!(cd.remaining_secs(), None);

        // Firing happens exactly at the peak
        assert_eq!(cd.observe(Some(0.94), 1.0, &mut rng), CountdownStep::Idle);
        assert_eq!(cd.observe(Some(0.95), 1.0, &mut rng), CountdownStep::Fired);

        // Once per cycle
        assert_eq!(cd.observe(Some(0.99), 1.0, &mut rng), CountdownStep::Idle);

        // Next cycle fires again
        cd.observe(Some(0.05), 1.0, &mut rng);
        assert_eq!(cd.observe(Some(0.97), 1.0, &mut rng), CountdownStep::Fired);
    }

    #[test]
    fn test_from_trigger() {
        assert!(CycleCountdown::from_trigger(&RotationTrigger::FixedDuration { secs: 300.0 })
            .is_none());
        let cd = CycleCountdown::from_trigger(&RotationTrigger::default()).unwrap();
        assert!(!cd.is_armed());
    }
}
