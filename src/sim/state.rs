//! Simulation state owned by the view
//!
//! Holds the ball collection, the seeded RNG and the last measured container
//! size. Every operation is a silent no-op until the container is measured.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::ball::{Ball, append_ball, create_balls};
use super::bounds::Bounds;
use super::tick::step;
use crate::settings::{ResizePolicy, Settings};

/// Ball collection plus everything needed to spawn and advance it
#[derive(Debug, Clone)]
pub struct SimState {
    /// Seed the RNG was created from
    pub seed: u64,
    rng: Pcg32,
    bounds: Option<Bounds>,
    balls: Vec<Ball>,
    initial_count: usize,
    resize_policy: ResizePolicy,
    /// Ticks advanced since creation
    pub time_ticks: u64,
}

impl SimState {
    /// Create an empty, unmeasured state
    pub fn new(seed: u64, initial_count: usize, resize_policy: ResizePolicy) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            bounds: None,
            balls: Vec::new(),
            initial_count,
            resize_policy,
            time_ticks: 0,
        }
    }

    pub fn from_settings(settings: &Settings, seed: u64) -> Self {
        Self::new(seed, settings.initial_ball_count, settings.resize_policy)
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Replace the collection with `initial_count` fresh balls
    pub fn initialize(&mut self, bounds: Option<Bounds>) {
        let Some(bounds) = bounds else {
            log::debug!("Container not measurable yet, skipping initialize");
            return;
        };
        self.bounds = Some(bounds);
        self.balls = create_balls(&mut self.rng, self.initial_count, bounds);
        log::info!(
            "Initialized {} balls in {}x{}",
            self.balls.len(),
            bounds.width,
            bounds.height
        );
    }

    /// Re-initialize at the current container size
    pub fn reset(&mut self) {
        self.initialize(self.bounds);
    }

    /// Append one freshly created ball
    pub fn add_ball(&mut self) {
        let Some(bounds) = self.bounds else {
            log::debug!("Container not measurable yet, skipping add");
            return;
        };
        self.balls = append_ball(&self.balls, &mut self.rng, bounds);
        log::info!("Added ball ({} total)", self.balls.len());
    }

    /// React to a new container size according to the resize policy
    pub fn resize(&mut self, bounds: Option<Bounds>) {
        let Some(new_bounds) = bounds else {
            log::debug!("Container not measurable after resize, skipping");
            return;
        };

        match (self.resize_policy, self.bounds) {
            (ResizePolicy::Rescale, Some(old)) => {
                let sx = new_bounds.width / old.width;
                let sy = new_bounds.height / old.height;
                for ball in &mut self.balls {
                    let r = ball.radius;
                    ball.pos.x = (ball.pos.x * sx).min(new_bounds.width - r).max(r);
                    ball.pos.y = (ball.pos.y * sy).min(new_bounds.height - r).max(r);
                }
                self.bounds = Some(new_bounds);
                log::info!("Rescaled balls to {}x{}", new_bounds.width, new_bounds.height);
            }
            // Nothing to rescale before the first measurement
            _ => self.initialize(Some(new_bounds)),
        }
    }

    /// Advance all balls by one tick
    pub fn advance(&mut self) {
        let Some(bounds) = self.bounds else {
            return;
        };
        self.balls = step(&self.balls, bounds);
        self.time_ticks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn measured(count: usize, policy: ResizePolicy) -> SimState {
        let mut state = SimState::new(12345, count, policy);
        state.initialize(Bounds::new(500.0, 400.0));
        state
    }

    #[test]
    fn test_unmeasured_ops_are_noops() {
        let mut state = SimState::new(1, 5, ResizePolicy::Reinitialize);
        state.initialize(None);
        state.add_ball();
        state.advance();
        state.reset();
        state.resize(Bounds::new(0.0, 0.0));

        assert!(state.balls().is_empty());
        assert!(state.bounds().is_none());
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_initialize_count_and_ranges() {
        let state = measured(25, ResizePolicy::Reinitialize);
        assert_eq!(state.balls().len(), 25);
        for ball in state.balls() {
            assert!((MIN_RADIUS..=MAX_RADIUS).contains(&ball.radius));
            assert!((SPAWN_MARGIN..=500.0 - SPAWN_MARGIN).contains(&ball.pos.x));
            assert!((SPAWN_MARGIN..=400.0 - SPAWN_MARGIN).contains(&ball.pos.y));
        }
    }

    #[test]
    fn test_reset_replaces_collection() {
        let mut state = measured(3, ResizePolicy::Reinitialize);
        state.add_ball();
        state.add_ball();
        assert_eq!(state.balls().len(), 5);

        let before = state.balls().to_vec();
        state.reset();
        assert_eq!(state.balls().len(), 3);
        assert_ne!(state.balls(), &before[..3]);
    }

    #[test]
    fn test_add_ball_appends() {
        let mut state = measured(4, ResizePolicy::Reinitialize);
        let before = state.balls().to_vec();
        state.add_ball();

        assert_eq!(state.balls().len(), 5);
        assert_eq!(&state.balls()[..4], &before[..]);
    }

    #[test]
    fn test_advance_counts_ticks() {
        let mut state = measured(2, ResizePolicy::Reinitialize);
        let before = state.balls().to_vec();
        state.advance();
        state.advance();

        assert_eq!(state.time_ticks, 2);
        assert_ne!(state.balls(), &before[..]);
    }

    #[test]
    fn test_resize_reinitializes_by_default() {
        let mut state = measured(3, ResizePolicy::Reinitialize);
        state.add_ball();
        state.resize(Bounds::new(800.0, 600.0));

        assert_eq!(state.balls().len(), 3);
        assert_eq!(state.bounds(), Bounds::new(800.0, 600.0));
    }

    #[test]
    fn test_resize_rescale_keeps_balls() {
        let mut state = measured(6, ResizePolicy::Rescale);
        state.add_ball();
        let before = state.balls().to_vec();
        state.resize(Bounds::new(250.0, 800.0));

        let bounds = state.bounds().unwrap();
        assert_eq!(state.balls().len(), 7);
        for (old, new) in before.iter().zip(state.balls()) {
            assert_eq!(old.vel, new.vel);
            assert_eq!(old.color, new.color);
            assert!((new.radius..=bounds.width - new.radius).contains(&new.pos.x));
            assert!((new.radius..=bounds.height - new.radius).contains(&new.pos.y));
        }
    }

    #[test]
    fn test_rescale_before_measurement_initializes() {
        let mut state = SimState::new(9, 2, ResizePolicy::Rescale);
        state.resize(Bounds::new(300.0, 300.0));
        assert_eq!(state.balls().len(), 2);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = measured(10, ResizePolicy::Reinitialize);
        let mut b = measured(10, ResizePolicy::Reinitialize);
        for _ in 0..100 {
            a.advance();
            b.advance();
        }
        assert_eq!(a.balls(), b.balls());
    }
}
