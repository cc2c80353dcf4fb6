//! Physics simulation module
//!
//! Everything that moves a ball lives here. This module is pure:
//! - Randomness only at ball creation, from a seeded RNG
//! - One tick per call, no wall-clock time
//! - No rendering or platform dependencies

pub mod ball;
pub mod bounds;
pub mod state;
pub mod tick;

pub use ball::{Ball, BallColor, PALETTE, append_ball, create_ball, create_balls};
pub use bounds::Bounds;
pub use state::SimState;
pub use tick::{step, step_ball};
