//! Ball entity and spawning

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bounds::Bounds;
use crate::consts::*;

/// Display palette as 0xRRGGBB
pub const PALETTE: [u32; 7] = [
    0xff6b6b, // coral
    0x4ecdc4, // teal
    0x45b7d1, // sky
    0x96ceb4, // sage
    0xffeaa7, // cream
    0xdda0dd, // plum
    0x98d8c8, // mint
];

/// Palette slot picked when the ball is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BallColor(u8);

impl BallColor {
    /// Palette entry at `index`, wrapping around the palette
    pub fn from_index(index: usize) -> Self {
        Self((index % PALETTE.len()) as u8)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// CSS hex string, e.g. `#ff6b6b`
    pub fn hex(&self) -> String {
        format!("#{:06x}", PALETTE[self.index()])
    }

    /// Linear RGBA for an sRGB render target
    pub fn rgba(&self) -> [f32; 4] {
        let rgb = PALETTE[self.index()];
        let channel = |shift: u32| srgb_to_linear(((rgb >> shift) & 0xff) as f32 / 255.0);
        [channel(16), channel(8), channel(0), 1.0]
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// A ball in container pixel coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub radius: f32,
    pub color: BallColor,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, color: BallColor) -> Self {
        Self {
            pos,
            vel,
            radius,
            color,
        }
    }
}

/// Uniform sample in [SPAWN_MARGIN, extent - SPAWN_MARGIN), or the middle
/// of the axis when that range is empty
fn spawn_coord<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> f32 {
    let hi = extent - SPAWN_MARGIN;
    if hi > SPAWN_MARGIN {
        rng.random_range(SPAWN_MARGIN..hi)
    } else {
        extent / 2.0
    }
}

/// Create a ball with random position, velocity, radius and color
pub fn create_ball<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds) -> Ball {
    let pos = Vec2::new(spawn_coord(rng, bounds.width), spawn_coord(rng, bounds.height));
    let vel = Vec2::new(
        rng.random_range(-MAX_SPAWN_SPEED..MAX_SPAWN_SPEED),
        rng.random_range(-MAX_SPAWN_SPEED..MAX_SPAWN_SPEED),
    );
    let radius = rng.random_range(MIN_RADIUS..MAX_RADIUS);
    let color = BallColor::from_index(rng.random_range(0..PALETTE.len()));
    Ball::new(pos, vel, radius, color)
}

/// Create `count` independent balls
pub fn create_balls<R: Rng + ?Sized>(rng: &mut R, count: usize, bounds: Bounds) -> Vec<Ball> {
    (0..count).map(|_| create_ball(rng, bounds)).collect()
}

/// The collection with one new ball appended at the end
pub fn append_ball<R: Rng + ?Sized>(balls: &[Ball], rng: &mut R, bounds: Bounds) -> Vec<Ball> {
    let mut next = Vec::with_capacity(balls.len() + 1);
    next.extend_from_slice(balls);
    next.push(create_ball(rng, bounds));
    next
}
