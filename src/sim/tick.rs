//! Per-tick physics update
//!
//! Order matters and is fixed: integrate, resolve walls, add gravity, damp.
//! Gravity is added after the wall response, so a ball clamped to the floor
//! still picks up this tick's gravity, and damping shaves a little off it.

use super::ball::Ball;
use super::bounds::Bounds;
use crate::consts::*;

/// Keep `value` in [radius, extent - radius]; ends at `radius` if the
/// container is narrower than the ball
#[inline]
fn clamp_to_wall(value: f32, radius: f32, extent: f32) -> f32 {
    value.min(extent - radius).max(radius)
}

/// Advance a single ball by one tick
pub fn step_ball(ball: &Ball, bounds: Bounds) -> Ball {
    let mut next = *ball;
    let r = next.radius;

    next.pos += next.vel;

    if next.pos.x + r > bounds.width || next.pos.x - r < 0.0 {
        next.vel.x = -next.vel.x * RESTITUTION;
        next.pos.x = clamp_to_wall(next.pos.x, r, bounds.width);
    }

    if next.pos.y + r > bounds.height || next.pos.y - r < 0.0 {
        next.vel.y = -next.vel.y * RESTITUTION;
        next.pos.y = clamp_to_wall(next.pos.y, r, bounds.height);
    }

    next.vel.y += GRAVITY;
    next.vel *= DAMPING;

    next
}

/// Advance every ball by one tick, producing the next collection
pub fn step(balls: &[Ball], bounds: Bounds) -> Vec<Ball> {
    balls.iter().map(|ball| step_ball(ball, bounds)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::BallColor;
    use glam::Vec2;
    use proptest::prelude::*;

    fn ball(x: f32, y: f32, vx: f32, vy: f32, radius: f32) -> Ball {
        Ball::new(Vec2::new(x, y), Vec2::new(vx, vy), radius, BallColor::from_index(0))
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_free_fall_first_tick() {
        let bounds = Bounds::new(500.0, 500.0).unwrap();
        let next = step_ball(&ball(250.0, 250.0, 0.0, 0.0, 15.0), bounds);

        // Integration used the pre-gravity velocity
        assert_eq!(next.pos, Vec2::new(250.0, 250.0));
        assert_eq!(next.vel.x, 0.0);
        assert!(approx(next.vel.y, 0.3 * 0.999), "vy = {}", next.vel.y);
    }

    #[test]
    fn test_left_wall_bounce() {
        let bounds = Bounds::new(500.0, 500.0).unwrap();
        let next = step_ball(&ball(5.0, 250.0, -3.0, 0.0, 10.0), bounds);

        assert_eq!(next.pos.x, 10.0);
        assert!(approx(next.vel.x, 3.0 * 0.98 * 0.999), "vx = {}", next.vel.x);
    }

    #[test]
    fn test_right_wall_bounce() {
        let bounds = Bounds::new(200.0, 500.0).unwrap();
        let next = step_ball(&ball(188.0, 250.0, 4.0, 0.0, 10.0), bounds);

        assert_eq!(next.pos.x, 190.0);
        assert!(approx(next.vel.x, -4.0 * 0.98 * 0.999));
    }

    #[test]
    fn test_floor_bounce_still_gets_gravity() {
        let bounds = Bounds::new(500.0, 500.0).unwrap();
        let next = step_ball(&ball(250.0, 488.0, 0.0, 5.0, 10.0), bounds);

        assert_eq!(next.pos.y, 490.0);
        // Reversed and damped by restitution, then gravity, then damping
        assert!(approx(next.vel.y, (-5.0 * 0.98 + 0.3) * 0.999), "vy = {}", next.vel.y);
    }

    #[test]
    fn test_ceiling_bounce() {
        let bounds = Bounds::new(500.0, 500.0).unwrap();
        let next = step_ball(&ball(250.0, 12.0, 0.0, -4.0, 10.0), bounds);

        assert_eq!(next.pos.y, 10.0);
        assert!(approx(next.vel.y, (4.0 * 0.98 + 0.3) * 0.999));
    }

    #[test]
    fn test_corner_bounce_hits_both_walls() {
        let bounds = Bounds::new(100.0, 100.0).unwrap();
        let next = step_ball(&ball(88.0, 88.0, 4.0, 4.0, 10.0), bounds);

        assert_eq!(next.pos, Vec2::new(90.0, 90.0));
        assert!(next.vel.x < 0.0);
        assert!(next.vel.y < 0.0);
    }

    #[test]
    fn test_container_narrower_than_ball() {
        let bounds = Bounds::new(15.0, 500.0).unwrap();
        let next = step_ball(&ball(7.0, 250.0, 1.0, 0.0, 10.0), bounds);
        assert_eq!(next.pos.x, 10.0);
    }

    #[test]
    fn test_step_preserves_order_and_color() {
        let bounds = Bounds::new(300.0, 300.0).unwrap();
        let balls = vec![
            Ball::new(Vec2::new(50.0, 50.0), Vec2::ZERO, 10.0, BallColor::from_index(2)),
            Ball::new(Vec2::new(150.0, 150.0), Vec2::ZERO, 20.0, BallColor::from_index(5)),
        ];
        let next = step(&balls, bounds);

        assert_eq!(next.len(), 2);
        assert_eq!(next[0].color, BallColor::from_index(2));
        assert_eq!(next[1].radius, 20.0);
        assert_eq!(next[1].color, BallColor::from_index(5));
    }

    #[test]
    fn test_resting_ball_settles_on_floor() {
        let bounds = Bounds::new(400.0, 300.0).unwrap();
        let mut balls = vec![ball(200.0, 100.0, 0.0, 0.0, 20.0)];
        for _ in 0..5000 {
            balls = step(&balls, bounds);
        }
        assert!(balls[0].pos.y > 270.0, "y = {}", balls[0].pos.y);
        assert!((20.0..=380.0).contains(&balls[0].pos.x));
        assert!(balls[0].pos.y <= 280.0);
    }

    fn arb_ball(width: f32, height: f32) -> impl Strategy<Value = Ball> {
        (
            -50.0f32..width + 50.0,
            -50.0f32..height + 50.0,
            -40.0f32..40.0,
            -40.0f32..40.0,
            MIN_RADIUS..MAX_RADIUS,
            0usize..7,
        )
            .prop_map(|(x, y, vx, vy, r, c)| {
                Ball::new(Vec2::new(x, y), Vec2::new(vx, vy), r, BallColor::from_index(c))
            })
    }

    proptest! {
        #[test]
        fn prop_step_keeps_balls_inside(
            (w, h, balls) in (60.0f32..1200.0, 60.0f32..900.0)
                .prop_flat_map(|(w, h)| (Just(w), Just(h), prop::collection::vec(arb_ball(w, h), 1..20)))
        ) {
            let bounds = Bounds::new(w, h).unwrap();
            // Edge tests and clamps round independently
            let eps = 1e-3;
            for next in step(&balls, bounds) {
                prop_assert!(next.pos.x >= next.radius - eps && next.pos.x <= w - next.radius + eps);
                prop_assert!(next.pos.y >= next.radius - eps && next.pos.y <= h - next.radius + eps);
            }
        }

        #[test]
        fn prop_step_is_deterministic(
            balls in prop::collection::vec(arb_ball(640.0, 480.0), 0..20)
        ) {
            let bounds = Bounds::new(640.0, 480.0).unwrap();
            prop_assert_eq!(step(&balls, bounds), step(&balls, bounds));
        }
    }
}
