//! Per-frame fish motion
//!
//! Open water fish drift, tumble in turbulence that grows with chaos and wrap
//! around the screen. Archived fish bounce gently inside the archive band.
//! Locked fish are left untouched.

use glam::Vec2;

use super::fish::Fish;
use super::rng::RandomSource;
use super::state::Viewport;
use crate::consts::*;
use crate::{normalize_degrees, wrap_coordinate};

/// Advance one fish by one frame and return its next state.
///
/// `chaos_factor` is chaos as a fraction in [0, 1]; `frame` is the session
/// frame counter that drives the drift oscillation.
pub fn step_fish(
    fish: &Fish,
    chaos_factor: f32,
    frame: u64,
    viewport: &Viewport,
    rng: &mut dyn RandomSource,
) -> Fish {
    if fish.locked {
        return fish.clone();
    }
    if fish.collected {
        return drift_in_archive(fish, viewport);
    }
    swim_open_water(fish, chaos_factor, frame, viewport, rng)
}

/// Advance every fish, producing the next collection
pub fn step_all(
    fishes: &[Fish],
    chaos_factor: f32,
    frame: u64,
    viewport: &Viewport,
    rng: &mut dyn RandomSource,
) -> Vec<Fish> {
    fishes
        .iter()
        .map(|fish| step_fish(fish, chaos_factor, frame, viewport, rng))
        .collect()
}

fn drift_in_archive(fish: &Fish, viewport: &Viewport) -> Fish {
    let (lo_x, hi_x) = (ARCHIVE_EDGE_MARGIN, viewport.width - ARCHIVE_EDGE_MARGIN);
    let (lo_y, hi_y) = (ARCHIVE_EDGE_MARGIN, viewport.archive_limit() - ARCHIVE_EDGE_MARGIN);

    let mut pos = fish.pos + fish.vel;
    let mut vel = fish.vel;

    if pos.x <= lo_x || pos.x >= hi_x {
        vel.x = -vel.x;
    }
    if pos.y <= lo_y || pos.y >= hi_y {
        vel.y = -vel.y;
    }
    // max/min rather than clamp: a band narrower than its margins must not panic
    pos.x = pos.x.min(hi_x).max(lo_x);
    pos.y = pos.y.min(hi_y).max(lo_y);

    Fish {
        pos,
        vel,
        rotation: fish.rotation + ARCHIVE_SPIN_DEG,
        ..fish.clone()
    }
}

fn swim_open_water(
    fish: &Fish,
    chaos_factor: f32,
    frame: u64,
    viewport: &Viewport,
    rng: &mut dyn RandomSource,
) -> Fish {
    let time = frame as f32 * FRAME_DT;
    let amplitude = DRIFT_BASE + chaos_factor * DRIFT_CHAOS_GAIN;
    let drift = (time + fish.drift_phase).sin() * amplitude;

    let turbulence_x = rng.jitter(0.5) * chaos_factor * TURBULENCE;
    let turbulence_y = rng.jitter(0.5) * chaos_factor * TURBULENCE;

    let mut vel = fish.vel + Vec2::new(drift + turbulence_x, turbulence_y - BUOYANCY);
    vel *= DRAG;
    if vel.length() > VELOCITY_CAP {
        vel = vel.normalize() * VELOCITY_CAP;
    }

    let moved = fish.pos + vel;

    let heading = vel.y.atan2(vel.x).to_degrees();
    let turn = normalize_degrees(heading - fish.rotation);
    let rotation = fish.rotation + turn * TURN_EASE;

    let pos = Vec2::new(
        wrap_coordinate(moved.x, viewport.width, WRAP_MARGIN),
        wrap_coordinate(moved.y, viewport.height, WRAP_MARGIN),
    );

    Fish {
        pos,
        vel,
        rotation,
        ..fish.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fish::{FishColor, FishId, FishKind, FishShape};
    use crate::sim::rng::{ScriptedRng, seeded};
    use proptest::prelude::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn fish_at(pos: Vec2, vel: Vec2) -> Fish {
        Fish {
            id: FishId(1),
            pos,
            vel,
            rotation: 0.0,
            color: FishColor::Red,
            shape: FishShape::Round,
            scale: 1.0,
            kind: FishKind::Normal,
            locked: false,
            collected: false,
            name: None,
            drift_phase: 0.0,
        }
    }

    #[test]
    fn test_locked_fish_untouched() {
        let mut fish = fish_at(Vec2::new(100.0, 100.0), Vec2::new(3.0, 3.0));
        fish.locked = true;
        let mut rng = ScriptedRng::constant(0.9);
        assert_eq!(step_fish(&fish, 1.0, 10, &viewport(), &mut rng), fish);
    }

    #[test]
    fn test_calm_water_drag_and_buoyancy() {
        // No chaos, frame 0, phase 0: drift sin(0) = 0, turbulence scaled to 0
        let fish = fish_at(Vec2::new(400.0, 300.0), Vec2::new(1.0, 0.0));
        let mut rng = ScriptedRng::constant(0.9);
        let next = step_fish(&fish, 0.0, 0, &viewport(), &mut rng);
        assert!((next.vel.x - 0.95).abs() < 1e-6);
        assert!((next.vel.y - (-0.02 * 0.95)).abs() < 1e-6);
        assert!((next.pos.x - 400.95).abs() < 1e-4);
        assert!((next.pos.y - (300.0 - 0.019)).abs() < 1e-4);
    }

    #[test]
    fn test_speed_capped_preserving_direction() {
        let fish = fish_at(Vec2::new(400.0, 300.0), Vec2::new(30.0, 40.0));
        let mut rng = ScriptedRng::constant(0.5);
        let next = step_fish(&fish, 0.0, 0, &viewport(), &mut rng);
        assert!((next.vel.length() - VELOCITY_CAP).abs() < 1e-4);
        let dir = next.vel.normalize();
        let expected = Vec2::new(30.0 * 0.95, (40.0 - 0.02) * 0.95).normalize();
        assert!((dir - expected).length() < 1e-4);
    }

    #[test]
    fn test_rotation_eases_along_shortest_arc() {
        // Heading ~180 degrees, current rotation -170: shortest turn is -10
        let mut fish = fish_at(Vec2::new(400.0, 300.0), Vec2::new(-1.0, 0.02));
        fish.rotation = -170.0;
        let mut rng = ScriptedRng::constant(0.5);
        let next = step_fish(&fish, 0.0, 0, &viewport(), &mut rng);
        assert!(next.rotation < -170.0 && next.rotation > -172.0);
    }

    #[test]
    fn test_open_water_wraps() {
        let mut rng = ScriptedRng::constant(0.5);
        let left = fish_at(Vec2::new(-50.5, 300.0), Vec2::new(-1.0, 0.0));
        assert_eq!(step_fish(&left, 0.0, 0, &viewport(), &mut rng).pos.x, 850.0);

        let top = fish_at(Vec2::new(400.0, -50.5), Vec2::new(0.0, -1.0));
        assert_eq!(step_fish(&top, 0.0, 0, &viewport(), &mut rng).pos.y, 650.0);

        let bottom = fish_at(Vec2::new(400.0, 650.5), Vec2::new(0.0, 1.0));
        assert_eq!(step_fish(&bottom, 0.0, 0, &viewport(), &mut rng).pos.y, -50.0);
    }

    #[test]
    fn test_archived_fish_reflects_off_band_floor() {
        // Band is y in [10, 110] for a 600 tall viewport
        let mut fish = fish_at(Vec2::new(400.0, 109.0), Vec2::new(0.0, 2.0));
        fish.collected = true;
        let mut rng = ScriptedRng::constant(0.5);
        let next = step_fish(&fish, 1.0, 0, &viewport(), &mut rng);
        assert_eq!(next.pos.y, 110.0);
        assert_eq!(next.vel.y, -2.0);
        assert_eq!(next.rotation, 0.5);
    }

    #[test]
    fn test_archived_fish_ignores_chaos() {
        let mut fish = fish_at(Vec2::new(400.0, 50.0), Vec2::new(0.1, 0.1));
        fish.collected = true;
        let mut calm = ScriptedRng::constant(0.0);
        let mut wild = ScriptedRng::constant(0.99);
        let a = step_fish(&fish, 0.0, 0, &viewport(), &mut calm);
        let b = step_fish(&fish, 1.0, 77, &viewport(), &mut wild);
        assert_eq!(a, b);
    }

    #[test]
    fn test_step_all_preserves_order() {
        let mut rng = seeded(5);
        let fishes: Vec<Fish> = (0..5)
            .map(|i| Fish {
                id: FishId(i),
                ..fish_at(Vec2::new(i as f32 * 100.0, 300.0), Vec2::ZERO)
            })
            .collect();
        let next = step_all(&fishes, 0.5, 3, &viewport(), &mut rng);
        let ids: Vec<_> = next.iter().map(|f| f.id).collect();
        assert_eq!(ids, (0..5).map(FishId).collect::<Vec<_>>());
    }

    proptest! {
        #[test]
        fn prop_open_water_speed_capped(
            x in 0.0f32..800.0,
            y in 0.0f32..600.0,
            vx in -20.0f32..20.0,
            vy in -20.0f32..20.0,
            chaos in 0.0f32..=1.0,
            frame in 0u64..100_000,
            seed in any::<u64>(),
        ) {
            let mut rng = seeded(seed);
            let mut fish = fish_at(Vec2::new(x, y), Vec2::new(vx, vy));
            for tick in 0..30 {
                fish = step_fish(&fish, chaos, frame + tick, &viewport(), &mut rng);
                prop_assert!(fish.vel.length() <= VELOCITY_CAP + 1e-4);
                prop_assert!(fish.pos.x >= -WRAP_MARGIN && fish.pos.x <= 800.0 + WRAP_MARGIN);
                prop_assert!(fish.pos.y >= -WRAP_MARGIN && fish.pos.y <= 600.0 + WRAP_MARGIN);
            }
        }

        #[test]
        fn prop_archived_fish_stays_in_band(
            x in 10.0f32..790.0,
            y in 10.0f32..110.0,
            vx in -5.0f32..5.0,
            vy in -5.0f32..5.0,
            ticks in 1usize..400,
        ) {
            let mut rng = ScriptedRng::constant(0.5);
            let mut fish = fish_at(Vec2::new(x, y), Vec2::new(vx, vy));
            fish.collected = true;
            for _ in 0..ticks {
                fish = step_fish(&fish, 1.0, 0, &viewport(), &mut rng);
                prop_assert!(fish.pos.x >= 10.0 && fish.pos.x <= 790.0);
                prop_assert!(fish.pos.y >= 10.0 && fish.pos.y <= 110.0);
                prop_assert!(fish.collected);
            }
        }
    }
}
