//! Sea of Disorder - an interactive art game about sorting the unsortable
//!
//! Core modules:
//! - `sim`: Deterministic simulation (fish physics, rules, chaos, phases)
//! - `narrative`: User-facing text in every supported locale
//! - `vision`: Best-effort camera analysis boundary (never blocks the sim)
//! - `settings`: Persisted player preferences

pub mod narrative;
pub mod settings;
pub mod sim;
pub mod vision;

pub use narrative::Locale;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Frame slice used by the rule timer (one frame, frame-rate dependent)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Archive zone height as a fraction of viewport height
    pub const ARCHIVE_BAND_FRACTION: f32 = 0.2;
    /// Collected fish keep this distance from the band edges
    pub const ARCHIVE_EDGE_MARGIN: f32 = 10.0;
    /// Correctly classified fish are lifted at least this high (fraction of height)
    pub const ARCHIVE_SETTLE_FRACTION: f32 = 0.15;
    /// Rejected fish are dropped back to this depth (fraction of height)
    pub const REJECT_DEPTH_FRACTION: f32 = 0.25;
    /// Spin rate of archived fish (degrees per frame)
    pub const ARCHIVE_SPIN_DEG: f32 = 0.5;

    /// Open water: drift amplitude at zero chaos
    pub const DRIFT_BASE: f32 = 0.01;
    /// Open water: extra drift amplitude at full chaos
    pub const DRIFT_CHAOS_GAIN: f32 = 0.15;
    /// Open water: turbulence magnitude factor
    pub const TURBULENCE: f32 = 0.8;
    /// Open water: constant upward bias (screen y grows downward)
    pub const BUOYANCY: f32 = 0.02;
    /// Per-frame velocity damping
    pub const DRAG: f32 = 0.95;
    /// Maximum fish speed (units per frame)
    pub const VELOCITY_CAP: f32 = 2.5;
    /// Rotation easing fraction per frame
    pub const TURN_EASE: f32 = 0.1;
    /// Off-screen margin before a fish wraps to the opposite edge
    pub const WRAP_MARGIN: f32 = 50.0;

    /// Spawned fish enter this far below the bottom edge
    pub const SPAWN_DEPTH: f32 = 50.0;
    /// Spawner interval (ms)
    pub const SPAWN_INTERVAL_MS: f64 = 1500.0;
    /// Population cap (non-collected fish)
    pub const MAX_FISH: usize = 20;
    /// Score needed before the mirror fish may appear
    pub const MIRROR_SCORE_THRESHOLD: u32 = 200;
    /// Mirror spawns when a uniform draw exceeds this (70% per eligible tick)
    pub const MIRROR_SKIP_CHANCE: f32 = 0.3;
    /// Scale of the undefined entity shown during the naming ritual
    pub const TERMINAL_SCALE: f32 = 3.5;

    /// Baseline chaos at session start
    pub const START_CHAOS: u32 = 20;
    /// Chaos ceiling
    pub const MAX_CHAOS: u32 = 100;
    /// Rule lifetime (seconds)
    pub const RULE_DURATION: f32 = 60.0;
    /// Rule-change notice disappears once the timer drops below this
    pub const RULE_NOTICE_CLEAR_AT: f32 = 58.0;
    /// SOUL rule needs chaos strictly above this
    pub const SOUL_CHAOS_GATE: u32 = 50;
    /// SOUL rule replaces the draw when a uniform draw exceeds this (30%)
    pub const SOUL_ROLL: f32 = 0.7;
    /// Chaos added by a SOUL rotation
    pub const SOUL_CHAOS: u32 = 10;
    /// Chaos added by an ordinary rotation
    pub const ROTATION_CHAOS: u32 = 2;
    /// Score per correct classification
    pub const CORRECT_SCORE: u32 = 10;
    /// Chaos removed by a correct classification
    pub const CORRECT_CALM: u32 = 5;
    /// Chaos added by a wrong classification
    pub const WRONG_CHAOS: u32 = 10;

    /// Classification feedback lifetime (ms)
    pub const FEEDBACK_CLEAR_MS: f64 = 1500.0;
    /// Welcome message lifetime (ms)
    pub const WELCOME_CLEAR_MS: f64 = 3000.0;
    /// Delay between dismissing the naming ritual and the reflection (ms)
    pub const REFLECTION_DELAY_MS: f64 = 800.0;
}

/// Normalize an angle in degrees to [-180, 180]
#[inline]
pub fn normalize_degrees(mut angle: f32) -> f32 {
    while angle < -180.0 {
        angle += 360.0;
    }
    while angle > 180.0 {
        angle -= 360.0;
    }
    angle
}

/// Toroidal wrap of one coordinate over `[-margin, extent + margin]`
#[inline]
pub fn wrap_coordinate(value: f32, extent: f32, margin: f32) -> f32 {
    if value < -margin {
        extent + margin
    } else if value > extent + margin {
        -margin
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(190.0), -170.0);
        assert_eq!(normalize_degrees(-190.0), 170.0);
        assert_eq!(normalize_degrees(45.0), 45.0);
        assert!((normalize_degrees(725.0) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_coordinate() {
        assert_eq!(wrap_coordinate(-51.0, 800.0, 50.0), 850.0);
        assert_eq!(wrap_coordinate(851.0, 800.0, 50.0), -50.0);
        assert_eq!(wrap_coordinate(400.0, 800.0, 50.0), 400.0);
        // Exactly on the margin stays put
        assert_eq!(wrap_coordinate(-50.0, 800.0, 50.0), -50.0);
    }
}
