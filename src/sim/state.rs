//! Game state and core simulation types
//!
//! `GameState` is the HUD-facing record. It is `Copy` and only ever replaced
//! wholesale by the transitions in `rules` and `world`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen
    Intro,
    /// Instructions before diving in
    Tutorial,
    /// Active sorting
    Playing,
    /// Legacy overload ending, no transition targets it anymore
    OverwhelmedEnding,
    /// World frozen around the undefined entity, waiting for a name
    NamingEnding,
    /// Epilogue text
    FinalReflection,
}

/// Classification rule shown on the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rule {
    CollectRed,
    CollectBlue,
    CollectRound,
    CollectSharp,
    /// Nothing satisfies it
    Soul,
}

impl Rule {
    /// Rules drawn on an ordinary rotation
    pub const ROTATION: [Rule; 4] = [
        Rule::CollectRed,
        Rule::CollectBlue,
        Rule::CollectRound,
        Rule::CollectSharp,
    ];
}

/// Transient HUD message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// Shown when play starts
    Welcome,
    /// Neutral rule rotation notice
    RuleShifting,
    /// SOUL rule warning
    Anomaly,
    /// Correct classification
    Verified,
    /// Wrong classification
    Invalid,
}

/// HUD severity band for the chaos meter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChaosBand {
    Calm,
    Unstable,
    Critical,
}

/// Process-wide session record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub rule: Rule,
    /// Always within [0, 100]
    pub chaos: u32,
    pub score: u32,
    /// Seconds left on the active rule
    pub rule_timer: f32,
    pub message: Option<Message>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::baseline()
    }
}

impl GameState {
    /// Session start values
    pub const fn baseline() -> Self {
        Self {
            phase: GamePhase::Intro,
            rule: Rule::CollectRed,
            chaos: START_CHAOS,
            score: 0,
            rule_timer: RULE_DURATION,
            message: None,
        }
    }

    /// Copy with chaos raised, clamped at the ceiling
    pub fn with_more_chaos(self, amount: u32) -> Self {
        Self {
            chaos: self.chaos.saturating_add(amount).min(MAX_CHAOS),
            ..self
        }
    }

    /// Copy with chaos lowered, floored at zero
    pub fn with_less_chaos(self, amount: u32) -> Self {
        Self {
            chaos: self.chaos.saturating_sub(amount),
            ..self
        }
    }

    pub fn with_message(self, message: Option<Message>) -> Self {
        Self { message, ..self }
    }

    pub fn with_phase(self, phase: GamePhase) -> Self {
        Self { phase, ..self }
    }

    /// Chaos as a fraction in [0, 1]
    pub fn chaos_factor(&self) -> f32 {
        let stability = ((MAX_CHAOS as f32 - self.chaos as f32) / MAX_CHAOS as f32).max(0.0);
        1.0 - stability
    }

    /// Whether the mirror fish may appear
    pub fn mirror_unlocked(&self) -> bool {
        self.score >= MIRROR_SCORE_THRESHOLD
    }

    /// Score progress toward the mirror threshold, capped at 1
    pub fn mirror_progress(&self) -> f32 {
        (self.score as f32 / MIRROR_SCORE_THRESHOLD as f32).min(1.0)
    }

    pub fn chaos_band(&self) -> ChaosBand {
        match self.chaos {
            0..30 => ChaosBand::Calm,
            30..70 => ChaosBand::Unstable,
            _ => ChaosBand::Critical,
        }
    }

    /// Red overload overlay during play
    pub fn overloaded(&self) -> bool {
        self.phase == GamePhase::Playing && self.chaos > 70
    }
}

/// Visible play area in CSS pixels, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Lower edge of the archive band
    pub fn archive_limit(&self) -> f32 {
        self.height * ARCHIVE_BAND_FRACTION
    }

    /// A drop at `y` lands in the archive zone
    pub fn in_archive(&self, y: f32) -> bool {
        y < self.archive_limit()
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Which epilogue the reflection screen shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Epilogue {
    /// Order begins the moment the player names it
    Named(String),
    /// The player declined to define it
    Refused,
}

/// Outcome of the naming ritual, cleared on restart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingRecord {
    pub name: Option<String>,
    pub refused: bool,
}

impl NamingRecord {
    pub fn epilogue(&self) -> Epilogue {
        if self.refused {
            Epilogue::Refused
        } else {
            Epilogue::Named(self.name.clone().unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_values() {
        let state = GameState::baseline();
        assert_eq!(state.phase, GamePhase::Intro);
        assert_eq!(state.rule, Rule::CollectRed);
        assert_eq!(state.chaos, 20);
        assert_eq!(state.score, 0);
        assert_eq!(state.rule_timer, 60.0);
        assert_eq!(state.message, None);
    }

    #[test]
    fn test_chaos_clamps() {
        let state = GameState { chaos: 95, ..GameState::baseline() };
        assert_eq!(state.with_more_chaos(10).chaos, 100);
        assert_eq!(state.with_more_chaos(u32::MAX).chaos, 100);
        let state = GameState { chaos: 3, ..GameState::baseline() };
        assert_eq!(state.with_less_chaos(5).chaos, 0);
    }

    #[test]
    fn test_chaos_factor() {
        let mut state = GameState::baseline();
        state.chaos = 0;
        assert_eq!(state.chaos_factor(), 0.0);
        state.chaos = 100;
        assert_eq!(state.chaos_factor(), 1.0);
        state.chaos = 40;
        assert!((state.chaos_factor() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_chaos_band() {
        let mut state = GameState::baseline();
        state.chaos = 29;
        assert_eq!(state.chaos_band(), ChaosBand::Calm);
        state.chaos = 30;
        assert_eq!(state.chaos_band(), ChaosBand::Unstable);
        state.chaos = 70;
        assert_eq!(state.chaos_band(), ChaosBand::Critical);
    }

    #[test]
    fn test_archive_band() {
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(viewport.archive_limit(), 120.0);
        assert!(viewport.in_archive(119.0));
        assert!(!viewport.in_archive(120.0));
    }

    #[test]
    fn test_epilogue_branch_follows_refusal_flag() {
        let named = NamingRecord { name: Some("AXIOM".into()), refused: false };
        assert_eq!(named.epilogue(), Epilogue::Named("AXIOM".into()));
        let refused = NamingRecord { name: None, refused: true };
        assert_eq!(refused.epilogue(), Epilogue::Refused);
    }
}
