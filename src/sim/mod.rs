//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per frame, timers on an explicit clock
//! - Randomness only through `RandomSource`
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod fish;
pub mod physics;
pub mod rng;
pub mod rules;
pub mod schedule;
pub mod state;
pub mod world;

pub use fish::{Fish, FishColor, FishId, FishKind, FishShape, ORDER_NAMES};
pub use physics::{step_all, step_fish};
pub use rng::{RandomSource, ScriptedRng, seeded};
pub use rules::{Verdict, advance_rule_timer, judge, rule_accepts};
pub use schedule::{Schedule, Timed};
pub use state::{
    ChaosBand, Epilogue, GamePhase, GameState, Message, NamingRecord, Rule, Viewport,
};
pub use world::World;
