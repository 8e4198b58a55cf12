//! The session container
//!
//! `World` owns the game state, the fish, the naming record, the pending
//! timers and the random source. Drivers and input handlers only talk to it
//! through the methods below, and each call leaves a consistent snapshot.

use glam::Vec2;

use super::fish::{Fish, FishId, FishKind};
use super::physics::step_all;
use super::rng::{RandomSource, seeded};
use super::rules::{Verdict, advance_rule_timer, archive, judge, penalize, reject, reward};
use super::schedule::{Schedule, Timed};
use super::state::{Epilogue, GamePhase, GameState, Message, NamingRecord, Viewport};
use crate::consts::*;

pub struct World {
    state: GameState,
    fishes: Vec<Fish>,
    naming: NamingRecord,
    viewport: Viewport,
    /// Fish currently held by the pointer
    dragging: Option<FishId>,
    schedule: Schedule,
    rng: Box<dyn RandomSource>,
    /// Frames simulated while playing (drives drift)
    frame: u64,
    /// Latest driver clock reading (ms)
    now_ms: f64,
    next_id: u32,
}

impl World {
    /// New session with a seeded generator
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        Self::with_rng(Box::new(seeded(seed)), viewport)
    }

    /// New session drawing from `rng`
    pub fn with_rng(rng: Box<dyn RandomSource>, viewport: Viewport) -> Self {
        Self {
            state: GameState::baseline(),
            fishes: Vec::new(),
            naming: NamingRecord::default(),
            viewport,
            dragging: None,
            schedule: Schedule::new(),
            rng,
            frame: 0,
            now_ms: 0.0,
            next_id: 1,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn fishes(&self) -> &[Fish] {
        &self.fishes
    }

    pub fn naming(&self) -> &NamingRecord {
        &self.naming
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn dragging(&self) -> Option<FishId> {
        self.dragging
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Epilogue to show, once the reflection screen is reached
    pub fn epilogue(&self) -> Option<Epilogue> {
        (self.state.phase == GamePhase::FinalReflection).then(|| self.naming.epilogue())
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn next_fish_id(&mut self) -> FishId {
        let id = FishId(self.next_id);
        self.next_id += 1;
        id
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.state.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.state.phase, phase);
        }
        if phase != GamePhase::Playing {
            self.schedule.cancel(Timed::Spawn);
        }
        self.state = self.state.with_phase(phase);
    }

    // --- Phase transitions ---

    /// Intro -> Tutorial
    pub fn begin_tutorial(&mut self) {
        if self.state.phase != GamePhase::Intro {
            log::debug!("begin_tutorial ignored in {:?}", self.state.phase);
            return;
        }
        self.set_phase(GamePhase::Tutorial);
    }

    /// Tutorial -> Playing, starts the spawner interval
    pub fn start_playing(&mut self, now_ms: f64) {
        if self.state.phase != GamePhase::Tutorial {
            log::debug!("start_playing ignored in {:?}", self.state.phase);
            return;
        }
        self.now_ms = now_ms;
        self.set_phase(GamePhase::Playing);
        self.state = self.state.with_message(Some(Message::Welcome));
        self.schedule.at(now_ms + WELCOME_CLEAR_MS, Timed::ClearMessage);
        self.schedule.at(now_ms + SPAWN_INTERVAL_MS, Timed::Spawn);
    }

    /// Freeze the world around the undefined entity.
    ///
    /// Safe to call repeatedly: the result is always a single locked terminal
    /// entity, zero chaos, no message and the naming phase.
    pub fn trigger_ending(&mut self) {
        log::info!(
            "Ending triggered (score {}, chaos {})",
            self.state.score,
            self.state.chaos
        );
        self.dragging = None;
        self.fishes = vec![Fish::undefined(&self.viewport)];
        self.state = GameState {
            chaos: 0,
            message: None,
            ..self.state
        };
        self.set_phase(GamePhase::NamingEnding);
    }

    /// Name the entity. Blank names are refused.
    pub fn submit_name(&mut self, name: &str, now_ms: f64) -> bool {
        let name = name.trim();
        if name.is_empty() || !self.can_close_naming() {
            return false;
        }
        self.naming = NamingRecord {
            name: Some(name.to_string()),
            refused: false,
        };
        self.close_naming(now_ms);
        true
    }

    /// Leave the entity undefined
    pub fn decline_naming(&mut self, now_ms: f64) -> bool {
        if !self.can_close_naming() {
            return false;
        }
        self.naming = NamingRecord {
            name: None,
            refused: true,
        };
        self.close_naming(now_ms);
        true
    }

    fn can_close_naming(&self) -> bool {
        if self.state.phase != GamePhase::NamingEnding {
            log::debug!("naming ignored in {:?}", self.state.phase);
            return false;
        }
        // Already dismissed, waiting for the reflection
        !self.schedule.is_pending(Timed::EnterReflection)
    }

    fn close_naming(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
        self.fishes.clear();
        self.schedule
            .at(now_ms + REFLECTION_DELAY_MS, Timed::EnterReflection);
    }

    /// FinalReflection -> Intro, back to baseline
    pub fn restart(&mut self) {
        if self.state.phase != GamePhase::FinalReflection {
            log::debug!("restart ignored in {:?}", self.state.phase);
            return;
        }
        log::info!("Restarting session");
        self.state = GameState::baseline();
        self.fishes.clear();
        self.naming = NamingRecord::default();
        self.dragging = None;
        self.schedule.clear();
        self.frame = 0;
        self.next_id = 1;
    }

    /// Stop all pending timers (view torn down)
    pub fn shutdown(&mut self) {
        self.schedule.clear();
        self.dragging = None;
    }

    // --- Drivers ---

    /// Fire every timer due by `now_ms`, then simulate one frame
    pub fn update(&mut self, now_ms: f64) {
        self.advance_clock(now_ms);
        self.frame();
    }

    /// Fire every timer due by `now_ms`
    pub fn advance_clock(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
        while let Some((due, action)) = self.schedule.pop_due(now_ms) {
            self.fire(due, action);
        }
    }

    fn fire(&mut self, due_ms: f64, action: Timed) {
        match action {
            Timed::ClearMessage => {
                self.state = self.state.with_message(None);
            }
            Timed::EnterReflection => {
                if self.state.phase == GamePhase::NamingEnding {
                    self.set_phase(GamePhase::FinalReflection);
                }
            }
            Timed::Spawn => {
                if self.state.phase != GamePhase::Playing {
                    return;
                }
                self.spawn();
                // A stalled driver gets one catch-up spawn, not a burst
                let mut next = due_ms + SPAWN_INTERVAL_MS;
                if next <= self.now_ms {
                    next = self.now_ms + SPAWN_INTERVAL_MS;
                }
                self.schedule.at(next, Timed::Spawn);
            }
        }
    }

    /// One simulation frame: overload check, fish physics, rule timer.
    /// Does nothing outside [`GamePhase::Playing`].
    pub fn frame(&mut self) {
        if self.state.phase != GamePhase::Playing {
            return;
        }
        if self.state.chaos >= MAX_CHAOS {
            self.trigger_ending();
            return;
        }

        let chaos_factor = self.state.chaos_factor();
        self.fishes = step_all(
            &self.fishes,
            chaos_factor,
            self.frame,
            &self.viewport,
            self.rng.as_mut(),
        );
        self.state = advance_rule_timer(self.state, self.rng.as_mut());
        self.frame += 1;
    }

    /// Spawner tick: add one fish unless the sea is full.
    ///
    /// Once the score threshold is reached and no mirror fish exists, each tick
    /// has a 70% chance to bring the mirror fish instead of a normal one.
    pub fn spawn(&mut self) {
        if self.state.phase != GamePhase::Playing {
            return;
        }
        let active = self.fishes.iter().filter(|f| !f.collected).count();
        if active >= MAX_FISH {
            return;
        }

        let mirror_eligible =
            self.state.mirror_unlocked() && !self.fishes.iter().any(Fish::is_mirror);
        let kind = if mirror_eligible && self.rng.unit() > MIRROR_SKIP_CHANCE {
            FishKind::Mirror
        } else {
            FishKind::Normal
        };

        let id = self.next_fish_id();
        let fish = Fish::spawn(id, kind, self.state.chaos, &self.viewport, self.rng.as_mut());
        if fish.is_mirror() {
            log::info!("Mirror fish {:?} surfaced", id);
        }
        self.fishes.push(fish);
    }

    // --- Pointer interaction ---

    /// Grab a fish
    pub fn press(&mut self, id: FishId) {
        if self.state.phase != GamePhase::Playing || self.dragging.is_some() {
            return;
        }
        let Some(fish) = self.fishes.iter_mut().find(|f| f.id == id) else {
            log::debug!("press on unknown fish {:?}", id);
            return;
        };
        if fish.collected || fish.locked {
            return;
        }
        fish.locked = true;
        self.dragging = Some(id);
    }

    /// Move the held fish to the pointer
    pub fn drag_to(&mut self, x: f32, y: f32) {
        let Some(id) = self.dragging else {
            return;
        };
        if let Some(fish) = self.fishes.iter_mut().find(|f| f.id == id) {
            fish.pos = Vec2::new(x, y);
            fish.vel = Vec2::ZERO;
        }
    }

    /// Let go of the held fish; inside the archive zone it gets classified
    pub fn release(&mut self, now_ms: f64) {
        let Some(id) = self.dragging.take() else {
            return;
        };
        self.now_ms = now_ms;
        let Some(index) = self.fishes.iter().position(|f| f.id == id) else {
            return;
        };

        if self.viewport.in_archive(self.fishes[index].pos.y) {
            self.classify(index, now_ms);
        } else {
            let vx = self.rng.jitter(1.0);
            let fish = &mut self.fishes[index];
            fish.locked = false;
            fish.vel = Vec2::new(vx, 1.0);
        }
    }

    fn classify(&mut self, index: usize, now_ms: f64) {
        let fish = &self.fishes[index];
        let verdict = judge(&self.state, fish);
        log::debug!("Fish {:?} under {:?}: {:?}", fish.id, self.state.rule, verdict);

        let (state, fish) = match verdict {
            Verdict::Ending => {
                self.trigger_ending();
                return;
            }
            Verdict::Correct => (
                reward(self.state),
                archive(fish, &self.viewport, self.rng.as_mut()),
            ),
            Verdict::Wrong => (
                penalize(self.state),
                reject(fish, &self.viewport, self.rng.as_mut()),
            ),
        };
        self.state = state;
        self.fishes[index] = fish;
        self.schedule.at(now_ms + FEEDBACK_CLEAR_MS, Timed::ClearMessage);
    }
}
