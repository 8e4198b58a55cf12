//! Fish entities and how they are born

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use super::state::Viewport;
use crate::consts::*;

/// Opaque fish identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FishId(pub u32);

impl FishId {
    /// Reserved for the undefined entity of the naming ritual
    pub const TERMINAL: FishId = FishId(0);
}

/// Behavioral class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FishKind {
    Normal,
    /// Visual and behavioral perturbation overlay, sorts like a normal fish
    Glitch,
    /// Unclassifiable; capturing it ends the session
    Mirror,
}

/// Fish palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FishColor {
    Red,
    Blue,
    Green,
    Amber,
    /// Only the undefined entity wears it
    Pale,
}

impl FishColor {
    /// Colors a spawned fish can have
    pub const PALETTE: [FishColor; 4] = [
        FishColor::Red,
        FishColor::Blue,
        FishColor::Green,
        FishColor::Amber,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            FishColor::Red => "#f87171",
            FishColor::Blue => "#60a5fa",
            FishColor::Green => "#34d399",
            FishColor::Amber => "#fbbf24",
            FishColor::Pale => "#ffffff",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FishShape {
    Round,
    Sharp,
}

/// A creature in the sea
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fish {
    pub id: FishId,
    pub pos: Vec2,
    /// Units per frame
    pub vel: Vec2,
    /// Degrees
    pub rotation: f32,
    pub color: FishColor,
    pub shape: FishShape,
    pub scale: f32,
    pub kind: FishKind,
    /// Held by the player or frozen; physics skips it
    pub locked: bool,
    /// Archived; confined to the calm band forever
    pub collected: bool,
    /// Assigned on successful classification
    pub name: Option<String>,
    /// Per-fish phase offset so drift is out of sync (radians)
    pub drift_phase: f32,
}

impl Fish {
    /// Draw a new fish entering from below the viewport.
    ///
    /// With probability `chaos / 200` the requested kind is overridden to
    /// [`FishKind::Glitch`], whatever was asked for.
    pub fn spawn(
        id: FishId,
        kind: FishKind,
        chaos: u32,
        viewport: &Viewport,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let glitched = rng.unit() < chaos as f32 / 200.0;
        let x = rng.unit() * viewport.width;
        let vx = rng.jitter(0.5);
        let vy = -rng.range(0.5, 2.0);
        let color = FishColor::PALETTE[rng.index(FishColor::PALETTE.len())];
        let shape = if rng.unit() > 0.5 {
            FishShape::Round
        } else {
            FishShape::Sharp
        };
        let scale = rng.range(0.8, 1.2);
        let drift_phase = rng.unit() * std::f32::consts::TAU;

        Self {
            id,
            pos: Vec2::new(x, viewport.height + SPAWN_DEPTH),
            vel: Vec2::new(vx, vy),
            rotation: 0.0,
            color,
            shape,
            scale,
            kind: if glitched { FishKind::Glitch } else { kind },
            locked: false,
            collected: false,
            name: None,
            drift_phase,
        }
    }

    /// The still, white, oversized entity at the center of the naming ritual
    pub fn undefined(viewport: &Viewport) -> Self {
        Self {
            id: FishId::TERMINAL,
            pos: viewport.center(),
            vel: Vec2::ZERO,
            rotation: 0.0,
            color: FishColor::Pale,
            shape: FishShape::Round,
            scale: TERMINAL_SCALE,
            kind: FishKind::Mirror,
            locked: true,
            collected: false,
            name: None,
            drift_phase: 0.0,
        }
    }

    pub fn is_mirror(&self) -> bool {
        self.kind == FishKind::Mirror
    }
}

/// Pool of names given to archived fish
pub const ORDER_NAMES: [&str; 23] = [
    "SEQUENCE", "METHOD", "LOGIC", "AXIOM", "NULL", "VOID", "EGO", "DATA", "UNIT", "ATOM", "FLUX",
    "CORE", "ECHO", "PRIME", "FORM", "SHAPE", "LAW", "RULE", "NORM", "INDEX", "VECTOR", "CIPHER",
    "CODE",
];
