//! Camera analysis boundary
//!
//! An external image classifier may report whether the player is present and
//! what face/hand they are making. It is strictly best effort: every failure
//! collapses into [`VisionState::fallback`] plus a warning, so nothing here can
//! stall or break the simulation. The simulation does not consume it yet.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    #[default]
    Neutral,
    Smile,
    Frown,
    Surprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    #[default]
    None,
    OpenPalm,
    Circle,
    Point,
}

/// What the classifier saw, stamped with when it was read
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisionState {
    pub is_present: bool,
    pub expression: Expression,
    pub gesture: Gesture,
    /// Milliseconds on the caller's clock
    pub last_updated: f64,
}

impl VisionState {
    /// Safe reading used whenever analysis is unavailable
    pub fn fallback(now_ms: f64) -> Self {
        Self {
            is_present: true,
            expression: Expression::Neutral,
            gesture: Gesture::None,
            last_updated: now_ms,
        }
    }
}

/// Payload returned by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Reading {
    is_present: bool,
    expression: Expression,
    gesture: Gesture,
}

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("no credential configured for the vision service")]
    MissingCredential,

    #[error("vision service unavailable: {0}")]
    Transport(String),

    #[error("empty response from vision service")]
    EmptyResponse,

    #[error("malformed vision payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Anything that can turn a base64 JPEG frame into the classifier's JSON text
pub trait FrameAnalyzer {
    fn analyze(&mut self, credential: &str, frame_base64: &str) -> Result<String, VisionError>;
}

/// Remove a `data:image/...;base64,` prefix if present
pub fn strip_data_url(frame: &str) -> &str {
    for mime in ["png", "jpeg", "webp"] {
        let prefix = format!("data:image/{mime};base64,");
        if let Some(rest) = frame.strip_prefix(prefix.as_str()) {
            return rest;
        }
    }
    frame
}

fn parse_reading(text: &str) -> Result<Reading, VisionError> {
    if text.trim().is_empty() {
        return Err(VisionError::EmptyResponse);
    }
    Ok(serde_json::from_str(text)?)
}

fn try_sense(
    credential: Option<&str>,
    analyzer: &mut dyn FrameAnalyzer,
    frame: &str,
) -> Result<Reading, VisionError> {
    let credential = credential
        .filter(|c| !c.is_empty())
        .ok_or(VisionError::MissingCredential)?;
    let text = analyzer.analyze(credential, strip_data_url(frame))?;
    parse_reading(&text)
}

/// Analyze one frame. Never fails: errors yield the fallback reading.
pub fn sense(
    credential: Option<&str>,
    analyzer: &mut dyn FrameAnalyzer,
    frame: &str,
    now_ms: f64,
) -> VisionState {
    match try_sense(credential, analyzer, frame) {
        Ok(reading) => VisionState {
            is_present: reading.is_present,
            expression: reading.expression,
            gesture: reading.gesture,
            last_updated: now_ms,
        },
        Err(e) => {
            log::warn!("Vision analysis unavailable, using neutral reading: {}", e);
            VisionState::fallback(now_ms)
        }
    }
}
