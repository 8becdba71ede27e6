//! Portable macro step format and the persisted macro record.
//!
//! A recording session produces an ordered list of [`MacroStep`]s: press and
//! release transitions stamped with their offset from the recording start.
//! The list is handed to the persistence service wrapped in a [`Macro`]
//! together with its replay parameters.  Replay itself lives daemon-side;
//! this crate only defines the data.

use serde::{Deserialize, Serialize};

/// Which physical transition a step records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Press,
    Release,
}

/// One timed key transition inside a recorded macro.
///
/// `code` is a hardware-level position code (e.g. `"KeyA"`, `"Digit1"`),
/// never the printable character, so recordings replay identically across
/// keyboard layouts.
///
/// A step list is valid even when a `Press` has no matching `Release` — a
/// recording stopped mid-press stores exactly what was captured, and the
/// replay collaborator decides what an unmatched press means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroStep {
    pub kind: StepKind,
    pub code: String,
    /// Milliseconds between the recording start and the moment the hardware
    /// event fired.
    pub offset_ms: u64,
}

impl MacroStep {
    pub fn press(code: impl Into<String>, offset_ms: u64) -> Self {
        Self {
            kind: StepKind::Press,
            code: code.into(),
            offset_ms,
        }
    }

    pub fn release(code: impl Into<String>, offset_ms: u64) -> Self {
        Self {
            kind: StepKind::Release,
            code: code.into(),
            offset_ms,
        }
    }
}

/// A named, persisted macro: the recorded steps plus replay parameters.
///
/// `id` is assigned by the persistence service on creation; a draft built
/// from a fresh recording carries `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macro {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<MacroStep>,
    /// Replay speed factor; 1.0 replays at recorded timing.
    #[serde(default = "default_speed")]
    pub speed_multiplier: f64,
    /// How many times the step list is replayed per trigger.
    #[serde(default = "default_repeat")]
    pub repeat_count: u32,
}

fn default_speed() -> f64 {
    1.0
}

fn default_repeat() -> u32 {
    1
}

impl Macro {
    /// Builds an unsaved draft from a finished recording with the default
    /// replay parameters (recorded timing, played once).
    pub fn draft(
        name: impl Into<String>,
        description: impl Into<String>,
        steps: Vec<MacroStep>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            steps,
            speed_multiplier: default_speed(),
            repeat_count: default_repeat(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
