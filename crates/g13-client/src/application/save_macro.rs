//! Persisting a finished recording.
//!
//! The recorder hands back a bare step list; turning it into a stored macro
//! is the caller's job, and this is that caller.  The draft gets the default
//! replay parameters (recorded timing, played once) — tuning them afterwards
//! is an edit operation on the persistence service.

use tracing::info;

use g13_core::{Macro, MacroStep};

use crate::infrastructure::api::{ApiError, G13ApiClient};

/// Wraps `steps` into a macro draft and stores it, returning the assigned id.
///
/// When `description` is `None` a summary is generated from the step count,
/// matching what the recording UI shows.
///
/// # Errors
///
/// Propagates [`ApiError`] from the persistence service.  The step list is
/// stored verbatim — an unmatched trailing press is not repaired here.
pub async fn save_recording(
    api: &G13ApiClient,
    name: &str,
    description: Option<&str>,
    steps: Vec<MacroStep>,
) -> Result<String, ApiError> {
    let description = match description {
        Some(text) => text.to_string(),
        None => format!("Recorded {} steps", steps.len()),
    };
    let draft = Macro::draft(name, description, steps);
    let id = api.create_macro(&draft).await?;
    info!(%id, name, "recording saved");
    Ok(id)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
