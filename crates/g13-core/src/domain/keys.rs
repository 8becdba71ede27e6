//! Hardware key-code classification.
//!
//! Recording works on position codes (`"KeyA"`, `"ShiftLeft"`, …).  The only
//! classification the core needs is "is this a pure modifier?": modifier-only
//! transitions are noise in a recording — they fire constantly while the user
//! holds a chord — and are filtered out entirely by the recorder.

/// Position codes of the pure modifier keys, left and right variants.
pub const PURE_MODIFIER_CODES: [&str; 8] = [
    "ShiftLeft",
    "ShiftRight",
    "ControlLeft",
    "ControlRight",
    "AltLeft",
    "AltRight",
    "MetaLeft",
    "MetaRight",
];

/// Returns `true` when `code` names a pure modifier key.
///
/// Anything not in the table — including keys the table has never heard of —
/// is recordable.
pub fn is_pure_modifier(code: &str) -> bool {
    PURE_MODIFIER_CODES.contains(&code)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
