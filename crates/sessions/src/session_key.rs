//! Session key derivation: `script_<id>`.

const PREFIX: &str = "script_";

/// Stable session key for a script.
pub fn session_key(script_id: i64) -> String {
    format!("{PREFIX}{script_id}")
}
