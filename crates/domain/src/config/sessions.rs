use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Agent sessions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Lifecycle bounds for in-flight wizard sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Sessions untouched for this long are evicted by the sweeper.
    #[serde(default = "d_3600")]
    pub idle_ttl_secs: u64,
    #[serde(default = "d_60")]
    pub sweep_interval_secs: u64,
    /// Upper bound on live sessions. `0` disables the bound.
    #[serde(default = "d_1024")]
    pub max_sessions: usize,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: d_3600(),
            sweep_interval_secs: d_60(),
            max_sessions: d_1024(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_3600() -> u64 {
    3600
}
fn d_60() -> u64 {
    60
}
fn d_1024() -> usize {
    1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_defaults() {
        let cfg: SessionsConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.idle_ttl_secs, 3600);
        assert_eq!(cfg.sweep_interval_secs, 60);
        assert_eq!(cfg.max_sessions, 1024);
    }
}
