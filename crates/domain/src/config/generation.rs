use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Generation stages
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Sampling parameters for the four model-gateway stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Provider id from `[[llm.providers]]`. `None` picks the first
    /// provider that initialized.
    #[serde(default)]
    pub provider: Option<String>,
    /// Model override. `None` falls back to the provider's default model.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "d_07")]
    pub analysis_temperature: f32,
    #[serde(default = "d_08")]
    pub questions_temperature: f32,
    #[serde(default = "d_07")]
    pub structure_temperature: f32,
    #[serde(default = "d_08")]
    pub script_temperature: f32,
    /// Completion ceiling for the final script.
    #[serde(default = "d_2000")]
    pub script_max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: None,
            model: None,
            analysis_temperature: d_07(),
            questions_temperature: d_08(),
            structure_temperature: d_07(),
            script_temperature: d_08(),
            script_max_tokens: d_2000(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_07() -> f32 {
    0.7
}
fn d_08() -> f32 {
    0.8
}
fn d_2000() -> u32 {
    2000
}
