//! Model-produced content: idea analysis, refinement questions and the
//! sectioned script structure.
//!
//! Provider output is untrusted. Every field declares a fallback so that a
//! missing or oddly-typed value degrades to an empty value instead of
//! failing the whole stage; see the `lenient` helpers below.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Analysis
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Dramaturgical analysis of a raw idea.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub conflicts: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub weak_points: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub suggested_structure: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub tone: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub target_audience: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Questions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A refinement question shown to the user between analysis and structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub question: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub context: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub placeholder: String,
}

impl Question {
    /// Drop questions without text and give every remaining question an id.
    ///
    /// A missing id becomes the question's 1-based position in the list the
    /// provider returned, or the next free number when that position is
    /// already taken by an explicit id.
    pub fn normalize_all(questions: Vec<Question>) -> Vec<Question> {
        let kept: Vec<(usize, Question)> = questions
            .into_iter()
            .enumerate()
            .filter(|(_, q)| !q.question.trim().is_empty())
            .collect();
        let mut taken: HashSet<String> = kept
            .iter()
            .map(|(_, q)| q.id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        kept.into_iter()
            .map(|(i, mut q)| {
                if q.id.trim().is_empty() {
                    let mut n = i + 1;
                    while taken.contains(&n.to_string()) {
                        n += 1;
                    }
                    q.id = n.to_string();
                    taken.insert(q.id.clone());
                }
                q
            })
            .collect()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Structure
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One named block of the outline (hook, act, CTA, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    /// Estimated length in seconds.
    #[serde(default, deserialize_with = "lenient::seconds")]
    pub duration: u32,
    #[serde(default, deserialize_with = "lenient::string")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub tips: Vec<String>,
}

/// The AI-produced outline of a script, prior to final prose generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StructureWire")]
pub struct Structure {
    pub sections: Vec<Section>,
    /// Total length in seconds.
    pub total_duration: u32,
    pub format: String,
}

impl Structure {
    /// Sum of all section durations, saturating on overflow.
    pub fn sections_duration(&self) -> u32 {
        self.sections
            .iter()
            .fold(0u32, |acc, s| acc.saturating_add(s.duration))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructureWire {
    #[serde(default, deserialize_with = "lenient::sections")]
    sections: Vec<Section>,
    #[serde(default, deserialize_with = "lenient::opt_seconds")]
    total_duration: Option<u32>,
    #[serde(default, deserialize_with = "lenient::string")]
    format: String,
}

impl From<StructureWire> for Structure {
    fn from(wire: StructureWire) -> Self {
        let mut structure = Structure {
            sections: wire.sections,
            total_duration: 0,
            format: wire.format,
        };
        structure.total_duration = wire
            .total_duration
            .unwrap_or_else(|| structure.sections_duration());
        structure
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Lenient field decoders
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

mod lenient {
    use super::*;

    fn scalar_to_string(v: Value) -> Option<String> {
        match v {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn value_to_seconds(v: &Value) -> Option<u32> {
        let f = match v {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        if !f.is_finite() || f < 0.0 {
            return None;
        }
        Some(f.round().min(u32::MAX as f64) as u32)
    }

    pub(super) fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(match v {
            Value::Null => String::new(),
            Value::Array(_) | Value::Object(_) => v.to_string(),
            other => scalar_to_string(other).unwrap_or_default(),
        })
    }

    pub(super) fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items.into_iter().filter_map(scalar_to_string).collect(),
            Value::String(s) if !s.trim().is_empty() => vec![s],
            _ => Vec::new(),
        })
    }

    pub(super) fn seconds<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        Ok(value_to_seconds(&Value::deserialize(d)?).unwrap_or(0))
    }

    pub(super) fn opt_seconds<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        Ok(value_to_seconds(&Value::deserialize(d)?))
    }

    /// Sections that are not objects are skipped rather than failing the
    /// whole structure.
    pub(super) fn sections<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Section>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
