//! Persistent records: users, scripts and the AI-session audit log.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::content::Structure;
use crate::error::{Error, Result};
use crate::validation::{FieldError, MIN_IDEA_CHARS};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Enums
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The delivery format a script is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    Tiktok,
    Youtube,
    Marketing,
    Shortfilm,
}

impl ScriptType {
    pub const ALL: [ScriptType; 4] = [
        ScriptType::Tiktok,
        ScriptType::Youtube,
        ScriptType::Marketing,
        ScriptType::Shortfilm,
    ];

    /// Wire name (`"tiktok"`, `"youtube"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            ScriptType::Tiktok => "tiktok",
            ScriptType::Youtube => "youtube",
            ScriptType::Marketing => "marketing",
            ScriptType::Shortfilm => "shortfilm",
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ScriptType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| {
                Error::validation(
                    "invalid script type",
                    vec![FieldError::new(
                        "type",
                        "must be one of: tiktok, youtube, marketing, shortfilm",
                    )],
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptStatus {
    #[default]
    Draft,
    Completed,
}

/// Pipeline stage an audit record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiStep {
    Analysis,
    Questions,
    Structure,
    Generation,
}

impl AiStep {
    pub fn as_str(self) -> &'static str {
        match self {
            AiStep::Analysis => "analysis",
            AiStep::Questions => "questions",
            AiStep::Structure => "structure",
            AiStep::Generation => "generation",
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// User
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Hex-encoded SHA-256 of the password.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn password_hash(&self) -> String {
        hex::encode(Sha256::digest(self.password.as_bytes()))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Script
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub script_type: ScriptType,
    pub idea: String,
    pub structure: Option<Structure>,
    pub final_script: Option<String>,
    pub status: ScriptStatus,
    /// Estimated duration in seconds.
    pub duration: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Script {
    /// Apply a partial update, enforcing the record invariants:
    ///
    /// - `status` never goes from `completed` back to `draft`;
    /// - `structure` and `finalScript` are either both set or both unset.
    ///
    /// On error the script is left untouched.
    pub fn apply_patch(&mut self, patch: ScriptPatch, now: DateTime<Utc>) -> Result<()> {
        let mut details = Vec::new();

        if self.status == ScriptStatus::Completed && patch.status == Some(ScriptStatus::Draft) {
            details.push(FieldError::new(
                "status",
                "a completed script cannot return to draft",
            ));
        }

        let structure = patch.structure.as_ref().or(self.structure.as_ref());
        let final_script = patch.final_script.as_ref().or(self.final_script.as_ref());
        match (structure.is_some(), final_script.is_some()) {
            (true, false) => details.push(FieldError::new(
                "finalScript",
                "finalScript must be set together with structure",
            )),
            (false, true) => details.push(FieldError::new(
                "structure",
                "structure must be set together with finalScript",
            )),
            _ => {}
        }

        if !details.is_empty() {
            return Err(Error::validation("invalid script update", details));
        }

        if let Some(structure) = patch.structure {
            self.structure = Some(structure);
        }
        if let Some(final_script) = patch.final_script {
            self.final_script = Some(final_script);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(duration) = patch.duration {
            self.duration = Some(duration);
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Validated input for creating a script.
#[derive(Debug, Clone, PartialEq)]
pub struct NewScript {
    pub title: String,
    pub script_type: ScriptType,
    pub idea: String,
}

impl NewScript {
    /// Validate raw wizard input, collecting every field issue at once.
    pub fn parse(
        title: Option<&str>,
        script_type: Option<&str>,
        idea: Option<&str>,
    ) -> Result<Self> {
        let mut details = Vec::new();

        let title = title.map(str::trim).unwrap_or_default();
        if title.is_empty() {
            details.push(FieldError::new("title", "title is required"));
        }

        let parsed_type = match script_type {
            None => {
                details.push(FieldError::new("type", "type is required"));
                None
            }
            Some(raw) => match raw.parse::<ScriptType>() {
                Ok(t) => Some(t),
                Err(Error::Validation { details: d, .. }) => {
                    details.extend(d);
                    None
                }
                Err(e) => return Err(e),
            },
        };

        let idea = idea.map(str::trim).unwrap_or_default();
        if idea.chars().count() < MIN_IDEA_CHARS {
            details.push(FieldError::new(
                "idea",
                format!("idea must have at least {MIN_IDEA_CHARS} characters"),
            ));
        }

        match parsed_type {
            Some(script_type) if details.is_empty() => Ok(Self {
                title: title.to_owned(),
                script_type,
                idea: idea.to_owned(),
            }),
            _ => Err(Error::validation("invalid script data", details)),
        }
    }
}

/// Partial update accepted by `PATCH /api/scripts/:id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptPatch {
    #[serde(default)]
    pub structure: Option<Structure>,
    #[serde(default)]
    pub final_script: Option<String>,
    #[serde(default)]
    pub status: Option<ScriptStatus>,
    #[serde(default)]
    pub duration: Option<u32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// AI session audit records
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSession {
    pub id: i64,
    pub script_id: i64,
    pub step: AiStep,
    pub input: serde_json::Value,
    pub output: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAiSession {
    pub script_id: i64,
    pub step: AiStep,
    pub input: serde_json::Value,
    pub output: serde_json::Value,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    const IDEA: &str = "Um entregador de pizza descobre que cada pedido carrega uma pista de um mistério";

    fn draft() -> Script {
        let now = Utc::now();
        Script {
            id: 1,
            user_id: 1,
            title: "Pizza".into(),
            script_type: ScriptType::Tiktok,
            idea: IDEA.into(),
            structure: None,
            final_script: None,
            status: ScriptStatus::Draft,
            duration: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn script_type_parses_wire_names() {
        assert_eq!("shortfilm".parse::<ScriptType>().unwrap(), ScriptType::Shortfilm);
        assert!("podcast".parse::<ScriptType>().is_err());
    }

    #[test]
    fn script_serializes_type_and_nulls() {
        let v = serde_json::to_value(draft()).unwrap();
        assert_eq!(v["type"], "tiktok");
        assert_eq!(v["status"], "draft");
        assert!(v["structure"].is_null());
        assert!(v["finalScript"].is_null());
        assert!(v["userId"].is_number());
    }

    #[test]
    fn new_script_parse_ok() {
        let s = NewScript::parse(Some(" T "), Some("tiktok"), Some(IDEA)).unwrap();
        assert_eq!(s.title, "T");
        assert_eq!(s.script_type, ScriptType::Tiktok);
    }

    #[test]
    fn new_script_parse_collects_all_issues() {
        let err = NewScript::parse(Some(""), Some("radio"), Some("curta demais")).unwrap_err();
        match err {
            Error::Validation { details, .. } => {
                let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
                assert_eq!(fields, vec!["title", "type", "idea"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn new_script_idea_counts_chars_not_bytes() {
        // 50 accented chars are more than 50 bytes but exactly 50 chars.
        let idea = "é".repeat(50);
        assert!(NewScript::parse(Some("T"), Some("youtube"), Some(&idea)).is_ok());
        let short = "é".repeat(49);
        assert!(NewScript::parse(Some("T"), Some("youtube"), Some(&short)).is_err());
    }

    #[test]
    fn patch_completes_script() {
        let mut s = draft();
        let patch = ScriptPatch {
            structure: Some(Structure::default()),
            final_script: Some("FADE IN:".into()),
            status: Some(ScriptStatus::Completed),
            duration: Some(90),
        };
        s.apply_patch(patch, Utc::now()).unwrap();
        assert_eq!(s.status, ScriptStatus::Completed);
        assert_eq!(s.duration, Some(90));
        assert_eq!(s.final_script.as_deref(), Some("FADE IN:"));
    }

    #[test]
    fn patch_rejects_status_reversal() {
        let mut s = draft();
        s.status = ScriptStatus::Completed;
        let patch = ScriptPatch {
            status: Some(ScriptStatus::Draft),
            ..Default::default()
        };
        assert!(s.apply_patch(patch, Utc::now()).is_err());
        assert_eq!(s.status, ScriptStatus::Completed);
    }

    #[test]
    fn patch_rejects_half_populated_content() {
        let mut s = draft();
        let patch = ScriptPatch {
            final_script: Some("texto".into()),
            ..Default::default()
        };
        assert!(s.apply_patch(patch, Utc::now()).is_err());
        assert!(s.final_script.is_none());
    }

    #[test]
    fn patch_duration_only_is_fine() {
        let mut s = draft();
        let before = s.updated_at;
        let patch = ScriptPatch {
            duration: Some(30),
            ..Default::default()
        };
        s.apply_patch(patch, before + chrono::Duration::seconds(1)).unwrap();
        assert_eq!(s.duration, Some(30));
        assert!(s.updated_at > before);
    }

    #[test]
    fn password_is_hashed() {
        let u = NewUser {
            username: "usuario_demo".into(),
            email: "demo@roteiria.com".into(),
            password: "demo123".into(),
        };
        let h = u.password_hash();
        assert_eq!(h.len(), 64);
        assert_ne!(h, "demo123");
    }
}
