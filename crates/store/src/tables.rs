//! In-memory tables shared by both backends.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use sw_domain::error::{Error, Result};
use sw_domain::{
    AiSession, NewAiSession, NewScript, NewUser, Script, ScriptPatch, ScriptStatus, User,
};

#[derive(Debug, Default, Clone)]
pub(crate) struct Tables {
    users: BTreeMap<i64, User>,
    scripts: BTreeMap<i64, Script>,
    ai_sessions: BTreeMap<i64, AiSession>,
    next_user_id: i64,
    next_script_id: i64,
    next_ai_session_id: i64,
}

/// On-disk shape of the whole store.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub scripts: Vec<Script>,
    #[serde(default)]
    pub ai_sessions: Vec<AiSession>,
}

fn next_after<V>(map: &BTreeMap<i64, V>) -> i64 {
    map.keys().next_back().map_or(1, |max| max + 1)
}

impl Tables {
    pub fn new() -> Self {
        Self {
            next_user_id: 1,
            next_script_id: 1,
            next_ai_session_id: 1,
            ..Default::default()
        }
    }

    /// Rebuild from a snapshot; id counters resume after the largest id.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let users: BTreeMap<_, _> = snapshot.users.into_iter().map(|u| (u.id, u)).collect();
        let scripts: BTreeMap<_, _> = snapshot.scripts.into_iter().map(|s| (s.id, s)).collect();
        let ai_sessions: BTreeMap<_, _> =
            snapshot.ai_sessions.into_iter().map(|a| (a.id, a)).collect();
        Self {
            next_user_id: next_after(&users),
            next_script_id: next_after(&scripts),
            next_ai_session_id: next_after(&ai_sessions),
            users,
            scripts,
            ai_sessions,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            users: self.users.values().cloned().collect(),
            scripts: self.scripts.values().cloned().collect(),
            ai_sessions: self.ai_sessions.values().cloned().collect(),
        }
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        (self.users.len(), self.scripts.len(), self.ai_sessions.len())
    }

    // ── users ──

    pub fn get_user(&self, id: i64) -> Option<User> {
        self.users.get(&id).cloned()
    }

    pub fn get_user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub fn create_user(&mut self, new: NewUser) -> Result<User> {
        if self.get_user_by_email(&new.email).is_some() {
            return Err(Error::Store(format!("email already registered: {}", new.email)));
        }
        let id = self.next_user_id;
        self.next_user_id += 1;
        let user = User {
            id,
            password_hash: new.password_hash(),
            username: new.username,
            email: new.email,
            created_at: Utc::now(),
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    // ── scripts ──

    pub fn get_script(&self, id: i64) -> Option<Script> {
        self.scripts.get(&id).cloned()
    }

    pub fn scripts_by_user(&self, user_id: i64) -> Vec<Script> {
        let mut out: Vec<Script> = self
            .scripts
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        out
    }

    pub fn create_script(&mut self, user_id: i64, new: NewScript) -> Script {
        let id = self.next_script_id;
        self.next_script_id += 1;
        let now = Utc::now();
        let script = Script {
            id,
            user_id,
            title: new.title,
            script_type: new.script_type,
            idea: new.idea,
            structure: None,
            final_script: None,
            status: ScriptStatus::Draft,
            duration: None,
            created_at: now,
            updated_at: now,
        };
        self.scripts.insert(id, script.clone());
        script
    }

    pub fn update_script(&mut self, id: i64, patch: ScriptPatch) -> Result<Option<Script>> {
        let Some(script) = self.scripts.get_mut(&id) else {
            return Ok(None);
        };
        script.apply_patch(patch, Utc::now())?;
        Ok(Some(script.clone()))
    }

    pub fn delete_script(&mut self, id: i64) -> bool {
        if self.scripts.remove(&id).is_none() {
            return false;
        }
        self.ai_sessions.retain(|_, a| a.script_id != id);
        true
    }

    // ── audit log ──

    pub fn create_ai_session(&mut self, new: NewAiSession) -> AiSession {
        let id = self.next_ai_session_id;
        self.next_ai_session_id += 1;
        let record = AiSession {
            id,
            script_id: new.script_id,
            step: new.step,
            input: new.input,
            output: new.output,
            timestamp: Utc::now(),
        };
        self.ai_sessions.insert(id, record.clone());
        record
    }

    pub fn ai_sessions_by_script(&self, script_id: i64) -> Vec<AiSession> {
        let mut out: Vec<AiSession> = self
            .ai_sessions
            .values()
            .filter(|a| a.script_id == script_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        out
    }
}
