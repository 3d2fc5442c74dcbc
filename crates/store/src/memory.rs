//! Volatile backend: everything is lost on restart.

use parking_lot::RwLock;

use sw_domain::error::Result;
use sw_domain::{AiSession, NewAiSession, NewScript, NewUser, Script, ScriptPatch, User};

use crate::repository::ScriptRepository;
use crate::tables::Tables;

pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ScriptRepository for MemoryStore {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.tables.read().get_user(id))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.tables.read().get_user_by_email(email))
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.tables.write().create_user(user)
    }

    async fn get_script(&self, id: i64) -> Result<Option<Script>> {
        Ok(self.tables.read().get_script(id))
    }

    async fn scripts_by_user(&self, user_id: i64) -> Result<Vec<Script>> {
        Ok(self.tables.read().scripts_by_user(user_id))
    }

    async fn create_script(&self, user_id: i64, script: NewScript) -> Result<Script> {
        Ok(self.tables.write().create_script(user_id, script))
    }

    async fn update_script(&self, id: i64, patch: ScriptPatch) -> Result<Option<Script>> {
        self.tables.write().update_script(id, patch)
    }

    async fn delete_script(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().delete_script(id))
    }

    async fn create_ai_session(&self, session: NewAiSession) -> Result<AiSession> {
        Ok(self.tables.write().create_ai_session(session))
    }

    async fn ai_sessions_by_script(&self, script_id: i64) -> Result<Vec<AiSession>> {
        Ok(self.tables.read().ai_sessions_by_script(script_id))
    }
}
