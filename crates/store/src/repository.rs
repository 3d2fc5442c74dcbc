use sw_domain::error::Result;
use sw_domain::{AiSession, NewAiSession, NewScript, NewUser, Script, ScriptPatch, User};

/// Storage contract shared by every backend.
///
/// Lookups return `Ok(None)` for absent records; `Err` is reserved for
/// invariant violations and I/O failures.
#[async_trait::async_trait]
pub trait ScriptRepository: Send + Sync {
    async fn get_user(&self, id: i64) -> Result<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn get_script(&self, id: i64) -> Result<Option<Script>>;

    /// All scripts owned by `user_id`, newest first (ties by id, descending).
    async fn scripts_by_user(&self, user_id: i64) -> Result<Vec<Script>>;

    /// Insert a new draft with no structure, script or duration.
    async fn create_script(&self, user_id: i64, script: NewScript) -> Result<Script>;

    /// Apply a partial update. `Ok(None)` when the script does not exist.
    async fn update_script(&self, id: i64, patch: ScriptPatch) -> Result<Option<Script>>;

    /// Remove a script and its audit records. Returns whether it existed.
    async fn delete_script(&self, id: i64) -> Result<bool>;

    async fn create_ai_session(&self, session: NewAiSession) -> Result<AiSession>;

    /// Audit records for one script, oldest first (ties by id, ascending).
    async fn ai_sessions_by_script(&self, script_id: i64) -> Result<Vec<AiSession>>;
}
