//! Durable backend: the whole store lives in one JSON file.
//!
//! The snapshot is rewritten after every mutation through a temp file in the
//! same directory followed by a rename, so readers never see a torn file.

use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use sw_domain::error::{Error, Result};
use sw_domain::{AiSession, NewAiSession, NewScript, NewUser, Script, ScriptPatch, User};

use crate::repository::ScriptRepository;
use crate::tables::{Snapshot, Tables};

pub struct JsonFileStore {
    path: PathBuf,
    tables: RwLock<Tables>,
}

impl JsonFileStore {
    /// Load the snapshot at `path`, or start empty if it does not exist.
    /// Parent directories are created as needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(Error::Io)?;
        }

        let tables = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(Error::Io)?;
            let snapshot: Snapshot = serde_json::from_str(&raw).map_err(|e| {
                Error::Store(format!("corrupt store file {}: {e}", path.display()))
            })?;
            Tables::from_snapshot(snapshot)
        } else {
            Tables::new()
        };

        let (users, scripts, ai_sessions) = tables.counts();
        tracing::info!(
            users,
            scripts,
            ai_sessions,
            path = %path.display(),
            "json store loaded"
        );

        Ok(Self {
            path: path.to_path_buf(),
            tables: RwLock::new(tables),
        })
    }

    /// Persist the current tables. Called with the write lock held so
    /// snapshots land on disk in mutation order.
    fn flush(&self, tables: &Tables) -> Result<()> {
        let json = serde_json::to_vec_pretty(&tables.snapshot())
            .map_err(|e| Error::Store(format!("serializing store: {e}")))?;

        let dir = match self.path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(Error::Io)?;
        tmp.write_all(&json).map_err(Error::Io)?;
        tmp.as_file().sync_all().map_err(Error::Io)?;
        tmp.persist(&self.path)
            .map_err(|e| Error::Store(format!("replacing {}: {e}", self.path.display())))?;
        Ok(())
    }

    /// Run a mutation and flush. A failed flush rolls the tables back, so
    /// memory never holds a change the caller was told did not happen.
    fn mutate<T>(&self, f: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let mut tables = self.tables.write();
        let before = tables.clone();
        let out = f(&mut tables)?;
        if let Err(e) = self.flush(&tables) {
            tracing::error!(path = %self.path.display(), error = %e, "store flush failed, change rolled back");
            *tables = before;
            return Err(e);
        }
        Ok(out)
    }
}

#[async_trait::async_trait]
impl ScriptRepository for JsonFileStore {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.tables.read().get_user(id))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.tables.read().get_user_by_email(email))
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.mutate(|t| t.create_user(user))
    }

    async fn get_script(&self, id: i64) -> Result<Option<Script>> {
        Ok(self.tables.read().get_script(id))
    }

    async fn scripts_by_user(&self, user_id: i64) -> Result<Vec<Script>> {
        Ok(self.tables.read().scripts_by_user(user_id))
    }

    async fn create_script(&self, user_id: i64, script: NewScript) -> Result<Script> {
        self.mutate(|t| Ok(t.create_script(user_id, script)))
    }

    async fn update_script(&self, id: i64, patch: ScriptPatch) -> Result<Option<Script>> {
        self.mutate(|t| t.update_script(id, patch))
    }

    async fn delete_script(&self, id: i64) -> Result<bool> {
        self.mutate(|t| Ok(t.delete_script(id)))
    }

    async fn create_ai_session(&self, session: NewAiSession) -> Result<AiSession> {
        self.mutate(|t| Ok(t.create_ai_session(session)))
    }

    async fn ai_sessions_by_script(&self, script_id: i64) -> Result<Vec<AiSession>> {
        Ok(self.tables.read().ai_sessions_by_script(script_id))
    }
}
