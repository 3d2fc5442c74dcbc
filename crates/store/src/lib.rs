//! Persistence for users, scripts and the AI-session audit log.
//!
//! Routes talk to a [`ScriptRepository`]; the backend is chosen from
//! `[store]` config at boot.

pub mod file;
pub mod memory;
pub mod repository;
mod tables;

use std::path::Path;
use std::sync::Arc;

use sw_domain::config::{StoreBackend, StoreConfig};
use sw_domain::error::Result;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use repository::ScriptRepository;

/// Build the repository selected by `cfg.backend`.
pub fn open(cfg: &StoreConfig) -> Result<Arc<dyn ScriptRepository>> {
    Ok(match cfg.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::File => Arc::new(JsonFileStore::open(Path::new(&cfg.path))?),
    })
}
