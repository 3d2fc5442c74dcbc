//! Agent registry with per-agent locking and idle eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use sw_domain::config::SessionsConfig;
use sw_domain::trace::TraceEvent;

/// Shared handle to a registered agent. Lock it for the duration of one
/// operation; holders block each other, not other sessions.
pub type AgentHandle<A> = Arc<tokio::sync::Mutex<A>>;

struct Entry<A> {
    agent: AgentHandle<A>,
    last_touched: Instant,
}

impl<A> Entry<A> {
    /// No request holds a handle (so none can be running or waiting).
    fn is_idle(&self) -> bool {
        Arc::strong_count(&self.agent) == 1
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// AgentRegistry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Owns every live agent, keyed by session key.
///
/// Entries in use by a request are never evicted, neither by the idle
/// sweep nor by the capacity bound.
pub struct AgentRegistry<A> {
    entries: Mutex<HashMap<String, Entry<A>>>,
    idle_ttl: Duration,
    /// `0` disables the bound.
    max_sessions: usize,
}

impl<A> AgentRegistry<A> {
    pub fn new(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            idle_ttl,
            max_sessions,
        }
    }

    pub fn from_config(cfg: &SessionsConfig) -> Self {
        Self::new(Duration::from_secs(cfg.idle_ttl_secs), cfg.max_sessions)
    }

    /// Register `agent` under `key`, replacing any existing entry.
    ///
    /// A request still holding the replaced agent finishes on it; its
    /// result is simply no longer reachable through the registry.
    /// Returns the handle to the new agent and whether an entry was replaced.
    pub fn insert(&self, key: &str, agent: A) -> (AgentHandle<A>, bool) {
        let handle = Arc::new(tokio::sync::Mutex::new(agent));
        let mut entries = self.entries.lock();

        if !entries.contains_key(key) {
            self.make_room(&mut entries);
        }

        let replaced = entries
            .insert(
                key.to_owned(),
                Entry {
                    agent: handle.clone(),
                    last_touched: Instant::now(),
                },
            )
            .is_some();

        if replaced {
            tracing::info!(session_key = %key, "replaced existing agent session");
        }
        TraceEvent::SessionOpened {
            session_key: key.to_owned(),
            replaced,
        }
        .emit();

        (handle, replaced)
    }

    /// Fetch the agent for `key` and mark it as recently used.
    pub fn get(&self, key: &str) -> Option<AgentHandle<A>> {
        let mut entries = self.entries.lock();
        let entry = entries.get_mut(key)?;
        entry.last_touched = Instant::now();
        Some(entry.agent.clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// Explicitly close a session. Returns whether it existed.
    pub fn remove(&self, key: &str) -> bool {
        let removed = self.entries.lock().remove(key).is_some();
        if removed {
            TraceEvent::SessionClosed {
                session_key: key.to_owned(),
            }
            .emit();
        }
        removed
    }

    /// Remove the entry for `key` only if it still holds `handle`, so a
    /// request finishing on a replaced agent cannot close its successor.
    pub fn remove_if_current(&self, key: &str, handle: &AgentHandle<A>) -> bool {
        let mut entries = self.entries.lock();
        let current = entries
            .get(key)
            .is_some_and(|e| Arc::ptr_eq(&e.agent, handle));
        if current {
            entries.remove(key);
            drop(entries);
            TraceEvent::SessionClosed {
                session_key: key.to_owned(),
            }
            .emit();
        }
        current
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Evict idle entries untouched for longer than the TTL, as seen at `now`.
    /// Returns the evicted keys.
    pub fn sweep_at(&self, now: Instant) -> Vec<String> {
        let mut evicted = Vec::new();
        {
            let mut entries = self.entries.lock();
            entries.retain(|key, entry| {
                let expired = now.saturating_duration_since(entry.last_touched) > self.idle_ttl;
                if expired && entry.is_idle() {
                    evicted.push(key.clone());
                    false
                } else {
                    true
                }
            });
        }
        for key in &evicted {
            TraceEvent::SessionEvicted {
                session_key: key.clone(),
                reason: "idle".into(),
            }
            .emit();
        }
        evicted
    }

    pub fn sweep(&self) -> Vec<String> {
        self.sweep_at(Instant::now())
    }

    /// Drop the least-recently-touched idle entry when at capacity. When
    /// every entry is busy the bound is exceeded rather than failing.
    fn make_room(&self, entries: &mut HashMap<String, Entry<A>>) {
        if self.max_sessions == 0 || entries.len() < self.max_sessions {
            return;
        }
        let victim = entries
            .iter()
            .filter(|(_, e)| e.is_idle())
            .min_by_key(|(_, e)| e.last_touched)
            .map(|(k, _)| k.clone());

        match victim {
            Some(key) => {
                entries.remove(&key);
                TraceEvent::SessionEvicted {
                    session_key: key,
                    reason: "capacity".into(),
                }
                .emit();
            }
            None => tracing::warn!(
                max_sessions = self.max_sessions,
                "session capacity reached with every session busy"
            ),
        }
    }
}

impl<A: Send + 'static> AgentRegistry<A> {
    /// Run [`sweep`](Self::sweep) every `interval` until the task is aborted.
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = self.sweep();
                if !evicted.is_empty() {
                    tracing::debug!(count = evicted.len(), "swept idle sessions");
                }
            }
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
