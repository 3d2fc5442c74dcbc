//! In-flight wizard sessions.
//!
//! One agent per script, keyed by a deterministic session key and guarded
//! by an async mutex so requests for the same script run one at a time.
//! Idle sessions are evicted by a background sweeper.

pub mod registry;
pub mod session_key;

pub use registry::{AgentHandle, AgentRegistry};
pub use session_key::session_key;
