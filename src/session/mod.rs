//! Per-channel voice sessions
//!
//! This module provides the per-channel session machinery:
//! - `SpeakingSessionTracker`: who is being recorded, duration filtering
//! - `VoiceSession`: one event-driven task owning a channel's state
//! - `SessionRegistry`: join/leave lifecycle across channels

mod config;
mod registry;
mod session;
mod stats;
mod tracker;

pub use config::SessionConfig;
pub use registry::{RegistryConfig, SessionRegistry, VoiceGateway};
pub use session::{SessionEvent, VoiceSession};
pub use stats::SessionStats;
pub use tracker::SpeakingSessionTracker;
