use crate::convo::TurnPhase;
use crate::ChannelId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot of one channel session's state, for the embedding application
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub channel_id: ChannelId,

    /// When the session was created
    pub started_at: DateTime<Utc>,

    /// Seconds since the session was created
    pub uptime_secs: f64,

    /// Current phase of the turn state machine
    #[serde(serialize_with = "phase_name")]
    pub turn_phase: TurnPhase,

    /// Entries currently held in conversation memory
    pub history_entries: usize,
}

fn phase_name<S: serde::Serializer>(phase: &TurnPhase, s: S) -> Result<S::Ok, S::Error> {
    let name = match phase {
        TurnPhase::Idle => "idle",
        TurnPhase::Transcribing => "transcribing",
        TurnPhase::Generating => "generating",
        TurnPhase::Speaking => "speaking",
    };
    s.serialize_str(name)
}
