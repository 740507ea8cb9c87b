use super::config::SessionConfig;
use super::stats::SessionStats;
use super::tracker::SpeakingSessionTracker;
use crate::audio::{encode_wav, AudioFrame};
use crate::convo::ConversationTurnController;
use crate::{ChannelId, ParticipantId};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// A platform signal, translated into the owning session's state machine.
///
/// Each event is consumed synchronously by the session task, so per-channel
/// state never sees concurrent mutation and needs no locking.
#[derive(Debug)]
pub enum SessionEvent {
    /// A participant began speaking
    SpeechStart { participant: ParticipantId },
    /// Decoded audio for a participant
    Audio {
        participant: ParticipantId,
        frame: AudioFrame,
    },
    /// The platform's silence-based end-of-segment condition fired
    SpeechEnd,
    /// Reset this channel's conversation memory
    ClearHistory,
}

/// One live voice-channel session.
///
/// Owns all per-channel state: the recording tracker and the turn
/// controller (which holds that channel's conversation history). Destroyed
/// atomically on leave; buffers are dropped and history cleared. An AI call
/// already in flight is not cancelled, its late result is discarded.
pub struct VoiceSession {
    channel_id: ChannelId,
    events_tx: mpsc::Sender<SessionEvent>,
    task: JoinHandle<()>,
    controller: Arc<ConversationTurnController>,
    started_at: DateTime<Utc>,
}

impl VoiceSession {
    /// Spawn the session task for a channel
    pub fn spawn(
        channel_id: ChannelId,
        bot_participant: ParticipantId,
        config: SessionConfig,
        controller: Arc<ConversationTurnController>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);

        let task_controller = Arc::clone(&controller);
        let task = tokio::spawn(async move {
            run_session(channel_id, bot_participant, config, task_controller, events_rx).await;
        });

        info!(channel = channel_id, "voice session started");

        Self {
            channel_id,
            events_tx,
            task,
            controller,
            started_at: Utc::now(),
        }
    }

    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    /// Deliver a platform event to the session
    pub async fn send(&self, event: SessionEvent) -> Result<()> {
        self.events_tx
            .send(event)
            .await
            .map_err(|_| anyhow!("session task for channel {} is gone", self.channel_id))
    }

    pub async fn stats(&self) -> SessionStats {
        let uptime = Utc::now().signed_duration_since(self.started_at);
        SessionStats {
            channel_id: self.channel_id,
            started_at: self.started_at,
            uptime_secs: uptime.num_milliseconds() as f64 / 1000.0,
            turn_phase: self.controller.phase(),
            history_entries: self.controller.history_len().await,
        }
    }

    /// Tear the session down: the event stream closes, the task drains and
    /// exits, buffers are dropped and conversation memory is cleared.
    pub async fn stop(self) {
        self.controller.clear_history().await;

        drop(self.events_tx);
        if let Err(e) = self.task.await {
            error!(channel = self.channel_id, "session task panicked: {e}");
        }

        info!(channel = self.channel_id, "voice session stopped");
    }
}

async fn run_session(
    channel_id: ChannelId,
    bot_participant: ParticipantId,
    config: SessionConfig,
    controller: Arc<ConversationTurnController>,
    mut events_rx: mpsc::Receiver<SessionEvent>,
) {
    let mut tracker = SpeakingSessionTracker::new(config, bot_participant);
    let clock = Instant::now();

    while let Some(event) = events_rx.recv().await {
        let now_ms = clock.elapsed().as_millis() as u64;

        match event {
            SessionEvent::SpeechStart { participant } => {
                tracker.on_speech_start(participant, now_ms);
            }
            SessionEvent::Audio { participant, frame } => {
                tracker.on_audio(participant, frame);
            }
            SessionEvent::SpeechEnd => {
                let Some(segment) = tracker.on_segment_complete(now_ms) else {
                    continue;
                };

                let clip = match encode_wav(&segment.samples, segment.sample_rate, segment.channels)
                {
                    Ok(clip) => clip,
                    Err(e) => {
                        error!(channel = channel_id, "failed to encode segment: {e:#}");
                        continue;
                    }
                };

                // The turn runs alongside the event loop so capture keeps
                // going; the gate drops clips completed while it is busy.
                let controller = Arc::clone(&controller);
                tokio::spawn(async move {
                    let outcome = controller.submit(clip).await;
                    debug!(channel = channel_id, ?outcome, "turn finished");
                });
            }
            SessionEvent::ClearHistory => {
                controller.clear_history().await;
                info!(channel = channel_id, "conversation history cleared");
            }
        }
    }

    debug!(channel = channel_id, "session event stream closed");
}
