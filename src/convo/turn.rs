use super::history::{ConversationHistory, HistoryEntry};
use super::trigger::strip_trigger;
use crate::audio::EncodedClip;
use crate::playback::{watch_playback, PlaybackSink, SpeechResource};
use crate::services::{LanguageModel, SpeechSynthesizer, SpeechToText};
use crate::ChannelId;
use anyhow::{bail, Result};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Where a channel's conversational turn currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Transcribing,
    Generating,
    Speaking,
}

impl TurnPhase {
    fn as_u8(self) -> u8 {
        match self {
            TurnPhase::Idle => 0,
            TurnPhase::Transcribing => 1,
            TurnPhase::Generating => 2,
            TurnPhase::Speaking => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => TurnPhase::Transcribing,
            2 => TurnPhase::Generating,
            3 => TurnPhase::Speaking,
            _ => TurnPhase::Idle,
        }
    }
}

/// Single-flight guard for one channel's turns.
///
/// `try_begin` hands out a permit only while the phase is `Idle`; the
/// permit restores `Idle` when dropped, so every exit path of a turn
/// releases the gate.
#[derive(Clone, Default)]
pub struct TurnGate {
    phase: Arc<AtomicU8>,
}

impl TurnGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TurnPhase {
        TurnPhase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    /// Claim the gate for a new turn. Returns `None` while a turn is in flight.
    pub fn try_begin(&self) -> Option<TurnPermit> {
        self.phase
            .compare_exchange(
                TurnPhase::Idle.as_u8(),
                TurnPhase::Transcribing.as_u8(),
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .ok()?;
        Some(TurnPermit { gate: self.clone() })
    }
}

/// Exclusive hold on a channel's turn gate for the duration of one turn
pub struct TurnPermit {
    gate: TurnGate,
}

impl TurnPermit {
    pub fn advance(&self, phase: TurnPhase) {
        self.gate.phase.store(phase.as_u8(), Ordering::SeqCst);
    }
}

impl Drop for TurnPermit {
    fn drop(&mut self) {
        self.gate.phase.store(TurnPhase::Idle.as_u8(), Ordering::SeqCst);
    }
}

/// How a submitted clip was resolved. Everything except `Spoke` is silent
/// from the participants' point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Reply synthesized and handed to the playback sink
    Spoke,
    /// Another turn was already in flight; clip dropped
    Busy,
    /// Transcript was empty or whitespace-only
    NoSpeech,
    /// Transcript did not open with a trigger phrase
    NotAddressed,
    /// An external service call failed; turn aborted
    Failed,
}

/// Fixed parameters applied to every turn in a channel
#[derive(Debug, Clone)]
pub struct TurnSettings {
    /// Ordered greeting prefixes that address the bot
    pub trigger_phrases: Vec<String>,
    pub system_prompt: String,
    /// Language hint passed to the transcription service
    pub language: String,
}

/// Drives one channel's conversational turns: transcribe, trigger-check,
/// generate, synthesize, hand off for playback.
///
/// At most one turn runs per channel at any time. A clip submitted while a
/// turn is in flight is dropped, never queued. Failures are logged and
/// contained inside the turn; silence is the only observable effect.
pub struct ConversationTurnController {
    channel_id: ChannelId,
    stt: Arc<dyn SpeechToText>,
    llm: Arc<dyn LanguageModel>,
    tts: Arc<dyn SpeechSynthesizer>,
    playback: Arc<dyn PlaybackSink>,
    gate: TurnGate,
    history: Mutex<ConversationHistory>,
    settings: TurnSettings,
}

impl ConversationTurnController {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        channel_id: ChannelId,
        stt: Arc<dyn SpeechToText>,
        llm: Arc<dyn LanguageModel>,
        tts: Arc<dyn SpeechSynthesizer>,
        playback: Arc<dyn PlaybackSink>,
        settings: TurnSettings,
        max_history: usize,
    ) -> Self {
        Self {
            channel_id,
            stt,
            llm,
            tts,
            playback,
            gate: TurnGate::new(),
            history: Mutex::new(ConversationHistory::new(max_history)),
            settings,
        }
    }

    /// Current phase of this channel's turn state machine
    pub fn phase(&self) -> TurnPhase {
        self.gate.phase()
    }

    pub async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }

    /// Run one conversational turn for an encoded clip.
    ///
    /// Returns to `Idle` once the synthesized reply is handed to the
    /// playback sink; it does not wait for playback to finish.
    pub async fn submit(&self, clip: EncodedClip) -> TurnOutcome {
        let Some(permit) = self.gate.try_begin() else {
            debug!(channel = self.channel_id, "turn in flight, dropping clip");
            return TurnOutcome::Busy;
        };

        let transcript = match self.stt.transcribe(&clip, &self.settings.language).await {
            Ok(text) => text,
            Err(e) => {
                warn!(channel = self.channel_id, "transcription failed: {e:#}");
                return TurnOutcome::Failed;
            }
        };

        if transcript.trim().is_empty() {
            debug!(channel = self.channel_id, "no speech detected");
            return TurnOutcome::NoSpeech;
        }

        info!(channel = self.channel_id, transcript = %transcript.trim(), "transcribed");

        let Some(message) = strip_trigger(&transcript, &self.settings.trigger_phrases) else {
            debug!(channel = self.channel_id, "no trigger phrase, not responding");
            return TurnOutcome::NotAddressed;
        };

        let messages = {
            let mut history = self.history.lock().await;
            history.push(HistoryEntry::user(message));
            history.to_messages(&self.settings.system_prompt)
        };

        permit.advance(TurnPhase::Generating);
        let reply = match self.llm.complete(&messages).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(channel = self.channel_id, "reply generation failed: {e:#}");
                return TurnOutcome::Failed;
            }
        };

        info!(channel = self.channel_id, reply = %reply, "reply generated");
        self.history
            .lock()
            .await
            .push(HistoryEntry::assistant(reply.clone()));

        permit.advance(TurnPhase::Speaking);
        let audio = match self.tts.synthesize(&reply).await {
            Ok(audio) => audio,
            Err(e) => {
                warn!(channel = self.channel_id, "speech synthesis failed: {e:#}");
                return TurnOutcome::Failed;
            }
        };

        if let Err(e) = self.speak(audio).await {
            warn!(channel = self.channel_id, "playback handoff failed: {e:#}");
            return TurnOutcome::Failed;
        }

        TurnOutcome::Spoke
    }

    /// Write synthesized audio to ephemeral storage, hand it to the sink,
    /// and arrange for exactly-once cleanup when playback goes idle.
    async fn speak(&self, audio: Vec<u8>) -> Result<()> {
        let resource = SpeechResource::write(&audio)?;
        let completed = match resource.path() {
            Some(path) => self.playback.play(path).await?,
            None => bail!("speech resource released before handoff"),
        };
        watch_playback(resource, completed);
        Ok(())
    }
}
