use super::config::SessionConfig;
use super::session::{SessionEvent, VoiceSession};
use super::stats::SessionStats;
use crate::convo::{ConversationTurnController, TurnSettings};
use crate::playback::PlaybackSink;
use crate::services::{LanguageModel, SpeechSynthesizer, SpeechToText};
use crate::{ChannelId, ParticipantId};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Voice-connection side of the platform
#[async_trait]
pub trait VoiceGateway: Send + Sync {
    /// Resolves once the voice connection for `channel` can carry audio
    async fn wait_ready(&self, channel: ChannelId) -> Result<()>;
}

/// How long to wait for a voice connection before failing the join
const JOIN_READY_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-bot knobs shared by every channel session
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// The bot's own participant id; its speech is never captured
    pub bot_participant: ParticipantId,
    pub session: SessionConfig,
    pub turn: TurnSettings,
    /// Conversation memory bound per channel
    pub max_history: usize,
}

/// Registry of active channel sessions: one owned `VoiceSession` per joined
/// channel, created on join and destroyed on leave. Cross-channel state is
/// fully independent; sessions only share the service clients.
pub struct SessionRegistry {
    config: RegistryConfig,
    gateway: Arc<dyn VoiceGateway>,
    stt: Arc<dyn SpeechToText>,
    llm: Arc<dyn LanguageModel>,
    tts: Arc<dyn SpeechSynthesizer>,
    playback: Arc<dyn PlaybackSink>,
    sessions: RwLock<HashMap<ChannelId, VoiceSession>>,
}

impl SessionRegistry {
    pub fn new(
        config: RegistryConfig,
        gateway: Arc<dyn VoiceGateway>,
        stt: Arc<dyn SpeechToText>,
        llm: Arc<dyn LanguageModel>,
        tts: Arc<dyn SpeechSynthesizer>,
        playback: Arc<dyn PlaybackSink>,
    ) -> Self {
        Self {
            config,
            gateway,
            stt,
            llm,
            tts,
            playback,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Join a channel: wait (bounded) for the voice connection, then spawn
    /// the channel's session. Fails when already joined or when the
    /// connection does not become ready within 30 seconds.
    pub async fn join(&self, channel: ChannelId) -> Result<()> {
        {
            let sessions = self.sessions.read().await;
            if sessions.contains_key(&channel) {
                bail!("already active in channel {channel}");
            }
        }

        tokio::time::timeout(JOIN_READY_TIMEOUT, self.gateway.wait_ready(channel))
            .await
            .with_context(|| {
                format!(
                    "voice connection for channel {channel} not ready within {}s",
                    JOIN_READY_TIMEOUT.as_secs()
                )
            })?
            .with_context(|| format!("voice connection for channel {channel} failed"))?;

        let controller = Arc::new(ConversationTurnController::new(
            channel,
            Arc::clone(&self.stt),
            Arc::clone(&self.llm),
            Arc::clone(&self.tts),
            Arc::clone(&self.playback),
            self.config.turn.clone(),
            self.config.max_history,
        ));

        let session = VoiceSession::spawn(
            channel,
            self.config.bot_participant,
            self.config.session.clone(),
            controller,
        );

        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&channel) {
            // Lost a join race for the same channel; keep the existing session.
            warn!(channel, "concurrent join detected, discarding new session");
            session.stop().await;
            bail!("already active in channel {channel}");
        }
        sessions.insert(channel, session);

        info!(channel, "joined voice channel");
        Ok(())
    }

    /// Leave a channel, destroying all of its state
    pub async fn leave(&self, channel: ChannelId) -> Result<()> {
        let session = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(&channel)
        };

        match session {
            Some(session) => {
                session.stop().await;
                info!(channel, "left voice channel");
                Ok(())
            }
            None => bail!("not active in channel {channel}"),
        }
    }

    /// Route a platform event to the owning session. Events for channels
    /// without a session are dropped.
    pub async fn dispatch(&self, channel: ChannelId, event: SessionEvent) {
        let sessions = self.sessions.read().await;
        if let Some(session) = sessions.get(&channel) {
            if let Err(e) = session.send(event).await {
                warn!(channel, "failed to deliver event: {e:#}");
            }
        }
    }

    pub async fn is_active(&self, channel: ChannelId) -> bool {
        self.sessions.read().await.contains_key(&channel)
    }

    pub async fn stats(&self, channel: ChannelId) -> Option<SessionStats> {
        let sessions = self.sessions.read().await;
        match sessions.get(&channel) {
            Some(session) => Some(session.stats().await),
            None => None,
        }
    }

    /// Tear down every session (process shutdown)
    pub async fn shutdown(&self) {
        let sessions = {
            let mut sessions = self.sessions.write().await;
            std::mem::take(&mut *sessions)
        };

        for (_, session) in sessions {
            session.stop().await;
        }
    }
}
