pub mod audio;
pub mod config;
pub mod convo;
pub mod playback;
pub mod services;
pub mod session;

/// Voice-channel identifier assigned by the platform
pub type ChannelId = u64;

/// Participant (user) identifier assigned by the platform
pub type ParticipantId = u64;

pub use audio::{encode_wav, AudioFrame, AudioSegment, AudioSegmentBuffer, EncodedClip};
pub use config::Config;
pub use convo::{
    ConversationHistory, ConversationTurnController, HistoryEntry, Role, TurnGate, TurnOutcome,
    TurnPhase, TurnSettings,
};
pub use playback::{watch_playback, PlaybackSink, SpeechResource};
pub use services::{
    LanguageModel, OpenAiConfig, OpenAiService, SpeechSynthesizer, SpeechToText,
};
pub use session::{
    RegistryConfig, SessionConfig, SessionEvent, SessionRegistry, SessionStats,
    SpeakingSessionTracker, VoiceGateway, VoiceSession,
};
