//! Seams for the three external AI services. The bot core only depends on
//! these traits; the OpenAI implementations live in [`openai`].

pub mod openai;

pub use openai::{OpenAiConfig, OpenAiService};

use crate::audio::EncodedClip;
use crate::convo::HistoryEntry;
use anyhow::Result;
use async_trait::async_trait;

/// Speech-to-text service
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe a WAV clip, biased by a fixed language hint
    async fn transcribe(&self, clip: &EncodedClip, language: &str) -> Result<String>;
}

/// Conversational language-model service
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a reply from the system prompt + bounded history
    async fn complete(&self, messages: &[HistoryEntry]) -> Result<String>;
}

/// Text-to-speech service
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize speech audio for a reply
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}
