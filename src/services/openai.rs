//! OpenAI-backed implementations of the three service seams: Whisper-style
//! transcription, chat completion, and speech synthesis, all over the
//! plain REST API.

use super::{LanguageModel, SpeechSynthesizer, SpeechToText};
use crate::audio::EncodedClip;
use crate::convo::HistoryEntry;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Settings for the OpenAI-backed services
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    /// Transcription model (e.g. "gpt-4o-mini-transcribe")
    pub transcription_model: String,
    /// Chat model (e.g. "gpt-4o-mini")
    pub chat_model: String,
    /// Speech synthesis model (e.g. "tts-1")
    pub speech_model: String,
    /// Synthesis voice (e.g. "alloy")
    pub voice: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            transcription_model: "gpt-4o-mini-transcribe".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            speech_model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            max_tokens: 150,
            temperature: 0.7,
        }
    }
}

/// Shared client for the three OpenAI endpoints.
///
/// No request timeout is applied; a hung call holds its channel's turn gate
/// until the connection dies. Known gap carried over from the upstream bot.
pub struct OpenAiService {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiService {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [HistoryEntry],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
}

#[async_trait]
impl SpeechToText for OpenAiService {
    async fn transcribe(&self, clip: &EncodedClip, language: &str) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(clip.bytes.clone())
            .file_name("clip.wav")
            .mime_str("audio/wav")
            .context("Failed to build clip part")?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.config.transcription_model.clone())
            .text("language", language.to_string())
            .text("response_format", "text");

        let response = self
            .client
            .post(self.url("audio/transcriptions"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .context("Transcription request failed")?;

        if !response.status().is_success() {
            bail!("Transcription service returned {}", response.status());
        }

        let transcript = response
            .text()
            .await
            .context("Failed to read transcript body")?;

        debug!(bytes = clip.len(), chars = transcript.len(), "transcription complete");

        Ok(transcript)
    }
}

#[async_trait]
impl LanguageModel for OpenAiService {
    async fn complete(&self, messages: &[HistoryEntry]) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.chat_model,
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.url("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .context("Chat completion request failed")?;

        if !response.status().is_success() {
            bail!("Chat service returned {}", response.status());
        }

        let body: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat completion")?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .context("Chat completion had no choices")
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiService {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let request = SpeechRequest {
            model: &self.config.speech_model,
            voice: &self.config.voice,
            input: text,
        };

        let response = self
            .client
            .post(self.url("audio/speech"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .context("Speech synthesis request failed")?;

        if !response.status().is_success() {
            bail!("Speech service returned {}", response.status());
        }

        let audio = response
            .bytes()
            .await
            .context("Failed to read synthesized audio")?;

        debug!(bytes = audio.len(), "speech synthesis complete");

        Ok(audio.to_vec())
    }
}
