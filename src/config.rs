use crate::convo::TurnSettings;
use crate::services::OpenAiConfig;
use crate::session::SessionConfig;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub bot: BotConfig,
    pub audio: SessionConfig,
    pub conversation: ConversationConfig,
    pub openai: OpenAiConfig,
}

#[derive(Debug, Deserialize)]
pub struct BotConfig {
    /// The bot's own participant id; its speech is never captured
    pub participant_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct ConversationConfig {
    /// Ordered greeting prefixes that address the bot
    pub trigger_phrases: Vec<String>,
    pub system_prompt: String,
    /// Language hint for transcription (ISO 639-1)
    pub language: String,
    /// Conversation memory bound per channel
    pub max_history: usize,
}

impl ConversationConfig {
    pub fn turn_settings(&self) -> TurnSettings {
        TurnSettings {
            trigger_phrases: self.trigger_phrases.clone(),
            system_prompt: self.system_prompt.clone(),
            language: self.language.clone(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
