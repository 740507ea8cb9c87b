use anyhow::Result;
use clap::Parser;
use tracing::info;
use vozbot::Config;

/// Voice-chat bot core: listens, transcribes, and replies with synthesized
/// speech when addressed by a trigger phrase.
#[derive(Parser)]
#[command(name = "vozbot", version)]
struct Cli {
    /// Configuration file path, without extension (`config` crate style)
    #[arg(long, default_value = "config/vozbot")]
    config: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("vozbot v0.1.0");
    info!(
        "Audio: {}Hz, {} channels, segments {}-{}ms, silence window {}ms",
        cfg.audio.sample_rate,
        cfg.audio.channels,
        cfg.audio.min_segment_ms,
        cfg.audio.max_segment_ms,
        cfg.audio.silence_ms
    );
    info!("Trigger phrases: {}", cfg.conversation.trigger_phrases.join(", "));
    info!(
        "Models: stt={}, chat={} (max_tokens={}, temperature={}), tts={}/{}",
        cfg.openai.transcription_model,
        cfg.openai.chat_model,
        cfg.openai.max_tokens,
        cfg.openai.temperature,
        cfg.openai.speech_model,
        cfg.openai.voice
    );
    info!("Conversation memory: {} entries per channel", cfg.conversation.max_history);
    info!("Configuration OK. Embed vozbot::SessionRegistry behind your platform gateway to go live.");

    Ok(())
}
