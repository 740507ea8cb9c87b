use serde::{Deserialize, Serialize};

/// Configuration for one channel's capture session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sample rate the platform decodes voice to (48 kHz for Opus)
    pub sample_rate: u32,

    /// Channel count of decoded audio (2 = stereo)
    pub channels: u16,

    /// Shortest segment worth transcribing, in milliseconds
    pub min_segment_ms: u64,

    /// Longest segment worth transcribing, in milliseconds
    pub max_segment_ms: u64,

    /// Silence window the platform uses to end a segment, in milliseconds
    pub silence_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            channels: 2,
            min_segment_ms: 500,
            max_segment_ms: 10_000,
            silence_ms: 100,
        }
    }
}
