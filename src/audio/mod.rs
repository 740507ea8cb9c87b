pub mod segment;
pub mod wav;

pub use segment::{AudioSegment, AudioSegmentBuffer};
pub use wav::{encode_wav, EncodedClip};

/// Decoded audio delivered by the voice platform (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
}
