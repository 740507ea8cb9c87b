use anyhow::{Context, Result};
use std::io::Cursor;

/// A WAV-container clip ready for the transcription service.
///
/// Transient: exists only between encoding and the transcription call,
/// never persisted beyond it.
#[derive(Debug, Clone)]
pub struct EncodedClip {
    pub bytes: Vec<u8>,
}

impl EncodedClip {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Wrap raw PCM samples in a canonical WAV container.
///
/// Produces the standard 44-byte header (RIFF/WAVE, 16-byte PCM fmt chunk,
/// data chunk) followed by the little-endian sample bytes. The transcription
/// service, like any standard container reader, depends on this being
/// byte-exact.
pub fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Result<EncodedClip> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer =
        hound::WavWriter::new(&mut cursor, spec).context("Failed to create WAV writer")?;
    for &sample in samples {
        writer
            .write_sample(sample)
            .context("Failed to write sample to WAV clip")?;
    }
    writer.finalize().context("Failed to finalize WAV header")?;

    Ok(EncodedClip {
        bytes: cursor.into_inner(),
    })
}
