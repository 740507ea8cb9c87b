use super::AudioFrame;

/// Accumulates decoded frames for one in-progress recording.
///
/// Frames are kept in arrival order and concatenated into a single
/// contiguous segment when the platform signals end of speech. Nothing is
/// reordered or dropped, except when the whole session is torn down before
/// the segment completes.
#[derive(Debug, Default)]
pub struct AudioSegmentBuffer {
    frames: Vec<AudioFrame>,
}

impl AudioSegmentBuffer {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Append a decoded frame, preserving arrival order
    pub fn push(&mut self, frame: AudioFrame) {
        self.frames.push(frame);
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Concatenate all buffered frames into one segment, leaving the buffer empty
    pub fn finalize(&mut self, duration_ms: u64, sample_rate: u32, channels: u16) -> AudioSegment {
        let total: usize = self.frames.iter().map(|f| f.samples.len()).sum();
        let mut samples = Vec::with_capacity(total);
        for frame in self.frames.drain(..) {
            samples.extend(frame.samples);
        }

        AudioSegment {
            samples,
            duration_ms,
            sample_rate,
            channels,
        }
    }
}

/// One completed span of a single participant's captured speech.
///
/// Immutable once produced; consumed by the WAV encoder and discarded.
#[derive(Debug, Clone)]
pub struct AudioSegment {
    pub samples: Vec<i16>,
    pub duration_ms: u64,
    pub sample_rate: u32,
    pub channels: u16,
}
