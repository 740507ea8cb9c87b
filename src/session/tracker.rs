use super::config::SessionConfig;
use crate::audio::{AudioFrame, AudioSegment, AudioSegmentBuffer};
use crate::ParticipantId;
use tracing::debug;

/// Recording state for one channel
enum RecordingState {
    Idle,
    Recording {
        participant: ParticipantId,
        started_ms: u64,
        buffer: AudioSegmentBuffer,
    },
}

/// Tracks which participant is being captured in a channel and turns the
/// platform's speech-start / segment-end signals into completed segments.
///
/// Only one participant is captured at a time: a speaker starting while a
/// recording is active is ignored until the current segment completes.
/// Intentional limitation carried over from the upstream bot.
///
/// Timestamps are caller-supplied milliseconds on a monotonic clock, so the
/// duration filter is exact and testable.
pub struct SpeakingSessionTracker {
    config: SessionConfig,
    bot_participant: ParticipantId,
    state: RecordingState,
}

impl SpeakingSessionTracker {
    pub fn new(config: SessionConfig, bot_participant: ParticipantId) -> Self {
        Self {
            config,
            bot_participant,
            state: RecordingState::Idle,
        }
    }

    /// Begin recording `participant` unless a recording is already active
    /// or the speaker is the bot itself. Returns whether recording started.
    pub fn on_speech_start(&mut self, participant: ParticipantId, now_ms: u64) -> bool {
        if participant == self.bot_participant {
            return false;
        }

        if matches!(self.state, RecordingState::Recording { .. }) {
            debug!(participant, "speech start ignored: already recording");
            return false;
        }

        self.state = RecordingState::Recording {
            participant,
            started_ms: now_ms,
            buffer: AudioSegmentBuffer::new(),
        };

        debug!(participant, "recording started");
        true
    }

    /// Append a decoded frame for the participant currently being recorded.
    /// Frames from anyone else are dropped.
    pub fn on_audio(&mut self, participant: ParticipantId, frame: AudioFrame) {
        if let RecordingState::Recording {
            participant: active,
            buffer,
            ..
        } = &mut self.state
        {
            if *active == participant {
                buffer.push(frame);
            }
        }
    }

    /// Complete the in-progress segment.
    ///
    /// Emits the accumulated audio only when its duration falls inside the
    /// configured window; out-of-range segments are discarded. Either way
    /// the tracker returns to idle so the next speaker can be captured.
    pub fn on_segment_complete(&mut self, now_ms: u64) -> Option<AudioSegment> {
        let state = std::mem::replace(&mut self.state, RecordingState::Idle);
        let RecordingState::Recording {
            participant,
            started_ms,
            mut buffer,
        } = state
        else {
            return None;
        };

        let duration_ms = now_ms.saturating_sub(started_ms);
        if duration_ms < self.config.min_segment_ms || duration_ms > self.config.max_segment_ms {
            debug!(
                participant,
                duration_ms, "segment discarded: outside duration window"
            );
            return None;
        }

        debug!(
            participant,
            duration_ms,
            frames = buffer.frame_count(),
            "segment complete"
        );

        Some(buffer.finalize(duration_ms, self.config.sample_rate, self.config.channels))
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecordingState::Recording { .. })
    }

    /// Drop any in-progress recording without emitting a segment
    pub fn reset(&mut self) {
        self.state = RecordingState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: ParticipantId = 99;

    fn tracker() -> SpeakingSessionTracker {
        SpeakingSessionTracker::new(SessionConfig::default(), BOT)
    }

    fn frame(samples: Vec<i16>) -> AudioFrame {
        AudioFrame {
            samples,
            sample_rate: 48_000,
            channels: 2,
        }
    }

    #[test]
    fn second_speaker_is_ignored_until_segment_completes() {
        let mut t = tracker();
        assert!(t.on_speech_start(1, 0));
        assert!(!t.on_speech_start(2, 100), "Second speaker must be ignored");

        t.on_audio(1, frame(vec![1, 2]));
        t.on_audio(2, frame(vec![9, 9])); // not the active speaker

        let segment = t.on_segment_complete(1000).expect("in-window segment");
        assert_eq!(segment.samples, vec![1, 2]);

        assert!(t.on_speech_start(2, 1100), "Tracker must be free again");
    }

    #[test]
    fn bot_speech_is_never_captured() {
        let mut t = tracker();
        assert!(!t.on_speech_start(BOT, 0));
        assert!(!t.is_recording());
    }

    #[test]
    fn too_short_segment_is_discarded() {
        let mut t = tracker();
        t.on_speech_start(1, 0);
        t.on_audio(1, frame(vec![1]));
        assert!(t.on_segment_complete(499).is_none());
        assert!(!t.is_recording(), "Tracker must return to idle");
    }

    #[test]
    fn too_long_segment_is_discarded() {
        let mut t = tracker();
        t.on_speech_start(1, 0);
        t.on_audio(1, frame(vec![1]));
        assert!(t.on_segment_complete(12_000).is_none());
    }

    #[test]
    fn boundary_durations_are_accepted() {
        let mut t = tracker();
        t.on_speech_start(1, 0);
        t.on_audio(1, frame(vec![1]));
        assert!(t.on_segment_complete(500).is_some());

        t.on_speech_start(1, 1000);
        t.on_audio(1, frame(vec![2]));
        assert!(t.on_segment_complete(11_000).is_some()); // exactly 10s
    }

    #[test]
    fn complete_without_recording_is_a_no_op() {
        let mut t = tracker();
        assert!(t.on_segment_complete(1000).is_none());
    }
}
