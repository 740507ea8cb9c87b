// Integration tests for the capture side: tracker -> buffer -> WAV clip
//
// These verify duration-based filtering, single-speaker capture, and that
// a completed segment encodes into a byte-exact WAV container.

use anyhow::Result;
use vozbot::{encode_wav, AudioFrame, SessionConfig, SpeakingSessionTracker};

const SPEAKER: u64 = 1;
const OTHER: u64 = 2;
const BOT: u64 = 999;

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
fn in_window_segment_encodes_to_exact_wav() -> Result<()> {
    let mut t = tracker();

    t.on_speech_start(SPEAKER, 0);
    t.on_audio(SPEAKER, frame(vec![10, 20]));
    t.on_audio(SPEAKER, frame(vec![30, 40, 50]));

    let segment = t.on_segment_complete(2000).expect("2000ms is in window");
    assert_eq!(segment.duration_ms, 2000);
    assert_eq!(segment.samples, vec![10, 20, 30, 40, 50]);

    let clip = encode_wav(&segment.samples, segment.sample_rate, segment.channels)?;
    let data_len = (segment.samples.len() * 2) as u32;

    assert_eq!(clip.len(), 44 + data_len as usize);
    assert_eq!(&clip.bytes[0..4], b"RIFF");
    assert_eq!(&clip.bytes[4..8], (36 + data_len).to_le_bytes());
    assert_eq!(&clip.bytes[8..12], b"WAVE");
    assert_eq!(&clip.bytes[40..44], data_len.to_le_bytes());
    Ok(())
}

#[test]
fn short_and_long_segments_never_reach_the_encoder() {
    let mut t = tracker();

    t.on_speech_start(SPEAKER, 0);
    t.on_audio(SPEAKER, frame(vec![1; 100]));
    assert!(t.on_segment_complete(300).is_none(), "300ms is too short");

    t.on_speech_start(SPEAKER, 1000);
    t.on_audio(SPEAKER, frame(vec![1; 100]));
    assert!(
        t.on_segment_complete(13_000).is_none(),
        "12000ms is too long"
    );
}

#[test]
fn only_the_active_speaker_is_buffered() {
    let mut t = tracker();

    t.on_speech_start(SPEAKER, 0);
    assert!(!t.on_speech_start(OTHER, 50), "Second speaker ignored");

    t.on_audio(SPEAKER, frame(vec![1, 2]));
    t.on_audio(OTHER, frame(vec![7, 7]));
    t.on_audio(SPEAKER, frame(vec![3, 4]));

    let segment = t.on_segment_complete(900).expect("in-window segment");
    assert_eq!(
        segment.samples,
        vec![1, 2, 3, 4],
        "Only the recorded participant's frames, in arrival order"
    );
}

#[test]
fn bot_speech_start_does_not_open_a_recording() {
    let mut t = tracker();
    assert!(!t.on_speech_start(BOT, 0));
    t.on_audio(BOT, frame(vec![1]));
    assert!(t.on_segment_complete(2000).is_none());
}

#[test]
fn tracker_recovers_after_discarded_segment() {
    let mut t = tracker();

    t.on_speech_start(SPEAKER, 0);
    assert!(t.on_segment_complete(100).is_none());

    // New capture works and does not contain stale audio
    assert!(t.on_speech_start(OTHER, 200));
    t.on_audio(OTHER, frame(vec![5]));
    let segment = t.on_segment_complete(1000).expect("in-window segment");
    assert_eq!(segment.samples, vec![5]);
}
