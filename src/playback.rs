//! Playback handoff: ephemeral storage for synthesized speech and the
//! exactly-once cleanup that runs when the sink reports playback idle.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Playback side of the voice platform.
///
/// `play` hands a synthesized clip to the platform and returns its
/// completion signal stream. The platform may report idle more than once
/// for a single clip; consumers must tolerate duplicate signals.
#[async_trait]
pub trait PlaybackSink: Send + Sync {
    async fn play(&self, clip: &Path) -> Result<mpsc::Receiver<()>>;
}

/// Synthesized speech written to ephemeral storage for the playback sink.
///
/// Release is idempotent: the backing file is removed at most once, on the
/// first `release` call or on drop, whichever comes first.
pub struct SpeechResource {
    file: Option<NamedTempFile>,
}

impl SpeechResource {
    /// Write synthesized audio bytes to a fresh temp file
    pub fn write(audio: &[u8]) -> Result<Self> {
        let mut file = NamedTempFile::new().context("Failed to create speech temp file")?;
        file.write_all(audio)
            .context("Failed to write synthesized audio")?;
        file.flush().context("Failed to flush synthesized audio")?;

        debug!("Synthesized speech written to {}", file.path().display());

        Ok(Self { file: Some(file) })
    }

    /// Path of the backing file, until released
    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(|f| f.path())
    }

    /// Remove the backing file. Safe to call more than once; a removal
    /// failure is logged and otherwise ignored.
    pub fn release(&mut self) {
        if let Some(file) = self.file.take() {
            let path = file.path().to_path_buf();
            match file.close() {
                Ok(()) => debug!("Released speech file {}", path.display()),
                Err(e) => warn!("Failed to remove speech file {}: {}", path.display(), e),
            }
        }
    }
}

impl Drop for SpeechResource {
    fn drop(&mut self) {
        self.release();
    }
}

/// Watch the sink's completion signals and release the speech resource.
///
/// The release runs exactly once: on the first idle signal, or when the
/// sink drops its sender without ever signaling. Further signals land on a
/// closed channel and are ignored.
pub fn watch_playback(
    mut resource: SpeechResource,
    mut completed: mpsc::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let _ = completed.recv().await;
        resource.release();
    })
}
