// Integration tests for playback resource cleanup
//
// The synthesized speech file must be removed exactly once, no matter how
// many completion signals the sink emits, and on every exit path.

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use vozbot::{watch_playback, SpeechResource};

async fn wait_until_gone(path: &PathBuf) {
    for _ in 0..200 {
        if !path.exists() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[test]
fn release_is_idempotent() -> Result<()> {
    let mut resource = SpeechResource::write(b"fake mp3 bytes")?;
    let path = resource.path().expect("fresh resource has a path").to_path_buf();
    assert!(path.exists());

    resource.release();
    assert!(!path.exists(), "File should be removed on first release");
    assert!(resource.path().is_none());

    // Second release must be harmless
    resource.release();
    assert!(!path.exists());
    Ok(())
}

#[test]
fn drop_releases_the_file() -> Result<()> {
    let resource = SpeechResource::write(b"fake mp3 bytes")?;
    let path = resource.path().expect("fresh resource has a path").to_path_buf();

    drop(resource);
    assert!(!path.exists(), "File should be removed on drop");
    Ok(())
}

#[tokio::test]
async fn cleanup_runs_once_despite_duplicate_signals() -> Result<()> {
    let resource = SpeechResource::write(b"fake mp3 bytes")?;
    let path = resource.path().expect("fresh resource has a path").to_path_buf();

    let (tx, rx) = mpsc::channel(8);

    // A chatty sink reports idle three times for one clip
    tx.send(()).await?;
    tx.send(()).await?;
    tx.send(()).await?;

    let watcher = watch_playback(resource, rx);
    watcher.await?;

    assert!(!path.exists(), "File should be removed after first signal");

    // Later signals land on a closed channel and are ignored
    assert!(tx.send(()).await.is_err());
    Ok(())
}

#[tokio::test]
async fn cleanup_runs_when_sink_disconnects_without_signaling() -> Result<()> {
    let resource = SpeechResource::write(b"fake mp3 bytes")?;
    let path = resource.path().expect("fresh resource has a path").to_path_buf();

    let (tx, rx) = mpsc::channel::<()>(1);
    let watcher = watch_playback(resource, rx);

    // Sink goes away without ever reporting completion
    drop(tx);

    watcher.await?;
    wait_until_gone(&path).await;
    assert!(!path.exists(), "File should be removed on sink disconnect");
    Ok(())
}
