// Background task runner: one worker per accepted click

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use log::info;
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::downloader::models::{DownloadOutcome, DownloadRequest};
use crate::downloader::operation::download_video;
use crate::downloader::playlist::download_playlist;
use crate::downloader::progress::{transfer_fraction, ProgressTracker};
use crate::downloader::traits::{MediaProvider, ProgressSink};
use crate::metadata::{
    fetch_channel_info, fetch_playlist_info, fetch_video_info, ChannelFields, MetadataSnapshot,
    PlaylistFields, VideoFields,
};

use super::tabs::TabId;

/// Messages a worker posts for the UI-owning side to drain. Every
/// update names the tab whose click produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum UiUpdate {
    /// Normalized bar position in [0, 1]
    Progress { tab: TabId, fraction: f32 },
    /// One playlist item finished
    ItemResult {
        tab: TabId,
        index: usize,
        outcome: DownloadOutcome,
    },
    /// The whole operation finished
    Result { tab: TabId, outcome: DownloadOutcome },
    /// A "get info" action produced its snapshot
    Metadata {
        tab: TabId,
        snapshot: MetadataSnapshot,
    },
}

/// A download was clicked while another one is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationInFlight;

impl fmt::Display for OperationInFlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A download is already in progress")
    }
}

impl std::error::Error for OperationInFlight {}

// Worker-side handle that normalizes provider progress and posts it
// onto the update channel, keeping the bar monotonic per operation.
struct ChannelProgress {
    tab: TabId,
    tx: UnboundedSender<UiUpdate>,
    tracker: Mutex<ProgressTracker>,
}

impl ChannelProgress {
    fn new(tab: TabId, tx: UnboundedSender<UiUpdate>) -> Self {
        Self {
            tab,
            tx,
            tracker: Mutex::new(ProgressTracker::new()),
        }
    }

    fn send(&self, fraction: f32) {
        let _ = self.tx.send(UiUpdate::Progress {
            tab: self.tab,
            fraction,
        });
    }
}

impl ProgressSink for ChannelProgress {
    fn reset(&self) {
        if let Ok(mut tracker) = self.tracker.lock() {
            tracker.reset();
        }
        self.send(0.0);
    }

    fn on_chunk(&self, total_bytes: u64, bytes_remaining: u64) {
        let fraction = transfer_fraction(total_bytes, bytes_remaining);
        let emit = self
            .tracker
            .lock()
            .ok()
            .and_then(|mut tracker| tracker.observe(fraction));
        if let Some(fraction) = emit {
            self.send(fraction);
        }
    }

    fn on_fraction(&self, fraction: f32) {
        // Playlist-level updates bypass the per-item tracker.
        self.send(fraction.clamp(0.0, 1.0));
    }
}

/// Spawns exactly one worker per accepted download click; a second
/// download is rejected while one is outstanding. Info fetches are
/// pure reads and spawn unguarded. Once started, a worker runs until
/// the provider returns; there is no cancellation.
pub struct TaskRunner {
    provider: Arc<dyn MediaProvider>,
    tx: UnboundedSender<UiUpdate>,
    downloading: Arc<AtomicBool>,
}

impl TaskRunner {
    /// The receiver is the single consumer the UI-owning side drains.
    pub fn new(provider: Arc<dyn MediaProvider>) -> (Self, UnboundedReceiver<UiUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                provider,
                tx,
                downloading: Arc::new(AtomicBool::new(false)),
            },
            rx,
        )
    }

    pub fn is_downloading(&self) -> bool {
        self.downloading.load(Ordering::SeqCst)
    }

    // Atomically claim the single download slot.
    fn claim(&self) -> Result<(), OperationInFlight> {
        self.downloading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
            .map_err(|_| OperationInFlight)
    }

    pub fn start_video(
        &self,
        tab: TabId,
        request: DownloadRequest,
    ) -> Result<(), OperationInFlight> {
        self.claim()?;
        info!("[Runner] video download accepted: {}", request.url);
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let downloading = Arc::clone(&self.downloading);
        tokio::spawn(async move {
            let progress = ChannelProgress::new(tab, tx.clone());
            let outcome = download_video(provider.as_ref(), &request, &progress).await;
            // Release the slot before publishing the result so a
            // drained Result always means the next click is accepted.
            downloading.store(false, Ordering::SeqCst);
            let _ = tx.send(UiUpdate::Result { tab, outcome });
        });
        Ok(())
    }

    pub fn start_playlist(
        &self,
        tab: TabId,
        request: DownloadRequest,
    ) -> Result<(), OperationInFlight> {
        self.claim()?;
        info!("[Runner] playlist download accepted: {}", request.url);
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let downloading = Arc::clone(&self.downloading);
        tokio::spawn(async move {
            let progress = ChannelProgress::new(tab, tx.clone());
            let item_tx = tx.clone();
            let result = download_playlist(
                provider.as_ref(),
                &request,
                &progress,
                move |index, outcome| {
                    let _ = item_tx.send(UiUpdate::ItemResult {
                        tab,
                        index,
                        outcome: outcome.clone(),
                    });
                },
            )
            .await;
            let outcome = match result {
                Ok(summary) => summary.outcome(),
                Err(err) => DownloadOutcome::from(err),
            };
            downloading.store(false, Ordering::SeqCst);
            let _ = tx.send(UiUpdate::Result { tab, outcome });
        });
        Ok(())
    }

    pub fn start_video_info(&self, tab: TabId, url: String, fields: VideoFields) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match fetch_video_info(provider.as_ref(), &url, fields).await {
                Ok(snapshot) => {
                    let _ = tx.send(UiUpdate::Metadata { tab, snapshot });
                }
                Err(err) => {
                    let _ = tx.send(UiUpdate::Result {
                        tab,
                        outcome: DownloadOutcome::from(err),
                    });
                }
            }
        });
    }

    pub fn start_playlist_info(&self, tab: TabId, url: String, fields: PlaylistFields) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match fetch_playlist_info(provider.as_ref(), &url, fields).await {
                Ok(snapshot) => {
                    let _ = tx.send(UiUpdate::Metadata { tab, snapshot });
                }
                Err(err) => {
                    let _ = tx.send(UiUpdate::Result {
                        tab,
                        outcome: DownloadOutcome::from(err),
                    });
                }
            }
        });
    }

    pub fn start_channel_info(&self, tab: TabId, url: String, fields: ChannelFields) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match fetch_channel_info(provider.as_ref(), &url, fields).await {
                Ok(snapshot) => {
                    let _ = tx.send(UiUpdate::Metadata { tab, snapshot });
                }
                Err(err) => {
                    let _ = tx.send(UiUpdate::Result {
                        tab,
                        outcome: DownloadOutcome::from(err),
                    });
                }
            }
        });
    }
}
