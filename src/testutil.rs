// Test-only scripted provider and progress recorder

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::downloader::errors::DownloadError;
use crate::downloader::models::{
    ChannelMetadata, Container, PlaylistMetadata, Resolution, Variant, VideoMetadata, VideoSource,
};
use crate::downloader::progress::transfer_fraction;
use crate::downloader::traits::{MediaProvider, ProgressSink};

/// Route log output through the test harness. Safe to call from every
/// test; only the first call wins.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// What a scripted transfer does for one URL.
#[derive(Debug, Clone)]
pub enum FetchScript {
    /// Emit these `(total, remaining)` chunks, then succeed.
    Chunks(Vec<(u64, u64)>),
    Fail(DownloadError),
}

/// In-memory `MediaProvider` with per-URL scripted answers and a call
/// log, so tests can assert what reached the provider and in which
/// order.
#[derive(Default)]
pub struct ScriptedProvider {
    videos: HashMap<String, Result<VideoSource, DownloadError>>,
    fetches: HashMap<String, FetchScript>,
    playlists: HashMap<String, Result<Vec<String>, DownloadError>>,
    video_meta: HashMap<String, Result<VideoMetadata, DownloadError>>,
    playlist_meta: HashMap<String, Result<PlaylistMetadata, DownloadError>>,
    channel_meta: HashMap<String, Result<ChannelMetadata, DownloadError>>,
    calls: Mutex<Vec<String>>,
    fetch_gate: Option<Arc<Notify>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_video(mut self, url: &str, source: VideoSource) -> Self {
        self.videos.insert(url.to_string(), Ok(source));
        self
    }

    pub fn with_video_error(mut self, url: &str, err: DownloadError) -> Self {
        self.videos.insert(url.to_string(), Err(err));
        self
    }

    pub fn with_fetch(mut self, url: &str, script: FetchScript) -> Self {
        self.fetches.insert(url.to_string(), script);
        self
    }

    pub fn with_playlist(mut self, url: &str, items: &[&str]) -> Self {
        self.playlists.insert(
            url.to_string(),
            Ok(items.iter().map(|s| s.to_string()).collect()),
        );
        self
    }

    pub fn with_playlist_error(mut self, url: &str, err: DownloadError) -> Self {
        self.playlists.insert(url.to_string(), Err(err));
        self
    }

    pub fn with_video_metadata(mut self, url: &str, meta: VideoMetadata) -> Self {
        self.video_meta.insert(url.to_string(), Ok(meta));
        self
    }

    pub fn with_video_metadata_error(mut self, url: &str, err: DownloadError) -> Self {
        self.video_meta.insert(url.to_string(), Err(err));
        self
    }

    pub fn with_playlist_metadata(mut self, url: &str, meta: PlaylistMetadata) -> Self {
        self.playlist_meta.insert(url.to_string(), Ok(meta));
        self
    }

    pub fn with_channel_metadata(mut self, url: &str, meta: ChannelMetadata) -> Self {
        self.channel_meta.insert(url.to_string(), Ok(meta));
        self
    }

    /// Every `fetch` call parks on this gate until the test notifies
    /// it; lets tests hold an operation in flight deterministically.
    pub fn with_fetch_gate(mut self, gate: Arc<Notify>) -> Self {
        self.fetch_gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, entry: String) {
        self.calls.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl MediaProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn resolve_video(&self, url: &str) -> Result<VideoSource, DownloadError> {
        self.log(format!("resolve:{}", url));
        match self.videos.get(url) {
            Some(entry) => entry.clone(),
            None => Err(DownloadError::Provider(format!("no script for {}", url))),
        }
    }

    async fn fetch(
        &self,
        url: &str,
        _variant: &Variant,
        _dest_dir: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<(), DownloadError> {
        self.log(format!("fetch:{}", url));
        if let Some(gate) = &self.fetch_gate {
            gate.notified().await;
        }
        let script = self
            .fetches
            .get(url)
            .cloned()
            .unwrap_or(FetchScript::Chunks(vec![(1000, 500), (1000, 0)]));
        match script {
            FetchScript::Chunks(chunks) => {
                for (total, remaining) in chunks {
                    progress.on_chunk(total, remaining);
                }
                Ok(())
            }
            FetchScript::Fail(err) => Err(err),
        }
    }

    async fn playlist_items(&self, url: &str) -> Result<Vec<String>, DownloadError> {
        self.log(format!("items:{}", url));
        match self.playlists.get(url) {
            Some(entry) => entry.clone(),
            None => Err(DownloadError::Provider(format!("no script for {}", url))),
        }
    }

    async fn video_metadata(&self, url: &str) -> Result<VideoMetadata, DownloadError> {
        self.log(format!("video_meta:{}", url));
        match self.video_meta.get(url) {
            Some(entry) => entry.clone(),
            None => Err(DownloadError::Provider(format!("no script for {}", url))),
        }
    }

    async fn playlist_metadata(&self, url: &str) -> Result<PlaylistMetadata, DownloadError> {
        self.log(format!("playlist_meta:{}", url));
        match self.playlist_meta.get(url) {
            Some(entry) => entry.clone(),
            None => Err(DownloadError::Provider(format!("no script for {}", url))),
        }
    }

    async fn channel_metadata(&self, url: &str) -> Result<ChannelMetadata, DownloadError> {
        self.log(format!("channel_meta:{}", url));
        match self.channel_meta.get(url) {
            Some(entry) => entry.clone(),
            None => Err(DownloadError::Provider(format!("no script for {}", url))),
        }
    }
}

/// Sink that normalizes chunks like the live emitter and records every
/// emission for assertions.
#[derive(Default)]
pub struct RecordingSink {
    resets: Mutex<usize>,
    fractions: Mutex<Vec<f32>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resets(&self) -> usize {
        *self.resets.lock().unwrap()
    }

    pub fn fractions(&self) -> Vec<f32> {
        self.fractions.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn reset(&self) {
        *self.resets.lock().unwrap() += 1;
    }

    fn on_chunk(&self, total_bytes: u64, bytes_remaining: u64) {
        self.on_fraction(transfer_fraction(total_bytes, bytes_remaining));
    }

    fn on_fraction(&self, fraction: f32) {
        self.fractions.lock().unwrap().push(fraction);
    }
}

/// A source with a single progressive variant at the given pair.
pub fn single_variant_source(
    title: &str,
    resolution: Resolution,
    container: Container,
) -> VideoSource {
    VideoSource {
        title: title.to_string(),
        variants: vec![Variant {
            id: "v1".to_string(),
            resolution: Some(resolution),
            container,
            progressive: true,
            size_bytes: Some(2_000_000),
        }],
    }
}

pub fn sample_video_metadata(title: &str) -> VideoMetadata {
    VideoMetadata {
        title: title.to_string(),
        views: 1_234_567,
        likes: Some(4_321),
        length_seconds: 213,
        rating: Some(4.8),
        publish_date: time::Date::from_calendar_date(2023, time::Month::June, 14).ok(),
        description: "A video about things.".to_string(),
        channel_url: "https://www.youtube.com/channel/UCxyz".to_string(),
        thumbnail_url: "https://i.ytimg.com/vi/abc/hq720.jpg".to_string(),
        author: "Some Channel".to_string(),
        channel_id: "UCxyz".to_string(),
        keywords: vec!["rust".to_string(), "video".to_string()],
    }
}

pub fn sample_playlist_metadata(title: &str) -> PlaylistMetadata {
    PlaylistMetadata {
        title: title.to_string(),
        last_updated: time::Date::from_calendar_date(2024, time::Month::January, 2).ok(),
        thumbnail_url: "https://i.ytimg.com/vi/abc/hq720.jpg".to_string(),
        description: "A playlist.".to_string(),
        total_videos: 12,
        views: 98_765,
        owner: "Some Channel".to_string(),
        owner_id: "UCxyz".to_string(),
        owner_url: "https://www.youtube.com/channel/UCxyz".to_string(),
        playlist_id: "PLabc".to_string(),
    }
}

pub fn sample_channel_metadata(name: &str) -> ChannelMetadata {
    ChannelMetadata {
        name: name.to_string(),
        channel_id: "UCxyz".to_string(),
        last_updated: time::Date::from_calendar_date(2024, time::Month::March, 9).ok(),
        thumbnail_url: "https://yt3.ggpht.com/abc".to_string(),
        description: "A channel.".to_string(),
        total_videos: 87,
        views: 5_432_100,
    }
}
