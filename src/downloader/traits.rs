// Provider seam: everything the app needs from the external fetcher

use std::path::Path;

use async_trait::async_trait;

use super::errors::DownloadError;
use super::models::{ChannelMetadata, PlaylistMetadata, Variant, VideoMetadata, VideoSource};

/// Receives transfer progress while a provider moves bytes.
///
/// `on_chunk` carries the provider's raw byte counts; `on_fraction`
/// carries an already-normalized value (playlist-level updates).
pub trait ProgressSink: Send + Sync {
    /// A new operation started; observable progress returns to 0.0.
    fn reset(&self);

    /// Raw provider notification: total size and bytes still to go.
    fn on_chunk(&self, total_bytes: u64, bytes_remaining: u64);

    /// Pre-normalized fraction in [0, 1].
    fn on_fraction(&self, fraction: f32);
}

/// The external collaborator that resolves URLs and performs transfers.
///
/// Implementations own all network I/O. Metadata calls are pure reads
/// and safe to issue repeatedly or concurrently.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Name for log lines.
    fn name(&self) -> &'static str;

    /// Resolve a video URL to its title and downloadable variants.
    async fn resolve_video(&self, url: &str) -> Result<VideoSource, DownloadError>;

    /// Transfer one variant into `dest_dir`, reporting progress along
    /// the way. The provider chooses the file name.
    async fn fetch(
        &self,
        url: &str,
        variant: &Variant,
        dest_dir: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<(), DownloadError>;

    /// Ordered item URLs of a playlist, exactly as the provider lists
    /// them.
    async fn playlist_items(&self, url: &str) -> Result<Vec<String>, DownloadError>;

    async fn video_metadata(&self, url: &str) -> Result<VideoMetadata, DownloadError>;

    async fn playlist_metadata(&self, url: &str) -> Result<PlaylistMetadata, DownloadError>;

    async fn channel_metadata(&self, url: &str) -> Result<ChannelMetadata, DownloadError>;
}
