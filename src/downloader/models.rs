// Common data models for the download pipeline

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::Date;

/// Target resolutions offered in the quality dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    P1080,
    P720,
    P480,
    P360,
    P240,
    P144,
}

impl Resolution {
    /// Dropdown order, highest first.
    pub const ALL: [Resolution; 6] = [
        Resolution::P1080,
        Resolution::P720,
        Resolution::P480,
        Resolution::P360,
        Resolution::P240,
        Resolution::P144,
    ];

    pub fn height(&self) -> u32 {
        match self {
            Self::P1080 => 1080,
            Self::P720 => 720,
            Self::P480 => 480,
            Self::P360 => 360,
            Self::P240 => 240,
            Self::P144 => 144,
        }
    }

    /// Exact height only; intermediate heights the provider invents
    /// (e.g. 406p) map to no selectable resolution.
    pub fn from_height(height: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.height() == height)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.height())
    }
}

/// Container/format choices offered in the format dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Container {
    Mp4,
    Webm,
    Mp3,
}

impl Container {
    pub const ALL: [Container; 3] = [Container::Mp4, Container::Webm, Container::Mp3];

    pub fn ext(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
            Self::Mp3 => "mp3",
        }
    }

    pub fn from_ext(ext: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.ext() == ext)
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ext())
    }
}

/// One downloadable rendition of a piece of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    /// Provider-side format id, passed back verbatim when fetching
    pub id: String,
    pub resolution: Option<Resolution>,
    pub container: Container,
    /// Audio and video muxed into a single stream
    pub progressive: bool,
    pub size_bytes: Option<u64>,
}

impl Variant {
    /// Exact-match test used by the download operations. Requested
    /// resolution and container must both match and the stream must be
    /// progressive; there is no nearest-resolution fallback.
    pub fn matches(&self, resolution: Resolution, container: Container) -> bool {
        self.progressive && self.resolution == Some(resolution) && self.container == container
    }
}

/// Resolved content: title plus every variant the provider offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSource {
    pub title: String,
    pub variants: Vec<Variant>,
}

impl VideoSource {
    /// First matching variant in provider order, if any.
    pub fn select(&self, resolution: Resolution, container: Container) -> Option<&Variant> {
        self.variants.iter().find(|v| v.matches(resolution, container))
    }
}

/// A user-submitted download. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    pub dest_dir: PathBuf,
    pub resolution: Resolution,
    pub container: Container,
}

impl DownloadRequest {
    pub fn new(
        url: impl Into<String>,
        dest_dir: impl Into<PathBuf>,
        resolution: Resolution,
        container: Container,
    ) -> Self {
        Self {
            url: url.into(),
            dest_dir: dest_dir.into(),
            resolution,
            container,
        }
    }

    /// Same settings, different source URL. Used once per playlist item.
    pub fn for_item(&self, url: &str) -> Self {
        Self {
            url: url.to_string(),
            dest_dir: self.dest_dir.clone(),
            resolution: self.resolution,
            container: self.container,
        }
    }
}

/// Destination preselected before the user picks one: the platform
/// Downloads folder, or the working directory when none exists.
pub fn default_dest_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Terminal `(success, message)` pair for one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadOutcome {
    pub success: bool,
    pub message: String,
}

impl DownloadOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<super::errors::DownloadError> for DownloadOutcome {
    fn from(err: super::errors::DownloadError) -> Self {
        Self::fail(err.to_string())
    }
}

/// Rolled-up result of a playlist run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub downloaded: usize,
    pub total: usize,
    /// Source URLs of failed items, in playlist order
    pub failed: Vec<String>,
}

impl PlaylistSummary {
    pub fn new(total: usize) -> Self {
        Self {
            downloaded: 0,
            total,
            failed: Vec::new(),
        }
    }

    pub fn record(&mut self, url: &str, outcome: &DownloadOutcome) {
        if outcome.success {
            self.downloaded += 1;
        } else {
            self.failed.push(url.to_string());
        }
    }

    /// Overall bar position after an item finishes: completed items
    /// over playlist length. An empty playlist stays at zero.
    pub fn overall_fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.downloaded as f32 / self.total as f32
        }
    }

    /// Terminal classification: failure only when nothing downloaded,
    /// a count summary when the batch partially succeeded.
    pub fn outcome(&self) -> DownloadOutcome {
        if self.downloaded == 0 {
            DownloadOutcome::fail("No videos downloaded")
        } else if self.downloaded == self.total {
            DownloadOutcome::ok("All videos downloaded successfully")
        } else {
            DownloadOutcome::ok(format!(
                "{} of {} downloaded successfully",
                self.downloaded, self.total
            ))
        }
    }
}

/// Video fields fetched in one round trip for the info tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub views: u64,
    pub likes: Option<u64>,
    pub length_seconds: u64,
    pub rating: Option<f64>,
    pub publish_date: Option<Date>,
    pub description: String,
    pub channel_url: String,
    pub thumbnail_url: String,
    pub author: String,
    pub channel_id: String,
    pub keywords: Vec<String>,
}

/// Playlist fields fetched in one round trip for the info tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistMetadata {
    pub title: String,
    pub last_updated: Option<Date>,
    pub thumbnail_url: String,
    pub description: String,
    pub total_videos: usize,
    pub views: u64,
    pub owner: String,
    pub owner_id: String,
    pub owner_url: String,
    pub playlist_id: String,
}

/// Channel fields fetched in one round trip for the info tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMetadata {
    pub name: String,
    pub channel_id: String,
    pub last_updated: Option<Date>,
    pub thumbnail_url: String,
    pub description: String,
    pub total_videos: usize,
    pub views: u64,
}
