// Tab state machine and per-tab form state

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::downloader::models::{
    default_dest_dir, Container, DownloadOutcome, DownloadRequest, Resolution,
};
use crate::metadata::{ChannelFields, MetadataSnapshot, PlaylistFields, VideoFields};

use super::validate::validate_watch_url;

/// The five screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TabId {
    VideoDownload,
    PlaylistDownload,
    VideoInfo,
    PlaylistInfo,
    ChannelInfo,
}

impl TabId {
    pub const ALL: [TabId; 5] = [
        TabId::VideoDownload,
        TabId::PlaylistDownload,
        TabId::VideoInfo,
        TabId::PlaylistInfo,
        TabId::ChannelInfo,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::VideoDownload => "Video Download",
            Self::PlaylistDownload => "Playlist",
            Self::VideoInfo => "Video Info",
            Self::PlaylistInfo => "Playlist Info",
            Self::ChannelInfo => "Channel Info",
        }
    }
}

/// What went wrong before anything was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    InvalidUrl,
    MissingFields,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl => write!(f, "Invalid URL provided"),
            Self::MissingFields => {
                write!(f, "Please provide URL, save path, resolution and format")
            }
        }
    }
}

/// Status label color classes: idle grey, success green, failure red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum StatusKind {
    #[default]
    Idle,
    Working,
    Success,
    Failure,
}

/// The status label under each tab's action button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusLine {
    pub fn working(text: &str) -> Self {
        Self {
            kind: StatusKind::Working,
            text: text.to_string(),
        }
    }

    /// Success messages longer than the label truncate with a trailing
    /// ellipsis.
    pub fn success(message: &str) -> Self {
        let text = if message.chars().count() > 40 {
            let head: String = message.chars().take(40).collect();
            format!("{}.....", head)
        } else {
            message.to_string()
        };
        Self {
            kind: StatusKind::Success,
            text,
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            kind: StatusKind::Failure,
            text: message.to_string(),
        }
    }

    pub fn from_outcome(outcome: &DownloadOutcome) -> Self {
        if outcome.success {
            Self::success(&outcome.message)
        } else {
            Self::failure(&outcome.message)
        }
    }
}

impl Default for StatusLine {
    /// The idle hint every tab starts with.
    fn default() -> Self {
        Self {
            kind: StatusKind::Idle,
            text: "Please paste link from address bar, not from share icon".to_string(),
        }
    }
}

/// Form state for the two download tabs.
#[derive(Debug, Clone)]
pub struct DownloadForm {
    pub url: String,
    pub resolution: Resolution,
    pub container: Container,
    pub dest_dir: Option<PathBuf>,
    pub status: StatusLine,
    pub progress: f32,
}

impl Default for DownloadForm {
    fn default() -> Self {
        Self {
            url: String::new(),
            // First dropdown entries preselected; destination starts
            // at the platform Downloads folder.
            resolution: Resolution::P1080,
            container: Container::Mp4,
            dest_dir: Some(default_dest_dir()),
            status: StatusLine::default(),
            progress: 0.0,
        }
    }
}

impl DownloadForm {
    /// Clear-URL affordance next to the entry.
    pub fn clear_url(&mut self) {
        self.url.clear();
    }

    /// Validate URL shape and field presence, then freeze the form
    /// into an immutable request.
    pub fn request(&self) -> Result<DownloadRequest, FormError> {
        validate_watch_url(&self.url).map_err(|_| FormError::InvalidUrl)?;
        let dest_dir = self.dest_dir.clone().ok_or(FormError::MissingFields)?;
        Ok(DownloadRequest::new(
            self.url.trim(),
            dest_dir,
            self.resolution,
            self.container,
        ))
    }
}

/// Form state for the Video Info tab.
#[derive(Debug, Clone, Default)]
pub struct VideoInfoForm {
    pub url: String,
    pub fields: VideoFields,
    pub status: StatusLine,
    pub snapshot: Option<MetadataSnapshot>,
}

impl VideoInfoForm {
    pub fn clear_url(&mut self) {
        self.url.clear();
    }

    pub fn validated_url(&self) -> Result<String, FormError> {
        validate_watch_url(&self.url).map_err(|_| FormError::InvalidUrl)?;
        Ok(self.url.trim().to_string())
    }
}

/// Form state for the Playlist Info tab.
#[derive(Debug, Clone, Default)]
pub struct PlaylistInfoForm {
    pub url: String,
    pub fields: PlaylistFields,
    pub status: StatusLine,
    pub snapshot: Option<MetadataSnapshot>,
}

impl PlaylistInfoForm {
    pub fn clear_url(&mut self) {
        self.url.clear();
    }

    pub fn validated_url(&self) -> Result<String, FormError> {
        validate_watch_url(&self.url).map_err(|_| FormError::InvalidUrl)?;
        Ok(self.url.trim().to_string())
    }
}

/// Form state for the Channel Info tab.
#[derive(Debug, Clone, Default)]
pub struct ChannelInfoForm {
    pub url: String,
    pub fields: ChannelFields,
    pub status: StatusLine,
    pub snapshot: Option<MetadataSnapshot>,
}

impl ChannelInfoForm {
    pub fn clear_url(&mut self) {
        self.url.clear();
    }

    pub fn validated_url(&self) -> Result<String, FormError> {
        validate_watch_url(&self.url).map_err(|_| FormError::InvalidUrl)?;
        Ok(self.url.trim().to_string())
    }
}

/// Owns which screen is active and every screen's state; no
/// process-wide current-tab variable, one explicit owner.
#[derive(Debug)]
pub struct TabView {
    active: TabId,
    pub video_download: DownloadForm,
    pub playlist_download: DownloadForm,
    pub video_info: VideoInfoForm,
    pub playlist_info: PlaylistInfoForm,
    pub channel_info: ChannelInfoForm,
}

impl Default for TabView {
    fn default() -> Self {
        Self {
            active: TabId::VideoDownload,
            video_download: DownloadForm::default(),
            playlist_download: DownloadForm::default(),
            video_info: VideoInfoForm::default(),
            playlist_info: PlaylistInfoForm::default(),
            channel_info: ChannelInfoForm::default(),
        }
    }
}

impl TabView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> TabId {
        self.active
    }

    /// Switch screens. The tab being left is torn down and
    /// reinitialized so stale status or progress never greets the next
    /// visit.
    pub fn select(&mut self, tab: TabId) {
        if tab == self.active {
            return;
        }
        self.reset(self.active);
        self.active = tab;
    }

    pub fn reset(&mut self, tab: TabId) {
        match tab {
            TabId::VideoDownload => self.video_download = DownloadForm::default(),
            TabId::PlaylistDownload => self.playlist_download = DownloadForm::default(),
            TabId::VideoInfo => self.video_info = VideoInfoForm::default(),
            TabId::PlaylistInfo => self.playlist_info = PlaylistInfoForm::default(),
            TabId::ChannelInfo => self.channel_info = ChannelInfoForm::default(),
        }
    }
}
