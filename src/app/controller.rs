// Interaction controller: clicks in, observable tab state out

use std::sync::Arc;

use log::debug;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::downloader::traits::MediaProvider;

use super::runner::{TaskRunner, UiUpdate};
use super::tabs::{FormError, StatusLine, TabId, TabView};

/// Ties the tab state machine to the background runner. Click handlers
/// validate and submit; `drain_updates` applies worker messages on the
/// UI-owning side, so no worker ever touches presentation state
/// directly.
pub struct Controller {
    pub tabs: TabView,
    runner: TaskRunner,
    rx: UnboundedReceiver<UiUpdate>,
}

impl Controller {
    pub fn new(provider: Arc<dyn MediaProvider>) -> Self {
        let (runner, rx) = TaskRunner::new(provider);
        Self {
            tabs: TabView::new(),
            runner,
            rx,
        }
    }

    pub fn is_downloading(&self) -> bool {
        self.runner.is_downloading()
    }

    /// Download button on the Video Download tab.
    pub fn click_video_download(&mut self) {
        let form = &mut self.tabs.video_download;
        let request = match form.request() {
            Ok(request) => request,
            Err(err) => {
                form.status = StatusLine::failure(&err.to_string());
                if err == FormError::InvalidUrl {
                    form.clear_url();
                }
                return;
            }
        };
        match self.runner.start_video(TabId::VideoDownload, request) {
            Ok(()) => {
                form.progress = 0.0;
                form.status = StatusLine::working("Downloading....");
            }
            Err(err) => form.status = StatusLine::failure(&err.to_string()),
        }
    }

    /// Download button on the Playlist tab.
    pub fn click_playlist_download(&mut self) {
        let form = &mut self.tabs.playlist_download;
        let request = match form.request() {
            Ok(request) => request,
            Err(err) => {
                form.status = StatusLine::failure(&err.to_string());
                if err == FormError::InvalidUrl {
                    form.clear_url();
                }
                return;
            }
        };
        match self.runner.start_playlist(TabId::PlaylistDownload, request) {
            Ok(()) => {
                form.progress = 0.0;
                form.status = StatusLine::working("Downloading....");
            }
            Err(err) => form.status = StatusLine::failure(&err.to_string()),
        }
    }

    /// Get Info button on the Video Info tab.
    pub fn click_video_info(&mut self) {
        let form = &mut self.tabs.video_info;
        match form.validated_url() {
            Ok(url) => {
                form.snapshot = None;
                self.runner
                    .start_video_info(TabId::VideoInfo, url, form.fields);
            }
            Err(err) => {
                form.status = StatusLine::failure(&err.to_string());
                form.clear_url();
            }
        }
    }

    /// Get Info button on the Playlist Info tab.
    pub fn click_playlist_info(&mut self) {
        let form = &mut self.tabs.playlist_info;
        match form.validated_url() {
            Ok(url) => {
                form.snapshot = None;
                self.runner
                    .start_playlist_info(TabId::PlaylistInfo, url, form.fields);
            }
            Err(err) => {
                form.status = StatusLine::failure(&err.to_string());
                form.clear_url();
            }
        }
    }

    /// Get Info button on the Channel Info tab.
    pub fn click_channel_info(&mut self) {
        let form = &mut self.tabs.channel_info;
        match form.validated_url() {
            Ok(url) => {
                form.snapshot = None;
                self.runner
                    .start_channel_info(TabId::ChannelInfo, url, form.fields);
            }
            Err(err) => {
                form.status = StatusLine::failure(&err.to_string());
                form.clear_url();
            }
        }
    }

    /// Apply every pending worker update. Runs on the UI-owning side
    /// and never blocks.
    pub fn drain_updates(&mut self) {
        while let Ok(update) = self.rx.try_recv() {
            self.apply(update);
        }
    }

    // Updates route by the tab whose click produced them, not by
    // whichever tab happens to be active when they arrive.
    fn apply(&mut self, update: UiUpdate) {
        match update {
            UiUpdate::Progress { tab, fraction } => match tab {
                TabId::VideoDownload => self.tabs.video_download.progress = fraction,
                TabId::PlaylistDownload => self.tabs.playlist_download.progress = fraction,
                _ => {}
            },
            UiUpdate::ItemResult {
                tab,
                index,
                outcome,
            } => {
                debug!("[Controller] item {} on {:?}: {}", index, tab, outcome.message);
                if tab == TabId::PlaylistDownload {
                    self.tabs.playlist_download.status = StatusLine::from_outcome(&outcome);
                }
            }
            UiUpdate::Result { tab, outcome } => {
                let status = StatusLine::from_outcome(&outcome);
                match tab {
                    TabId::VideoDownload => self.tabs.video_download.status = status,
                    TabId::PlaylistDownload => self.tabs.playlist_download.status = status,
                    TabId::VideoInfo => self.tabs.video_info.status = status,
                    TabId::PlaylistInfo => self.tabs.playlist_info.status = status,
                    TabId::ChannelInfo => self.tabs.channel_info.status = status,
                }
            }
            UiUpdate::Metadata { tab, snapshot } => match tab {
                TabId::VideoInfo => {
                    self.tabs.video_info.snapshot = Some(snapshot);
                    self.tabs.video_info.status = StatusLine::success("Video info fetched");
                }
                TabId::PlaylistInfo => {
                    self.tabs.playlist_info.snapshot = Some(snapshot);
                    self.tabs.playlist_info.status = StatusLine::success("Playlist info fetched");
                }
                TabId::ChannelInfo => {
                    self.tabs.channel_info.snapshot = Some(snapshot);
                    self.tabs.channel_info.status = StatusLine::success("Channel info fetched");
                }
                _ => {}
            },
        }
    }

    /// Plain text for a per-row copy button on the active info tab;
    /// the GUI shell places it on the OS clipboard.
    pub fn copy_field(&self, label: &str) -> Option<String> {
        let snapshot = match self.tabs.active() {
            TabId::VideoInfo => self.tabs.video_info.snapshot.as_ref(),
            TabId::PlaylistInfo => self.tabs.playlist_info.snapshot.as_ref(),
            TabId::ChannelInfo => self.tabs.channel_info.snapshot.as_ref(),
            _ => None,
        }?;
        snapshot.value(label).map(|value| value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::errors::DownloadError;
    use crate::downloader::models::{Container, Resolution};
    use crate::testutil::{
        init_test_logging, sample_video_metadata, single_variant_source, ScriptedProvider,
    };
    use crate::app::tabs::StatusKind;
    use std::path::PathBuf;

    const URL: &str = "https://www.youtube.com/watch?v=abc";

    // Let spawned workers run to completion, then drain their updates.
    async fn settle(controller: &mut Controller) {
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
        controller.drain_updates();
    }

    fn controller_with(provider: ScriptedProvider) -> (Controller, Arc<ScriptedProvider>) {
        let provider = Arc::new(provider);
        let as_provider: Arc<dyn MediaProvider> = provider.clone();
        (Controller::new(as_provider), provider)
    }

    #[tokio::test]
    async fn test_malformed_url_never_reaches_the_provider() {
        let (mut controller, provider) = controller_with(ScriptedProvider::new());
        controller.tabs.video_download.url = "htp:/broken".to_string();
        controller.tabs.video_download.dest_dir = Some(PathBuf::from("/tmp/out"));

        controller.click_video_download();
        settle(&mut controller).await;

        let form = &controller.tabs.video_download;
        assert_eq!(form.status.kind, StatusKind::Failure);
        assert_eq!(form.status.text, "Invalid URL provided");
        // The entry clears for the next paste, and no provider call
        // was ever made.
        assert!(form.url.is_empty());
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_playlist_tab_rejects_malformed_url_too() {
        let (mut controller, provider) = controller_with(ScriptedProvider::new());
        controller.tabs.select(TabId::PlaylistDownload);
        controller.tabs.playlist_download.url = "playlist?list=PLabc".to_string();

        controller.click_playlist_download();
        settle(&mut controller).await;

        assert_eq!(
            controller.tabs.playlist_download.status.text,
            "Invalid URL provided"
        );
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_destination_is_reported_before_submitting() {
        let (mut controller, provider) = controller_with(ScriptedProvider::new());
        controller.tabs.video_download.url = URL.to_string();
        controller.tabs.video_download.dest_dir = None;

        controller.click_video_download();

        assert_eq!(
            controller.tabs.video_download.status.text,
            "Please provide URL, save path, resolution and format"
        );
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_video_download_happy_path_updates_progress_and_status() {
        init_test_logging();
        let (mut controller, _provider) = controller_with(ScriptedProvider::new().with_video(
            URL,
            single_variant_source("Crab Facts", Resolution::P1080, Container::Mp4),
        ));
        controller.tabs.video_download.url = URL.to_string();
        controller.tabs.video_download.dest_dir = Some(PathBuf::from("/tmp/out"));

        controller.click_video_download();
        assert_eq!(
            controller.tabs.video_download.status,
            StatusLine::working("Downloading....")
        );

        settle(&mut controller).await;

        let form = &controller.tabs.video_download;
        assert_eq!(form.status.kind, StatusKind::Success);
        assert_eq!(form.status.text, "Download complete: Crab Facts");
        assert_eq!(form.progress, 1.0);
        assert!(!controller.is_downloading());
    }

    #[tokio::test]
    async fn test_info_fetch_failure_leaves_no_partial_snapshot() {
        let (mut controller, _provider) = controller_with(
            ScriptedProvider::new()
                .with_video_metadata_error(URL, DownloadError::AgeRestricted),
        );
        controller.tabs.select(TabId::VideoInfo);
        controller.tabs.video_info.url = URL.to_string();

        controller.click_video_info();
        settle(&mut controller).await;

        let form = &controller.tabs.video_info;
        assert!(form.snapshot.is_none());
        assert_eq!(form.status.kind, StatusKind::Failure);
        assert_eq!(
            form.status.text,
            "This video is age restricted and cannot be downloaded"
        );
    }

    #[tokio::test]
    async fn test_info_fetch_snapshot_and_copyable_fields() {
        let (mut controller, _provider) = controller_with(
            ScriptedProvider::new().with_video_metadata(URL, sample_video_metadata("Crab Facts")),
        );
        controller.tabs.select(TabId::VideoInfo);
        controller.tabs.video_info.url = URL.to_string();
        controller.tabs.video_info.fields.keywords = true;

        controller.click_video_info();
        settle(&mut controller).await;

        let form = &controller.tabs.video_info;
        assert_eq!(form.status.kind, StatusKind::Success);
        assert_eq!(form.status.text, "Video info fetched");
        let snapshot = form.snapshot.as_ref().expect("snapshot");
        assert_eq!(snapshot.value("Keywords"), Some("rust, video"));

        assert_eq!(controller.copy_field("Title"), Some("Crab Facts".to_string()));
        assert_eq!(controller.copy_field("Description"), None);
    }

    #[tokio::test]
    async fn test_updates_route_to_their_origin_tab() {
        let (mut controller, _provider) = controller_with(ScriptedProvider::new().with_video(
            URL,
            single_variant_source("Crab Facts", Resolution::P1080, Container::Mp4),
        ));
        controller.tabs.video_download.url = URL.to_string();
        controller.tabs.video_download.dest_dir = Some(PathBuf::from("/tmp/out"));

        controller.click_video_download();
        // The user wanders off to another tab while the worker runs;
        // switching away resets the download form.
        controller.tabs.select(TabId::ChannelInfo);
        settle(&mut controller).await;

        // The result still lands on the tab that started it, and the
        // info tab is untouched.
        assert_eq!(
            controller.tabs.video_download.status.kind,
            StatusKind::Success
        );
        assert_eq!(controller.tabs.channel_info.status.kind, StatusKind::Idle);
    }
}
