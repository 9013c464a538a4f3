// tubegrab: core engine for a tabbed YouTube download utility.
//
// The GUI shell renders `app::TabView` state and forwards clicks to
// `app::Controller`; everything provider-shaped hides behind
// `downloader::MediaProvider`, with `downloader::backends::YtDlpProvider`
// as the shipping implementation.

pub mod app;
pub mod downloader;
pub mod metadata;

#[cfg(test)]
pub(crate) mod testutil;

pub use app::{Controller, TabId, UiUpdate};
pub use downloader::backends::YtDlpProvider;
pub use downloader::{
    Container, DownloadError, DownloadOutcome, DownloadRequest, MediaProvider, Resolution,
};
pub use metadata::MetadataSnapshot;
