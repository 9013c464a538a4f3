// Download pipeline: provider seam, operations, progress plumbing

pub mod backends;
pub mod errors;
pub mod models;
pub mod operation;
pub mod playlist;
pub mod progress;
pub mod traits;
pub mod utils;

pub use errors::DownloadError;
pub use models::{
    Container, DownloadOutcome, DownloadRequest, PlaylistSummary, Resolution, Variant, VideoSource,
};
pub use operation::download_video;
pub use playlist::download_playlist;
pub use traits::{MediaProvider, ProgressSink};
