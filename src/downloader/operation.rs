// Single-video download operation

use log::{info, warn};

use super::errors::DownloadError;
use super::models::{DownloadOutcome, DownloadRequest};
use super::traits::{MediaProvider, ProgressSink};

/// Run one download to completion, folding every failure into the
/// `(success, message)` pair the interface shows.
///
/// Variant policy is exact match on resolution and container with no
/// nearest-resolution fallback; when several variants qualify, the
/// provider's first listing wins.
pub async fn download_video(
    provider: &dyn MediaProvider,
    request: &DownloadRequest,
    progress: &dyn ProgressSink,
) -> DownloadOutcome {
    progress.reset();

    let source = match provider.resolve_video(&request.url).await {
        Ok(source) => source,
        Err(err) => {
            warn!("[Download] {} could not resolve {}: {}", provider.name(), request.url, err);
            return DownloadOutcome::from(err);
        }
    };

    let Some(variant) = source.select(request.resolution, request.container) else {
        return DownloadOutcome::from(DownloadError::NoMatchingVariant(request.resolution));
    };

    info!(
        "[Download] {} ({} {}) -> {}",
        request.url,
        request.resolution,
        request.container,
        request.dest_dir.display()
    );

    match provider
        .fetch(&request.url, variant, &request.dest_dir, progress)
        .await
    {
        Ok(()) => DownloadOutcome::ok(format!("Download complete: {}", source.title)),
        Err(err) => {
            warn!("[Download] transfer failed for {}: {}", request.url, err);
            DownloadOutcome::from(err)
        }
    }
}
