// Sequential playlist download with per-item accounting

use log::info;

use super::errors::DownloadError;
use super::models::{DownloadOutcome, DownloadRequest, PlaylistSummary};
use super::operation::download_video;
use super::traits::{MediaProvider, ProgressSink};

/// Download every item of a playlist, strictly one at a time, in the
/// provider's order.
///
/// A failed item is recorded and the batch moves on; nothing already
/// written is rolled back. `on_item` fires after each item with its
/// index and outcome. The per-item byte bar restarts at zero for every
/// item; after each item the overall fraction (downloaded over total)
/// goes out through the same sink.
pub async fn download_playlist(
    provider: &dyn MediaProvider,
    request: &DownloadRequest,
    progress: &dyn ProgressSink,
    mut on_item: impl FnMut(usize, &DownloadOutcome) + Send,
) -> Result<PlaylistSummary, DownloadError> {
    progress.reset();

    let items = provider.playlist_items(&request.url).await?;
    let mut summary = PlaylistSummary::new(items.len());
    info!("[Playlist] {} items from {}", summary.total, request.url);

    for (index, item_url) in items.iter().enumerate() {
        let item_request = request.for_item(item_url);
        let outcome = download_video(provider, &item_request, progress).await;
        summary.record(item_url, &outcome);
        progress.on_fraction(summary.overall_fraction());
        on_item(index, &outcome);
    }

    Ok(summary)
}
