// One provider round trip per "get info" click

use log::info;

use crate::downloader::errors::DownloadError;
use crate::downloader::traits::MediaProvider;

use super::fields::{
    format_date, ChannelFields, MetadataSnapshot, PlaylistFields, VideoFields,
};

fn opt_num<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "unknown".to_string())
}

/// Fetch video details and expose the selected rows.
///
/// The snapshot only exists on success; an error leaves nothing to
/// render.
pub async fn fetch_video_info(
    provider: &dyn MediaProvider,
    url: &str,
    fields: VideoFields,
) -> Result<MetadataSnapshot, DownloadError> {
    let meta = provider.video_metadata(url).await?;
    info!("[Info] video details fetched for {}", url);

    let mut snapshot = MetadataSnapshot::new();
    snapshot.push("Title", meta.title);
    snapshot.push("Views", meta.views.to_string());
    snapshot.push("Likes", opt_num(meta.likes));
    snapshot.push("Length", format!("{} secs", meta.length_seconds));
    snapshot.push("Rating", opt_num(meta.rating));
    snapshot.push("Publish Date", opt_num(meta.publish_date.map(format_date)));

    if fields.description {
        snapshot.push("Description", meta.description);
    }
    if fields.channel_url {
        snapshot.push("Channel URL", meta.channel_url);
    }
    if fields.thumbnail_url {
        snapshot.push("Thumbnail URL", meta.thumbnail_url);
    }
    if fields.author {
        snapshot.push("Author", meta.author);
    }
    if fields.channel_id {
        snapshot.push("Channel Id", meta.channel_id);
    }
    if fields.keywords {
        snapshot.push("Keywords", meta.keywords.join(", "));
    }

    Ok(snapshot)
}

/// Fetch playlist details and expose the selected rows.
pub async fn fetch_playlist_info(
    provider: &dyn MediaProvider,
    url: &str,
    fields: PlaylistFields,
) -> Result<MetadataSnapshot, DownloadError> {
    let meta = provider.playlist_metadata(url).await?;
    info!("[Info] playlist details fetched for {}", url);

    let mut snapshot = MetadataSnapshot::new();
    snapshot.push("Title", meta.title);

    if fields.views {
        snapshot.push("Views", meta.views.to_string());
    }
    if fields.total_videos {
        snapshot.push("Total Videos", meta.total_videos.to_string());
    }
    if fields.description {
        snapshot.push("Description", meta.description);
    }
    if fields.last_updated {
        snapshot.push("Last Updated", opt_num(meta.last_updated.map(format_date)));
    }
    if fields.thumbnail_url {
        snapshot.push("Thumbnail URL", meta.thumbnail_url);
    }
    if fields.owner {
        snapshot.push("Owner", meta.owner);
    }
    if fields.owner_id {
        snapshot.push("Owner Id", meta.owner_id);
    }
    if fields.owner_url {
        snapshot.push("Owner URL", meta.owner_url);
    }
    if fields.playlist_id {
        snapshot.push("Playlist Id", meta.playlist_id);
    }

    Ok(snapshot)
}

/// Fetch channel details and expose the selected rows.
pub async fn fetch_channel_info(
    provider: &dyn MediaProvider,
    url: &str,
    fields: ChannelFields,
) -> Result<MetadataSnapshot, DownloadError> {
    let meta = provider.channel_metadata(url).await?;
    info!("[Info] channel details fetched for {}", url);

    let mut snapshot = MetadataSnapshot::new();
    snapshot.push("Title", meta.name);

    if fields.views {
        snapshot.push("Views", meta.views.to_string());
    }
    if fields.total_videos {
        snapshot.push("Total Videos", meta.total_videos.to_string());
    }
    if fields.description {
        snapshot.push("Description", meta.description);
    }
    if fields.last_updated {
        snapshot.push("Last Updated", opt_num(meta.last_updated.map(format_date)));
    }
    if fields.thumbnail_url {
        snapshot.push("Thumbnail URL", meta.thumbnail_url);
    }
    if fields.channel_id {
        snapshot.push("Channel Id", meta.channel_id);
    }

    Ok(snapshot)
}
