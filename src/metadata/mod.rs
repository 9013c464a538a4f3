// Info tabs: field selection, snapshots, and the fetch operations

pub mod fetch;
pub mod fields;

pub use fetch::{fetch_channel_info, fetch_playlist_info, fetch_video_info};
pub use fields::{ChannelFields, MetadataField, MetadataSnapshot, PlaylistFields, VideoFields};
