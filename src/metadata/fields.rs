// Field toggles and the snapshot rendered on the info tabs

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::Date;

/// One presentable row: a label and its value as an isolated string,
/// ready for display or for the shell to place on the clipboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataField {
    pub label: &'static str,
    pub value: String,
}

/// Immutable, ordered field set produced by one "get info" action.
///
/// Built whole on success and discarded when the user navigates away;
/// a failed fetch never yields a partial snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct MetadataSnapshot {
    fields: Vec<MetadataField>,
}

impl MetadataSnapshot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, label: &'static str, value: impl Into<String>) {
        self.fields.push(MetadataField {
            label,
            value: value.into(),
        });
    }

    pub fn fields(&self) -> &[MetadataField] {
        &self.fields
    }

    /// Value for a label, e.g. for a per-row copy button.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Optional video rows. Title, views, likes, length, rating and
/// publish date always render regardless of the toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFields {
    pub description: bool,
    pub channel_url: bool,
    pub thumbnail_url: bool,
    pub author: bool,
    pub channel_id: bool,
    pub keywords: bool,
}

impl VideoFields {
    pub fn all() -> Self {
        Self {
            description: true,
            channel_url: true,
            thumbnail_url: true,
            author: true,
            channel_id: true,
            keywords: true,
        }
    }
}

/// Optional playlist rows. Title always renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistFields {
    pub views: bool,
    pub total_videos: bool,
    pub description: bool,
    pub last_updated: bool,
    pub thumbnail_url: bool,
    pub owner: bool,
    pub owner_id: bool,
    pub owner_url: bool,
    pub playlist_id: bool,
}

impl PlaylistFields {
    pub fn all() -> Self {
        Self {
            views: true,
            total_videos: true,
            description: true,
            last_updated: true,
            thumbnail_url: true,
            owner: true,
            owner_id: true,
            owner_url: true,
            playlist_id: true,
        }
    }
}

/// Optional channel rows. Channel name always renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFields {
    pub views: bool,
    pub total_videos: bool,
    pub description: bool,
    pub last_updated: bool,
    pub thumbnail_url: bool,
    pub channel_id: bool,
}

impl ChannelFields {
    pub fn all() -> Self {
        Self {
            views: true,
            total_videos: true,
            description: true,
            last_updated: true,
            thumbnail_url: true,
            channel_id: true,
        }
    }
}

pub(crate) fn format_date(date: Date) -> String {
    let fmt = format_description!("[year]-[month]-[day]");
    date.format(&fmt).unwrap_or_default()
}
