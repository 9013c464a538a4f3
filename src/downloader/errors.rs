// Error types shared by downloads and metadata fetches

use std::fmt;

use crate::downloader::models::Resolution;

/// Everything a download or info fetch can fail with.
///
/// Each variant renders as the exact message the interface shows; only
/// `Provider` carries raw provider text, verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadError {
    /// URL failed structural validation or the provider rejected it
    InvalidUrl,

    /// Content is age-gated and cannot be fetched anonymously
    AgeRestricted,

    /// Content was removed, made private, or never existed
    Unavailable,

    /// The provider's parser no longer matches the remote page shape
    StructureChanged,

    /// No variant matched the requested resolution/format pair
    NoMatchingVariant(Resolution),

    /// Any other provider-raised condition
    Provider(String),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl => write!(f, "Invalid URL provided"),
            Self::AgeRestricted => {
                write!(f, "This video is age restricted and cannot be downloaded")
            }
            Self::Unavailable => write!(f, "This video is unavailable"),
            Self::StructureChanged => write!(f, "YouTube structure may have changed"),
            Self::NoMatchingVariant(res) => {
                write!(f, "No stream available with resolution: {}", res)
            }
            Self::Provider(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DownloadError {}

impl DownloadError {
    /// Map raw provider output onto the taxonomy.
    ///
    /// yt-dlp reports everything as prose on stderr; the patterns below
    /// cover the phrasings it uses for each condition. Anything
    /// unrecognized is carried through verbatim.
    pub fn classify(raw: &str) -> Self {
        let text = raw.to_lowercase();

        if text.contains("is not a valid url")
            || text.contains("unsupported url")
            || text.contains("truncated id")
        {
            return Self::InvalidUrl;
        }

        if text.contains("sign in to confirm your age") || text.contains("age-restricted") {
            return Self::AgeRestricted;
        }

        if text.contains("video unavailable")
            || text.contains("private video")
            || text.contains("has been removed")
            || text.contains("no longer available")
            || text.contains("account associated with this video has been terminated")
        {
            return Self::Unavailable;
        }

        if text.contains("unable to extract") || text.contains("unable to parse") {
            return Self::StructureChanged;
        }

        Self::Provider(raw.trim().to_string())
    }
}
