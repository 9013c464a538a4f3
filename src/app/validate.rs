// Structural URL validation ahead of any provider call

use url::Url;

use crate::downloader::errors::DownloadError;

// Canonical and short-link hosts the app accepts.
const ALLOWED_HOSTS: [&str; 6] = [
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtu.be",
    "www.youtu.be",
];

/// Accept only well-formed http(s) URLs on a known YouTube host.
///
/// Runs before anything reaches the provider, so a malformed paste
/// never costs a network round trip.
pub fn validate_watch_url(raw: &str) -> Result<Url, DownloadError> {
    let parsed = Url::parse(raw.trim()).map_err(|_| DownloadError::InvalidUrl)?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(DownloadError::InvalidUrl);
    }

    let host = parsed
        .host_str()
        .ok_or(DownloadError::InvalidUrl)?
        .to_ascii_lowercase();
    if ALLOWED_HOSTS.contains(&host.as_str()) {
        Ok(parsed)
    } else {
        Err(DownloadError::InvalidUrl)
    }
}
