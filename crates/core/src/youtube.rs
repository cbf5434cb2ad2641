//! Resolving YouTube links to video ids and back.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Matches `watch?v=`, `youtu.be/`, `embed/`, `v/`, `e/` and `/<user>/<path>/` links.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .expect("url pattern is valid")
});

static BARE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("bare id pattern is valid"));

/// An 11 character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the video id from a YouTube URL or a bare id.
///
/// Patterns are tried in order and the first capture wins. Nothing beyond the
/// pattern match is validated.
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    if url.is_empty() {
        return None;
    }

    if let Some(caps) = URL_PATTERN.captures(url) {
        return caps.get(1).map(|m| VideoId(m.as_str().to_string()));
    }

    if BARE_ID_PATTERN.is_match(url) {
        return Some(VideoId(url.to_string()));
    }

    None
}

pub fn build_embed_url(video_id: &VideoId) -> String {
    format!("https://www.youtube.com/embed/{}", video_id)
}

pub fn build_watch_url(video_id: &VideoId) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    fn id_of(url: &str) -> Option<String> {
        extract_video_id(url).map(|id| id.as_str().to_string())
    }

    #[test]
    fn extracts_from_every_supported_shape() {
        let urls = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=30",
            "HTTPS://WWW.YOUTUBE.COM/watch?v=dQw4w9WgXcQ",
        ];

        for url in urls {
            assert_eq!(id_of(url).as_deref(), Some(ID), "url: {url}");
        }
    }

    #[test]
    fn extracts_bare_id() {
        assert_eq!(id_of(ID).as_deref(), Some(ID));
        assert_eq!(id_of("abc-_123XYZ").as_deref(), Some("abc-_123XYZ"));
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert_eq!(id_of(""), None);
        assert_eq!(id_of("not a url"), None);
        assert_eq!(id_of("https://vimeo.com/123456789"), None);
        assert_eq!(id_of("dQw4w9WgXc"), None);
        assert_eq!(id_of("dQw4w9WgXcQQ"), None);
    }

    #[test]
    fn pattern_matching_garbage_is_not_rejected() {
        // Any 11 chars after `youtu.be/` are accepted.
        assert_eq!(id_of("youtu.be/!!!!!!!!!!!").as_deref(), Some("!!!!!!!!!!!"));
    }

    #[test]
    fn builds_urls() {
        let id = extract_video_id(ID).unwrap();
        assert_eq!(build_embed_url(&id), "https://www.youtube.com/embed/dQw4w9WgXcQ");
        assert_eq!(build_embed_url(&id), build_embed_url(&id));
        assert_eq!(build_watch_url(&id), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }
}
