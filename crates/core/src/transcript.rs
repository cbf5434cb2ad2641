//! Transcripts from YouTube subtitles, downloaded with yt-dlp.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::{fs, process::Command};

use crate::{
    Result,
    error::ForgeError,
    paths::{find_subtitles_in_cache, get_transcript_path, get_video_cache_dir},
    ports::TranscriptSource,
    youtube::{VideoId, build_watch_url},
};

#[derive(Debug, Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Flatten a json3 subtitle track into plain text with single spaces.
pub fn flatten_json3(raw: &str) -> Result<String> {
    let track: Json3 = serde_json::from_str(raw)?;
    let text: String = track
        .events
        .iter()
        .flat_map(|e| e.segs.iter())
        .map(|s| s.utf8.as_str())
        .collect();

    Ok(text.split_whitespace().collect::<Vec<_>>().join(" "))
}

pub struct YtDlpTranscriptSource {
    cache_root: PathBuf,
    force: bool,
}

impl YtDlpTranscriptSource {
    pub fn new(cache_root: impl Into<PathBuf>, force: bool) -> Self {
        Self {
            cache_root: cache_root.into(),
            force,
        }
    }

    /// Download subtitles (manual first, auto-generated as fallback) using yt-dlp
    async fn download_subtitles(video_id: &VideoId, cache_dir: &Path) -> Result<PathBuf> {
        let output_template = cache_dir.join("video.%(ext)s");
        let output = Command::new("yt-dlp")
            .arg(build_watch_url(video_id))
            .arg("--skip-download")
            .arg("--write-subs")
            .arg("--write-auto-subs")
            .arg("--sub-langs")
            .arg("en.*,en")
            .arg("--sub-format")
            .arg("json3")
            .arg("-o")
            .arg(&output_template)
            .output()
            .await?;

        if !output.status.success() {
            return Err(ForgeError::TranscriptFailed {
                video_id: video_id.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        find_subtitles_in_cache(cache_dir).ok_or_else(|| ForgeError::TranscriptFailed {
            video_id: video_id.to_string(),
            reason: "no subtitles available".to_string(),
        })
    }
}

#[async_trait]
impl TranscriptSource for YtDlpTranscriptSource {
    async fn fetch_transcript(&self, video_id: &VideoId) -> Result<String> {
        let cache_dir = get_video_cache_dir(&self.cache_root, video_id);
        let transcript_path = get_transcript_path(&cache_dir);

        if !self.force && transcript_path.exists() {
            tracing::debug!(%video_id, "transcript cached");
            return Ok(fs::read_to_string(&transcript_path).await?);
        }

        fs::create_dir_all(&cache_dir).await?;
        let subtitles = match find_subtitles_in_cache(&cache_dir) {
            Some(path) if !self.force => path,
            _ => Self::download_subtitles(video_id, &cache_dir).await?,
        };

        let transcript = flatten_json3(&fs::read_to_string(&subtitles).await?)?;
        if transcript.is_empty() {
            return Err(ForgeError::TranscriptFailed {
                video_id: video_id.to_string(),
                reason: "subtitle track is empty".to_string(),
            });
        }

        fs::write(&transcript_path, &transcript).await?;
        tracing::info!(%video_id, chars = transcript.len(), "transcript downloaded");
        Ok(transcript)
    }
}
