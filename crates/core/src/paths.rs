use std::path::{Path, PathBuf};

use crate::youtube::VideoId;

pub const APP_DIR: &str = "contentforge";

/// Root directory for persisted collections.
pub fn get_root_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(APP_DIR)
}

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(APP_DIR)
}

pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(APP_DIR)
        .join("config.toml")
}

/// Get the cache directory for a given video
pub fn get_video_cache_dir(cache_root: &Path, video_id: &VideoId) -> PathBuf {
    cache_root.join(video_id.as_str())
}

/// Get the path for a cached transcript file
pub fn get_transcript_path(video_cache_dir: &Path) -> PathBuf {
    video_cache_dir.join("transcript.txt")
}

/// Find a yt-dlp subtitle file in the cache directory
pub fn find_subtitles_in_cache(video_cache_dir: &Path) -> Option<PathBuf> {
    let Ok(entries) = std::fs::read_dir(video_cache_dir) else {
        return None;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if let Some(ext) = path.extension() {
            let ext = ext.to_string_lossy().to_lowercase();
            if ext == "json3" {
                return Some(path);
            }
        }
    }
    None
}

/// Get the path of a persisted collection
pub fn get_collection_path(data_dir: &Path, storage_key: &str) -> PathBuf {
    data_dir.join(format!("{}.json", storage_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::extract_video_id;

    #[test]
    fn finds_only_json3_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("video.en.vtt"), "").unwrap();
        assert_eq!(find_subtitles_in_cache(dir.path()), None);

        std::fs::write(dir.path().join("video.en.json3"), "{}").unwrap();
        assert_eq!(
            find_subtitles_in_cache(dir.path()),
            Some(dir.path().join("video.en.json3"))
        );
    }

    #[test]
    fn layout() {
        let id = extract_video_id("dQw4w9WgXcQ").unwrap();
        let root = Path::new("/cache");
        let dir = get_video_cache_dir(root, &id);
        assert_eq!(dir, Path::new("/cache/dQw4w9WgXcQ"));
        assert_eq!(get_transcript_path(&dir), Path::new("/cache/dQw4w9WgXcQ/transcript.txt"));
        assert_eq!(
            get_collection_path(Path::new("/data"), "wordpress_accounts"),
            Path::new("/data/wordpress_accounts.json")
        );
    }
}
