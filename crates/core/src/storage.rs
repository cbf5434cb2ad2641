//! JSON collections on disk, one file per storage key.
//!
//! Every write replaces the whole collection. Reads never fail on bad data:
//! an absent, empty or unparsable file falls back to the record's default
//! collection and the problem is logged.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use tokio::fs;

use crate::{
    Result,
    media::seed_media,
    paths::get_collection_path,
    types::{Account, Media, Template},
};

pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    const STORAGE_KEY: &'static str;

    fn id(&self) -> &str;

    /// Collection used when nothing usable is stored. Seeds are written back
    /// when the file is absent.
    fn seed() -> Option<Vec<Self>> {
        None
    }
}

impl Record for Account {
    const STORAGE_KEY: &'static str = "wordpress_accounts";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Template {
    const STORAGE_KEY: &'static str = "wordpress_templates";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Media {
    const STORAGE_KEY: &'static str = "wordpress_media";

    fn id(&self) -> &str {
        &self.id
    }

    fn seed() -> Option<Vec<Self>> {
        Some(seed_media())
    }
}

/// Time based id: milliseconds since the epoch, bumped until it is unused.
pub fn generate_id<T: Record>(existing: &[T], now: DateTime<Utc>) -> String {
    let mut candidate = now.timestamp_millis();
    while existing.iter().any(|r| r.id() == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for<T: Record>(&self) -> PathBuf {
        get_collection_path(&self.root, T::STORAGE_KEY)
    }

    pub async fn load<T: Record>(&self) -> Result<Vec<T>> {
        let path = self.path_for::<T>();

        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let trimmed = raw.trim();
        if matches!(trimmed, "" | "null" | "undefined") {
            return match T::seed() {
                Some(seed) => {
                    tracing::debug!(key = T::STORAGE_KEY, "seeding empty collection");
                    self.save(&seed).await?;
                    Ok(seed)
                }
                None => Ok(Vec::new()),
            };
        }

        match serde_json::from_str::<Vec<T>>(trimmed) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(
                    key = T::STORAGE_KEY,
                    path = %path.display(),
                    error = %e,
                    "failed to parse stored collection, using defaults"
                );
                Ok(T::seed().unwrap_or_default())
            }
        }
    }

    pub async fn save<T: Record>(&self, items: &[T]) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        let pretty_json = serde_json::to_string_pretty(items)?;
        fs::write(self.path_for::<T>(), pretty_json).await?;
        tracing::debug!(key = T::STORAGE_KEY, count = items.len(), "collection saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{AccountForm, AccountsPanel};
    use tempfile::TempDir;

    fn account(id: &str) -> Account {
        Account {
            id: id.to_string(),
            site_url: format!("https://site-{id}.example"),
            username: "admin".to_string(),
            password: "secret".to_string(),
            seo_keywords: Some("rust".to_string()),
        }
    }

    #[tokio::test]
    async fn absent_accounts_load_empty_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path());

        let accounts: Vec<Account> = store.load().await.unwrap();
        assert!(accounts.is_empty());
        assert!(!store.path_for::<Account>().exists());
    }

    #[tokio::test]
    async fn accounts_round_trip_by_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path().join("nested"));
        let now = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();

        let mut panel = AccountsPanel::default();
        for site in ["https://a.example", "https://b.example"] {
            panel.form = AccountForm {
                site_url: site.to_string(),
                username: "admin".to_string(),
                password: "secret".to_string(),
                seo_keywords: String::new(),
            };
            panel.submit(now).unwrap();
        }
        let accounts = panel.into_accounts();
        assert_ne!(accounts[0].id, accounts[1].id);

        store.save(&accounts).await.unwrap();
        let loaded: Vec<Account> = store.load().await.unwrap();
        assert_eq!(loaded, accounts);
        assert_eq!(loaded[0].id, "1700000000000");
        assert_eq!(loaded[1].id, "1700000000001");
    }

    #[tokio::test]
    async fn malformed_and_placeholder_values_fall_back() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path());

        for raw in ["{not json", "undefined", "null", "  "] {
            std::fs::write(store.path_for::<Template>(), raw).unwrap();
            let templates: Vec<Template> = store.load().await.unwrap();
            assert!(templates.is_empty(), "raw: {raw}");
        }
    }

    #[tokio::test]
    async fn absent_media_is_seeded_and_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path());

        let media: Vec<Media> = store.load().await.unwrap();
        assert_eq!(media, seed_media());
        assert!(store.path_for::<Media>().exists());
    }

    #[tokio::test]
    async fn malformed_media_uses_seed_without_overwriting() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path());
        std::fs::write(store.path_for::<Media>(), "[{oops").unwrap();

        let media: Vec<Media> = store.load().await.unwrap();
        assert_eq!(media.len(), 4);
        let raw = std::fs::read_to_string(store.path_for::<Media>()).unwrap();
        assert_eq!(raw, "[{oops");
    }

    #[test]
    fn generated_ids_are_unique() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let existing = vec![account("1700000000000"), account("1700000000001")];
        assert_eq!(generate_id(&existing, now), "1700000000002");
        assert_eq!(generate_id::<Account>(&[], now), "1700000000000");
    }
}
