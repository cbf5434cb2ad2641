//! Media library listing and featured image selection.

use chrono::{TimeZone, Utc};

use crate::types::{Media, PublishSettings};

/// Images available before any real library has been fetched.
pub fn seed_media() -> Vec<Media> {
    let image = |id: &str, photo: &str, alt: &str, date, account_id: &str| Media {
        id: id.to_string(),
        title: format!("Sample Image {}", id),
        url: format!("https://images.unsplash.com/{}", photo),
        alt: Some(alt.to_string()),
        date,
        mime_type: "image/jpeg".to_string(),
        account_id: account_id.to_string(),
    };

    vec![
        image(
            "1",
            "photo-1488590528505-98d2b5aba04b",
            "A turned on gray laptop computer",
            Utc.with_ymd_and_hms(2023, 5, 15, 10, 30, 0).single().unwrap_or_default(),
            "1",
        ),
        image(
            "2",
            "photo-1487058792275-0ad4aaf24ca7",
            "Colorful software code on a monitor",
            Utc.with_ymd_and_hms(2023, 6, 20, 14, 45, 0).single().unwrap_or_default(),
            "1",
        ),
        image(
            "3",
            "photo-1498050108023-c5249f4df085",
            "MacBook with code on screen",
            Utc.with_ymd_and_hms(2023, 7, 10, 9, 15, 0).single().unwrap_or_default(),
            "2",
        ),
        image(
            "4",
            "photo-1581091226825-a6a2a5aee158",
            "Woman using laptop",
            Utc.with_ymd_and_hms(2023, 8, 5, 16, 20, 0).single().unwrap_or_default(),
            "2",
        ),
    ]
}

#[derive(Debug, Clone, Default)]
pub struct MediaFilter {
    /// `None` or `"all"` matches every account.
    pub account_id: Option<String>,
    pub search: String,
}

impl MediaFilter {
    pub fn matches(&self, item: &Media) -> bool {
        let account_ok = match self.account_id.as_deref() {
            None | Some("") | Some("all") => true,
            Some(id) => item.account_id == id,
        };

        let needle = self.search.to_lowercase();
        let search_ok = item.title.to_lowercase().contains(&needle)
            || item
                .alt
                .as_deref()
                .is_some_and(|alt| alt.to_lowercase().contains(&needle));

        account_ok && search_ok
    }
}

pub fn filter_media<'a>(items: &'a [Media], filter: &MediaFilter) -> Vec<&'a Media> {
    items.iter().filter(|m| filter.matches(m)).collect()
}

/// Make `media` the featured image of the post being drafted.
pub fn select_featured(settings: &mut PublishSettings, media: &Media) {
    tracing::debug!(media_id = %media.id, "featured image selected");
    settings.featured_image_id = Some(media.id.clone());
}
