//! Publish settings and the payload sent to the CMS.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::{
    session::RequestId,
    types::{PostStatus, PublishSettings},
};

/// A create (no `post_id`) or update of a post on one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    #[serde(skip)]
    pub request_id: RequestId,
    pub account_id: String,
    pub post_id: Option<String>,
    pub settings: PublishSettings,
    /// Gutenberg block markup.
    pub content: String,
}

impl PublishRequest {
    pub fn is_update(&self) -> bool {
        self.post_id.is_some()
    }
}

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()
}

fn local_noon(day: NaiveDate) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&day.and_time(noon()))
        .earliest()
        .map(|d| d.with_timezone(&Utc))
}

/// Tomorrow at 12:00 local time.
pub fn default_schedule(now: DateTime<Local>) -> Option<DateTime<Utc>> {
    local_noon(now.date_naive() + Duration::days(1))
}

impl PublishSettings {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Switching to `Future` without a date schedules tomorrow at noon;
    /// switching away from `Future` clears the date.
    pub fn set_status(&mut self, status: PostStatus, now: DateTime<Local>) {
        if status == PostStatus::Future && self.scheduled_date.is_none() {
            self.scheduled_date = default_schedule(now);
        }
        if status != PostStatus::Future && self.status == PostStatus::Future {
            self.scheduled_date = None;
        }
        self.status = status;
    }

    /// Schedule on `day` at noon local time.
    pub fn set_scheduled_day(&mut self, day: NaiveDate) {
        self.scheduled_date = local_noon(day);
    }
}

/// Wrap each line of editor content in a Gutenberg paragraph block.
///
/// Content that already carries block markup, such as a post loaded for
/// editing, is returned unchanged.
pub fn to_gutenberg_blocks(content: &str) -> String {
    if content.contains("<!-- wp:") {
        return content.to_string();
    }
    format!(
        "<!-- wp:paragraph -->\n<p>{}</p>\n<!-- /wp:paragraph -->",
        content.replace('\n', "</p>\n<!-- wp:paragraph -->\n<p>")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn future_status_gets_a_default_date() {
        let now = Local::now();
        let mut settings = PublishSettings::new("Title");
        settings.set_status(PostStatus::Future, now);

        let scheduled = settings.scheduled_date.unwrap().with_timezone(&Local);
        assert_eq!(scheduled.date_naive(), now.date_naive() + Duration::days(1));
        assert_eq!(scheduled.hour(), 12);
        assert_eq!(settings.status, PostStatus::Future);
    }

    #[test]
    fn explicit_date_is_kept_when_switching_to_future() {
        let mut settings = PublishSettings::new("Title");
        let day = NaiveDate::from_ymd_opt(2030, 1, 2).unwrap();
        settings.set_scheduled_day(day);
        let pinned = settings.scheduled_date;

        settings.set_status(PostStatus::Future, Local::now());
        assert_eq!(settings.scheduled_date, pinned);
    }

    #[test]
    fn leaving_future_clears_date() {
        let mut settings = PublishSettings::new("Title");
        settings.set_status(PostStatus::Future, Local::now());
        settings.set_status(PostStatus::Private, Local::now());
        assert_eq!(settings.scheduled_date, None);
    }

    #[test]
    fn non_future_status_change_keeps_unrelated_date() {
        let mut settings = PublishSettings::new("Title");
        settings.set_scheduled_day(NaiveDate::from_ymd_opt(2030, 1, 2).unwrap());
        settings.set_status(PostStatus::Publish, Local::now());
        assert!(settings.scheduled_date.is_some());
    }

    #[test]
    fn scheduled_day_is_noon() {
        let mut settings = PublishSettings::default();
        let day = NaiveDate::from_ymd_opt(2030, 6, 15).unwrap();
        settings.set_scheduled_day(day);
        let local = settings.scheduled_date.unwrap().with_timezone(&Local);
        assert_eq!(local.date_naive(), day);
        assert_eq!((local.hour(), local.minute()), (12, 0));
    }

    #[test]
    fn gutenberg_blocks_per_line() {
        assert_eq!(
            to_gutenberg_blocks("one"),
            "<!-- wp:paragraph -->\n<p>one</p>\n<!-- /wp:paragraph -->"
        );
        assert_eq!(
            to_gutenberg_blocks("one\ntwo"),
            "<!-- wp:paragraph -->\n<p>one</p>\n<!-- wp:paragraph -->\n<p>two</p>\n<!-- /wp:paragraph -->"
        );
    }

    #[test]
    fn block_markup_is_not_wrapped_again() {
        let blocks = to_gutenberg_blocks("hello\nworld");
        assert_eq!(to_gutenberg_blocks(&blocks), blocks);

        let heading = "<!-- wp:heading -->\n<h2>Title</h2>\n<!-- /wp:heading -->";
        assert_eq!(to_gutenberg_blocks(heading), heading);
    }
}
