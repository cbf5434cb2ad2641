use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, Local, Utc};

use crate::{
    error::ForgeError,
    types::{Post, PostStatus},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(PostStatus),
}

impl StatusFilter {
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => post.status == *status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => status.fmt(f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

pub fn filter_posts(posts: Vec<Post>, filter: StatusFilter) -> Vec<Post> {
    posts.into_iter().filter(|p| filter.matches(p)).collect()
}

/// Example posts served by the offline backend.
pub fn seed_posts(now: DateTime<Utc>) -> Vec<Post> {
    let post = |id: &str, title: &str, content: &str, status, date| Post {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        status,
        date,
        modified: now,
        excerpt: None,
        featured_image: None,
        link: None,
    };

    vec![
        Post {
            link: Some("https://example.com/hello-world".to_string()),
            ..post(
                "1",
                "Hello World",
                "<p>Welcome to WordPress. This is your first post. Edit or delete it, then start writing!</p>",
                PostStatus::Publish,
                now,
            )
        },
        post(
            "2",
            "Draft Post Example",
            "<p>This is a draft post that hasn't been published yet.</p>",
            PostStatus::Draft,
            now,
        ),
        post(
            "3",
            "Scheduled Post",
            "<p>This post is scheduled to be published in the future.</p>",
            PostStatus::Future,
            now + Duration::days(2),
        ),
        post(
            "4",
            "Private Post",
            "<p>This post is private and only visible to admins and editors.</p>",
            PostStatus::Private,
            now,
        ),
    ]
}

/// Badge text: "Scheduled" for future posts, the capitalized status otherwise.
pub fn status_label(status: PostStatus) -> &'static str {
    match status {
        PostStatus::Draft => "Draft",
        PostStatus::Publish => "Publish",
        PostStatus::Private => "Private",
        PostStatus::Pending => "Pending",
        PostStatus::Future => "Scheduled",
    }
}

/// Format as e.g. "May 15, 2023 10:30 AM" in local time.
pub fn format_post_date(date: DateTime<Utc>) -> String {
    format_date_in(date.with_timezone(&Local))
}

fn format_date_in<Tz: chrono::TimeZone>(date: DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    date.format("%b %-d, %Y %-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn filter_all_and_by_status() {
        let posts = seed_posts(now());
        assert_eq!(filter_posts(posts.clone(), StatusFilter::All).len(), 4);

        let future = filter_posts(posts.clone(), StatusFilter::Only(PostStatus::Future));
        assert_eq!(future.len(), 1);
        assert_eq!(future[0].date, now() + Duration::days(2));

        assert!(filter_posts(posts, StatusFilter::Only(PostStatus::Pending)).is_empty());
    }

    #[test]
    fn parses_filter() {
        assert_eq!("ALL".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "draft".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(PostStatus::Draft)
        );
        assert!("trash".parse::<StatusFilter>().is_err());
        assert_eq!(StatusFilter::Only(PostStatus::Future).to_string(), "future");
    }

    #[test]
    fn labels() {
        assert_eq!(status_label(PostStatus::Future), "Scheduled");
        assert_eq!(status_label(PostStatus::Publish), "Publish");
    }

    #[test]
    fn date_format() {
        let date = Utc.with_ymd_and_hms(2023, 5, 15, 22, 5, 0).unwrap();
        assert_eq!(format_date_in(date), "May 15, 2023 10:05 PM");
    }

    #[test]
    fn seeded_link_only_on_published_post() {
        let posts = seed_posts(now());
        assert_eq!(posts[0].link.as_deref(), Some("https://example.com/hello-world"));
        assert!(posts[1..].iter().all(|p| p.link.is_none()));
    }
}
