use crate::{
    posts::{format_post_date, status_label},
    templates::account_name,
    types::{Account, Media, Post, Template},
};

/// First `max` characters of `text` on one line, with an ellipsis when cut.
pub fn preview(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max).collect();
    format!("{}…", cut.trim_end())
}

pub fn format_posts(posts: &[Post]) -> String {
    if posts.is_empty() {
        return "No posts found\n".to_string();
    }

    let mut output = String::new();
    for post in posts {
        output.push_str(&format!(
            "[{}] {}\n    {} | {}\n",
            post.id,
            post.title,
            status_label(post.status),
            format_post_date(post.date)
        ));
        if let Some(excerpt) = &post.excerpt {
            output.push_str(&format!("    {}\n", preview(excerpt, 80)));
        }
        if let Some(link) = &post.link {
            output.push_str(&format!("    {}\n", link));
        }
    }
    output
}

pub fn format_accounts(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No WordPress accounts yet\n".to_string();
    }

    let mut output = String::new();
    for account in accounts {
        output.push_str(&format!(
            "[{}] {} ({})\n",
            account.id, account.site_url, account.username
        ));
        if let Some(keywords) = account.seo_keywords.as_deref().filter(|k| !k.is_empty()) {
            output.push_str(&format!("    SEO keywords: {}\n", keywords));
        }
    }
    output
}

pub fn format_templates(templates: &[Template], accounts: &[Account]) -> String {
    if templates.is_empty() {
        return "No templates saved\n".to_string();
    }

    let mut output = String::new();
    for template in templates {
        output.push_str(&format!(
            "[{}] {} | {}\n",
            template.id,
            template.title,
            account_name(accounts, &template.account_id)
        ));
        if let Some(description) = &template.description {
            output.push_str(&format!("    {}\n", description));
        }
        output.push_str(&format!("    {}\n", preview(&template.content, 100)));
    }
    output
}

pub fn format_media(items: &[&Media]) -> String {
    if items.is_empty() {
        return "No media found\n".to_string();
    }

    let mut output = String::new();
    for item in items {
        output.push_str(&format!(
            "[{}] {} ({}) {}\n    {}\n",
            item.id,
            item.title,
            item.mime_type,
            item.date.format("%Y-%m-%d"),
            item.url
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{media::seed_media, posts::seed_posts};
    use chrono::Utc;

    #[test]
    fn preview_flattens_and_truncates() {
        assert_eq!(preview("a\n\nb   c", 10), "a b c");
        assert_eq!(preview("hello world", 5), "hello…");
    }

    #[test]
    fn posts_show_scheduled_label() {
        let posts = seed_posts(Utc::now());
        let text = format_posts(&posts);
        assert!(text.contains("Scheduled"));
        assert_eq!(
            text.matches('[').count(),
            posts.len(),
            "one header line per post"
        );
        assert_eq!(format_posts(&[]), "No posts found\n");
    }

    #[test]
    fn accounts_never_print_passwords() {
        let account = Account {
            id: "1".to_string(),
            site_url: "https://blog.example".to_string(),
            username: "admin".to_string(),
            password: "hunter2".to_string(),
            seo_keywords: Some("rust".to_string()),
        };
        let text = format_accounts(&[account]);
        assert!(!text.contains("hunter2"));
        assert!(text.contains("SEO keywords: rust"));
    }

    #[test]
    fn templates_resolve_unknown_accounts() {
        let template = Template {
            id: "9".to_string(),
            title: "Weekly".to_string(),
            content: "body".to_string(),
            account_id: "gone".to_string(),
            created_at: Utc::now(),
            description: None,
        };
        assert!(format_templates(&[template], &[]).contains("Unknown Account"));
    }

    #[test]
    fn media_lists_urls() {
        let media = seed_media();
        let refs: Vec<&Media> = media.iter().collect();
        let text = format_media(&refs);
        for item in &media {
            assert!(text.contains(&item.url));
        }
    }
}
