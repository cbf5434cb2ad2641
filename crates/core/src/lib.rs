//! Core of contentforge: turn a video transcript into content and publish it
//! to WordPress.

pub mod accounts;
pub mod config;
pub mod content;
pub mod error;
pub mod format;
pub mod media;
pub mod mock;
pub mod paths;
pub mod ports;
pub mod posts;
pub mod provider;
pub mod publish;
pub mod session;
pub mod storage;
pub mod templates;
pub mod transcript;
pub mod types;
pub mod wordpress;
pub mod youtube;

pub use accounts::{AccountChange, AccountForm, AccountsPanel};
pub use config::{Config, GeneratorKind, PostsBackendKind, TranscriptSourceKind};
pub use content::{ContentType, TemplateGenerator, refactor};
pub use error::{ForgeError, Result, ValidationError};
pub use format::{format_accounts, format_media, format_posts, format_templates};
pub use media::{MediaFilter, filter_media, select_featured};
pub use ports::{ContentGenerator, MediaBackend, PostsBackend, TranscriptSource};
pub use posts::{StatusFilter, filter_posts, format_post_date, status_label};
pub use provider::{Provider, ProviderConfig, ProviderGenerator};
pub use publish::{PublishRequest, to_gutenberg_blocks};
pub use session::{Completion, Phase, PublishOutcome, RequestId, Session};
pub use storage::JsonStore;
pub use templates::{TemplateDraft, TemplatesPanel};
pub use types::{Account, Media, Post, PostStatus, PublishSettings, Template};
pub use youtube::{VideoId, build_embed_url, build_watch_url, extract_video_id};
