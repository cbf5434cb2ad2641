use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use console::style;
use contentforge_core::{
    Account, AccountForm, AccountsPanel, Config, ContentGenerator, ForgeError, GeneratorKind,
    JsonStore, Media, MediaBackend, MediaFilter, PostsBackend, PostsBackendKind, ProviderGenerator,
    Session, Template, TemplateDraft, TemplateGenerator, TemplatesPanel, TranscriptSource,
    TranscriptSourceKind, ValidationError, build_embed_url, build_watch_url, extract_video_id,
    filter_media, format_accounts, format_media, format_posts, format_templates,
    mock::{MockMediaBackend, MockPostsBackend, MockTranscriptSource},
    select_featured,
    session::{run_fetch, run_publish, run_refactor},
    transcript::YtDlpTranscriptSource,
    wordpress::WordPressClient,
};

use crate::{
    AccountFields, AccountsAction, DraftArgs, EditArgs, MediaAction, PostsAction, PublishArgs,
    RefactorArgs, TemplatesAction, create_spinner, format_duration,
};

pub struct App {
    config: Config,
    store: JsonStore,
    transcripts: Box<dyn TranscriptSource>,
    generator: Box<dyn ContentGenerator>,
    posts: Box<dyn PostsBackend>,
    media: Box<dyn MediaBackend>,
}

fn find_account<'a>(accounts: &'a [Account], id: Option<&str>) -> Result<&'a Account> {
    let id = id.ok_or(ValidationError::MissingAccount)?;
    accounts.iter().find(|a| a.id == id).ok_or_else(|| {
        ForgeError::NotFound {
            kind: "Account",
            id: id.to_string(),
        }
        .into()
    })
}

fn done(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

impl App {
    pub fn new(config: Config, force: bool) -> Result<Self> {
        let transcripts: Box<dyn TranscriptSource> = match config.transcript_source {
            TranscriptSourceKind::Mock => {
                Box::new(MockTranscriptSource::with_latency(config.latency(1500)))
            }
            TranscriptSourceKind::YtDlp => {
                Box::new(YtDlpTranscriptSource::new(config.cache_dir.clone(), force))
            }
        };

        let generator: Box<dyn ContentGenerator> = match config.generator {
            GeneratorKind::Template => {
                Box::new(TemplateGenerator::with_latency(config.latency(2000)))
            }
            GeneratorKind::Provider => {
                // Validate API key early
                config.provider.validate_api_key()?;
                Box::new(ProviderGenerator::new(config.provider))
            }
        };

        let (posts, media): (Box<dyn PostsBackend>, Box<dyn MediaBackend>) =
            match config.posts_backend {
                PostsBackendKind::Mock => (
                    Box::new(MockPostsBackend::new(config.latency(1000))),
                    Box::new(MockMediaBackend::new(config.latency(1000))),
                ),
                PostsBackendKind::WordPress => {
                    let client = WordPressClient::new();
                    (Box::new(client.clone()), Box::new(client))
                }
            };

        tracing::debug!(data_dir = %config.data_dir.display(), "app configured");
        Ok(Self {
            store: JsonStore::new(config.data_dir.clone()),
            config,
            transcripts,
            generator,
            posts,
            media,
        })
    }

    pub fn video(&self, url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(ValidationError::MissingUrl.into());
        }
        let video_id = extract_video_id(url.trim()).ok_or(ValidationError::InvalidUrl)?;

        println!("{} {}", style("Video:").dim(), style(&video_id).cyan().bold());
        println!("{} {}", style("Embed:").dim(), build_embed_url(&video_id));
        println!("{} {}", style("Watch:").dim(), build_watch_url(&video_id));
        Ok(())
    }

    async fn fetch_into(&self, session: &mut Session, url: &str) -> Result<()> {
        let step_start = Instant::now();
        let spinner = create_spinner("Fetching transcript...");

        if let Err(e) = run_fetch(session, url, self.transcripts.as_ref()).await {
            spinner.finish_and_clear();
            return Err(e.into());
        }

        let video_id = session.video_id().map(ToString::to_string).unwrap_or_default();
        spinner.finish_with_message(format!(
            "{} Transcript fetched: {} {}",
            style("✓").green().bold(),
            style(video_id).yellow(),
            style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
        ));
        Ok(())
    }

    async fn refactor_into(&self, session: &mut Session, accounts: &[Account]) -> Result<()> {
        let step_start = Instant::now();
        let spinner = create_spinner(&format!("Generating {}...", session.content_type));

        if let Err(e) = run_refactor(session, accounts, self.generator.as_ref()).await {
            spinner.finish_and_clear();
            return Err(e.into());
        }

        spinner.finish_with_message(format!(
            "{} Content generated: {} {}",
            style("✓").green().bold(),
            style(session.content_type).yellow(),
            style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
        ));
        Ok(())
    }

    pub async fn fetch(&self, url: &str) -> Result<()> {
        let mut session = Session::new();
        self.fetch_into(&mut session, url).await?;
        println!("{}", session.transcript());
        Ok(())
    }

    pub async fn refactor(&self, args: RefactorArgs) -> Result<()> {
        let accounts = self.store.load::<Account>().await?;

        let mut session = Session::new();
        session.content_type = args
            .content_type
            .map(Into::into)
            .unwrap_or(self.config.default_content_type);
        session.seo_enabled = args.seo;
        session.selected_account = args.account;

        self.fetch_into(&mut session, &args.url).await?;
        self.refactor_into(&mut session, &accounts).await?;

        match args.output {
            Some(path) => {
                tokio::fs::write(&path, session.content())
                    .await
                    .with_context(|| format!("writing {}", path.display()))?;
                done(&format!("Saved: {}", style(path.display()).cyan()));
            }
            None => println!("{}", session.content()),
        }
        Ok(())
    }

    /// Apply the draft flags on top of what the session already holds.
    async fn apply_draft(&self, session: &mut Session, draft: DraftArgs) -> Result<()> {
        if let Some(id) = &draft.template {
            let panel = TemplatesPanel::new(self.store.load::<Template>().await?);
            let (content, title) = panel.apply(id).ok_or_else(|| ForgeError::NotFound {
                kind: "Template",
                id: id.clone(),
            })?;
            session.apply_template(content, title);
        }

        if let Some(path) = &draft.content_file {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            session.set_content(content);
        }

        if let Some(title) = draft.title {
            session.settings.title = title;
        }
        if let Some(status) = draft.status {
            session.settings.set_status(status, Local::now());
        }
        if let Some(day) = draft.schedule {
            session.settings.set_scheduled_day(day);
        }
        if !draft.categories.is_empty() {
            session.settings.category_ids = draft.categories;
        }
        if !draft.tags.is_empty() {
            session.settings.tag_ids = draft.tags;
        }

        if let Some(media_id) = &draft.featured {
            let library = self.store.load::<Media>().await?;
            let media = library
                .iter()
                .find(|m| &m.id == media_id)
                .ok_or_else(|| ForgeError::NotFound {
                    kind: "Media",
                    id: media_id.clone(),
                })?;
            select_featured(&mut session.settings, media);
        }
        Ok(())
    }

    async fn send(&self, session: &mut Session, accounts: &[Account]) -> Result<()> {
        let step_start = Instant::now();
        let spinner = create_spinner("Sending to WordPress...");

        let result = run_publish(session, accounts, self.posts.as_ref()).await;
        let published = match result {
            Ok(published) => published,
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e.into());
            }
        };

        match published {
            Some((outcome, post)) => {
                spinner.finish_with_message(format!(
                    "{} {} {}",
                    style("✓").green().bold(),
                    outcome.message(),
                    style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
                ));
                print!("{}", format_posts(std::slice::from_ref(&post)));
            }
            None => spinner.finish_and_clear(),
        }
        Ok(())
    }

    pub async fn publish(&self, args: PublishArgs) -> Result<()> {
        let accounts = self.store.load::<Account>().await?;

        let mut session = Session::new();
        session.content_type = args
            .content_type
            .map(Into::into)
            .unwrap_or(self.config.default_content_type);
        session.seo_enabled = args.seo;
        session.selected_account = args.account;

        if let Some(url) = &args.url {
            self.fetch_into(&mut session, url).await?;
            self.refactor_into(&mut session, &accounts).await?;
        }

        self.apply_draft(&mut session, args.draft).await?;
        self.send(&mut session, &accounts).await
    }

    pub async fn edit(&self, args: EditArgs) -> Result<()> {
        let accounts = self.store.load::<Account>().await?;
        let account = find_account(&accounts, args.account.as_deref())?;
        let post = self.posts.get_post(account, &args.post_id).await?;

        let mut session = Session::new();
        session.selected_account = Some(account.id.clone());
        session.edit_post(&post);
        done(&format!("Editing: {}", style(&post.title).cyan()));

        self.apply_draft(&mut session, args.draft).await?;
        self.send(&mut session, &accounts).await
    }

    pub async fn accounts(&self, action: AccountsAction) -> Result<()> {
        let mut panel = AccountsPanel::new(self.store.load::<Account>().await?);

        match action {
            AccountsAction::List => {
                print!("{}", format_accounts(panel.accounts()));
                return Ok(());
            }
            AccountsAction::Add(fields) => {
                merge_fields(&mut panel.form, fields);
                panel.submit(Utc::now())?;
                done("Account added");
            }
            AccountsAction::Update { id, fields } => {
                if !panel.edit(&id) {
                    return Err(ForgeError::NotFound { kind: "Account", id }.into());
                }
                merge_fields(&mut panel.form, fields);
                panel.submit(Utc::now())?;
                done("Account updated");
            }
            AccountsAction::Remove { id } => {
                if panel.delete(&id).is_none() {
                    return Err(ForgeError::NotFound { kind: "Account", id }.into());
                }
                done("Account deleted");
            }
        }

        self.store.save(panel.accounts()).await?;
        Ok(())
    }

    pub async fn posts(&self, action: PostsAction) -> Result<()> {
        let accounts = self.store.load::<Account>().await?;

        match action {
            PostsAction::List { account, status } => {
                let account = find_account(&accounts, account.as_deref())?;
                let spinner = create_spinner("Loading posts...");
                let result = self.posts.list_posts(account, status).await;
                spinner.finish_and_clear();
                print!("{}", format_posts(&result?));
            }
            PostsAction::Delete { post_id, account } => {
                let account = find_account(&accounts, account.as_deref())?;
                self.posts.delete_post(account, &post_id).await?;
                done("Post deleted successfully");
            }
        }
        Ok(())
    }

    pub async fn templates(&self, action: TemplatesAction) -> Result<()> {
        let mut panel = TemplatesPanel::new(self.store.load::<Template>().await?);

        match action {
            TemplatesAction::List => {
                let accounts = self.store.load::<Account>().await?;
                print!("{}", format_templates(panel.templates(), &accounts));
                return Ok(());
            }
            TemplatesAction::Apply { id } => {
                let (content, title) = panel.apply(&id).ok_or(ForgeError::NotFound {
                    kind: "Template",
                    id,
                })?;
                println!("{}\n", style(title).cyan().bold());
                println!("{}", content);
                return Ok(());
            }
            TemplatesAction::Save {
                title,
                description,
                account,
                content_file,
            } => {
                let content = match &content_file {
                    Some(path) => tokio::fs::read_to_string(path)
                        .await
                        .with_context(|| format!("reading {}", path.display()))?,
                    None => String::new(),
                };
                let draft = TemplateDraft { title, description };
                let template =
                    panel.save_as_template(draft, &content, account.as_deref(), Utc::now())?;
                done(&format!("Template saved: {}", style(&template.id).cyan()));
            }
            TemplatesAction::Delete { id } => {
                if !panel.delete(&id) {
                    return Err(ForgeError::NotFound { kind: "Template", id }.into());
                }
                done("Template deleted");
            }
        }

        self.store.save(panel.templates()).await?;
        Ok(())
    }

    pub async fn media(&self, action: MediaAction) -> Result<()> {
        match action {
            MediaAction::List {
                account,
                search,
                remote,
            } => {
                let library = if remote {
                    let accounts = self.store.load::<Account>().await?;
                    let account = find_account(&accounts, account.as_deref())?;
                    self.media.list_media(account).await?
                } else {
                    self.store.load::<Media>().await?
                };

                let filter = MediaFilter {
                    account_id: account,
                    search,
                };
                print!("{}", format_media(&filter_media(&library, &filter)));
            }
            MediaAction::Feature {
                media_id,
                post,
                account,
            } => {
                let draft = DraftArgs {
                    title: None,
                    status: None,
                    schedule: None,
                    categories: Vec::new(),
                    tags: Vec::new(),
                    featured: Some(media_id),
                    template: None,
                    content_file: None,
                };
                self.edit(EditArgs {
                    post_id: post,
                    account,
                    draft,
                })
                .await?;
            }
        }
        Ok(())
    }
}

/// Overwrite the form with whichever fields were given.
fn merge_fields(form: &mut AccountForm, fields: AccountFields) {
    if let Some(site_url) = fields.site_url {
        form.site_url = site_url;
    }
    if let Some(username) = fields.username {
        form.username = username;
    }
    if let Some(password) = fields.password {
        form.password = password;
    }
    if let Some(seo_keywords) = fields.seo_keywords {
        form.seo_keywords = seo_keywords;
    }
}
