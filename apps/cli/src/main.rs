use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use contentforge_core::{Config, ContentType, PostStatus, Provider, StatusFilter};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use crate::app::App;

mod app;

const DEFAULT_LOG_FILTER: &str = "contentforge=info,contentforge_core=info";

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", secs / 60.0, secs % 60.0)
    }
}

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, ValueEnum)]
enum CliProvider {
    Grok,
    Openai,
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Grok => Provider::Grok,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

/// CLI wrapper for ContentType
#[derive(Clone, ValueEnum)]
enum CliContentType {
    SalesCopy,
    BlogPost,
    CodeMode,
    ActionableGuide,
    FacebookPost,
    RawTranscript,
}

impl From<CliContentType> for ContentType {
    fn from(cli: CliContentType) -> Self {
        match cli {
            CliContentType::SalesCopy => ContentType::SalesCopy,
            CliContentType::BlogPost => ContentType::BlogPost,
            CliContentType::CodeMode => ContentType::CodeMode,
            CliContentType::ActionableGuide => ContentType::ActionableGuide,
            CliContentType::FacebookPost => ContentType::FacebookPost,
            CliContentType::RawTranscript => ContentType::RawTranscript,
        }
    }
}

#[derive(Parser)]
#[command(name = "contentforge")]
#[command(about = "Turn YouTube transcripts into content and publish it to WordPress")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// AI provider, when generation goes through a provider
    #[arg(short, long, global = true)]
    provider: Option<CliProvider>,

    /// Directory holding accounts, templates and media
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Re-download subtitles even if cached
    #[arg(short, long, global = true)]
    force: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show the video id and the embed and watch URLs
    Video { url: String },

    /// Fetch the transcript of a video
    Fetch { url: String },

    /// Fetch a transcript and rewrite it as a content type
    Refactor(RefactorArgs),

    /// Fetch, rewrite and publish to a WordPress account
    Publish(PublishArgs),

    /// Load an existing post, change it and send the update
    Edit(EditArgs),

    /// Manage WordPress accounts
    Accounts {
        #[command(subcommand)]
        action: AccountsAction,
    },

    /// Browse and delete posts of an account
    Posts {
        #[command(subcommand)]
        action: PostsAction,
    },

    /// Manage reusable content templates
    Templates {
        #[command(subcommand)]
        action: TemplatesAction,
    },

    /// Browse the media library
    Media {
        #[command(subcommand)]
        action: MediaAction,
    },
}

#[derive(Args)]
struct RefactorArgs {
    url: String,

    /// Content type to generate (defaults to the configured one)
    #[arg(short = 't', long)]
    content_type: Option<CliContentType>,

    /// Account whose SEO keywords are used with --seo
    #[arg(short, long)]
    account: Option<String>,

    /// Optimize for the account's SEO keywords
    #[arg(long)]
    seo: bool,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct DraftArgs {
    /// Post title
    #[arg(long)]
    title: Option<String>,

    /// draft, publish, private, pending or future
    #[arg(long)]
    status: Option<PostStatus>,

    /// Day a scheduled post goes live (YYYY-MM-DD), at noon local time
    #[arg(long)]
    schedule: Option<NaiveDate>,

    /// Category id, repeatable
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Tag id, repeatable
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Media id to use as the featured image
    #[arg(long)]
    featured: Option<String>,

    /// Replace the content and title with a saved template
    #[arg(long)]
    template: Option<String>,

    /// Replace the content with the contents of a file
    #[arg(long)]
    content_file: Option<PathBuf>,
}

#[derive(Args)]
struct PublishArgs {
    /// Video to fetch; optional when the content comes from --template or --content-file
    #[arg(required_unless_present_any = ["template", "content_file"])]
    url: Option<String>,

    /// Account to publish to
    #[arg(short, long)]
    account: Option<String>,

    #[arg(short = 't', long)]
    content_type: Option<CliContentType>,

    #[arg(long)]
    seo: bool,

    #[command(flatten)]
    draft: DraftArgs,
}

#[derive(Args)]
struct EditArgs {
    post_id: String,

    #[arg(short, long)]
    account: Option<String>,

    #[command(flatten)]
    draft: DraftArgs,
}

#[derive(Subcommand)]
enum AccountsAction {
    List,
    Add(AccountFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: AccountFields,
    },
    Remove {
        id: String,
    },
}

#[derive(Args)]
struct AccountFields {
    #[arg(long)]
    site_url: Option<String>,
    #[arg(long)]
    username: Option<String>,
    /// Application password
    #[arg(long)]
    password: Option<String>,
    /// Comma separated keywords used by --seo
    #[arg(long)]
    seo_keywords: Option<String>,
}

#[derive(Subcommand)]
enum PostsAction {
    List {
        #[arg(short, long)]
        account: Option<String>,
        /// all, draft, publish, private, pending or future
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,
    },
    /// Move a post to the trash
    Delete {
        post_id: String,
        #[arg(short, long)]
        account: Option<String>,
    },
}

#[derive(Subcommand)]
enum TemplatesAction {
    List,
    /// Save content as a template for an account
    Save {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(short, long)]
        account: Option<String>,
        /// File holding the template content
        #[arg(long)]
        content_file: Option<PathBuf>,
    },
    /// Print a template's title and content
    Apply { id: String },
    Delete { id: String },
}

#[derive(Subcommand)]
enum MediaAction {
    List {
        /// Account id, or "all"
        #[arg(short, long)]
        account: Option<String>,
        /// Matches title or alt text
        #[arg(short, long, default_value = "")]
        search: String,
        /// List the account's library on the CMS instead of the local one
        #[arg(long, requires = "account")]
        remote: bool,
    },
    /// Set the featured image of an existing post
    Feature {
        media_id: String,
        #[arg(long)]
        post: String,
        #[arg(short, long)]
        account: Option<String>,
    },
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(provider) = cli.provider {
        config.provider = provider.into();
    }

    let app = App::new(config, cli.force)?;

    match cli.command {
        Command::Video { url } => app.video(&url),
        Command::Fetch { url } => app.fetch(&url).await,
        Command::Refactor(args) => app.refactor(args).await,
        Command::Publish(args) => app.publish(args).await,
        Command::Edit(args) => app.edit(args).await,
        Command::Accounts { action } => app.accounts(action).await,
        Command::Posts { action } => app.posts(action).await,
        Command::Templates { action } => app.templates(action).await,
        Command::Media { action } => app.media(action).await,
    }
}
