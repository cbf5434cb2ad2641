//! The post-editing session: fetch a transcript, refactor it, publish it.
//!
//! `Session` is an explicit state object. Every `begin_*` call validates,
//! then moves into a busy phase tagged with a fresh [`RequestId`]. The
//! matching `complete_*` or [`Session::fail`] only applies when its id is
//! still the one in flight, so a newer request always wins over an older one
//! that resolves late.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    Result,
    content::ContentType,
    error::{ForgeError, ValidationError},
    ports::{ContentGenerator, PostsBackend, TranscriptSource},
    publish::{PublishRequest, to_gutenberg_blocks},
    types::{Account, Post, PostStatus, PublishSettings},
    youtube::{VideoId, extract_video_id},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching(RequestId),
    Ready,
    Refactoring(RequestId),
    Editing(String),
    Publishing(RequestId),
}

impl Phase {
    fn in_flight(&self) -> Option<RequestId> {
        match self {
            Phase::Fetching(id) | Phase::Refactoring(id) | Phase::Publishing(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight().is_some()
    }
}

/// Whether a completion was applied or dropped as superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Updated,
    Scheduled,
    Sent,
}

impl PublishOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            PublishOutcome::Updated => "Post updated successfully",
            PublishOutcome::Scheduled => "Post scheduled successfully",
            PublishOutcome::Sent => "Post sent to WordPress successfully",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    phase: Phase,
    video_id: Option<VideoId>,
    transcript: String,
    content: String,
    pub content_type: ContentType,
    pub seo_enabled: bool,
    pub settings: PublishSettings,
    pub selected_account: Option<String>,
    editing_post_id: Option<String>,
    /// Editing id captured when the in-flight publish began.
    publishing_post_id: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            video_id: None,
            transcript: String::new(),
            content: String::new(),
            content_type: ContentType::default(),
            seo_enabled: false,
            settings: PublishSettings::default(),
            selected_account: None,
            editing_post_id: None,
            publishing_post_id: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn video_id(&self) -> Option<&VideoId> {
        self.video_id.as_ref()
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn editing_post_id(&self) -> Option<&str> {
        self.editing_post_id.as_deref()
    }

    /// Editor input. Non-empty content moves `Idle` to `Ready`; other
    /// phases are kept.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        if self.phase == Phase::Idle && !self.content.is_empty() {
            self.phase = Phase::Ready;
        }
    }

    /// Load a template's content and title into the editor.
    pub fn apply_template(&mut self, content: String, title: String) {
        self.settings.title = title;
        self.set_content(content);
    }

    /// Phase to rest in when nothing is in flight.
    fn settled(&self) -> Phase {
        if let Some(id) = &self.editing_post_id {
            Phase::Editing(id.clone())
        } else if self.content.is_empty() {
            Phase::Idle
        } else {
            Phase::Ready
        }
    }

    fn is_current(&self, request: RequestId, what: &str) -> bool {
        let current = self.phase.in_flight() == Some(request);
        if !current {
            tracing::warn!(%request, what, "dropping superseded completion");
        }
        current
    }

    fn start(&mut self, make: fn(RequestId) -> Phase) -> RequestId {
        if let Some(previous) = self.phase.in_flight() {
            tracing::debug!(%previous, "superseding in-flight request");
        }
        let request = RequestId::new();
        self.phase = make(request);
        request
    }

    pub fn begin_fetch(&mut self, url: &str) -> std::result::Result<(RequestId, VideoId), ValidationError> {
        if url.trim().is_empty() {
            return Err(ValidationError::MissingUrl);
        }
        let video_id = extract_video_id(url.trim()).ok_or(ValidationError::InvalidUrl)?;

        self.video_id = Some(video_id.clone());
        let request = self.start(Phase::Fetching);
        tracing::debug!(%request, %video_id, "fetch started");
        Ok((request, video_id))
    }

    pub fn complete_fetch(&mut self, request: RequestId, transcript: String) -> Completion {
        if !self.is_current(request, "fetch") {
            return Completion::Stale;
        }

        self.content = transcript.clone();
        self.transcript = transcript;
        if let Some(video_id) = &self.video_id {
            self.settings.title = format!("Content from YouTube video {}", video_id);
        }
        self.phase = self.settled();
        tracing::info!(chars = self.transcript.len(), "transcript fetched");
        Completion::Applied
    }

    pub fn begin_refactor(&mut self) -> std::result::Result<RequestId, ValidationError> {
        if self.transcript.is_empty() {
            return Err(ValidationError::MissingTranscript);
        }
        let request = self.start(Phase::Refactoring);
        tracing::debug!(%request, content_type = %self.content_type, "refactor started");
        Ok(request)
    }

    pub fn complete_refactor(&mut self, request: RequestId, content: String) -> Completion {
        if !self.is_current(request, "refactor") {
            return Completion::Stale;
        }
        self.content = content;
        self.phase = self.settled();
        tracing::info!(content_type = %self.content_type, "content refactored");
        Completion::Applied
    }

    /// Keywords to optimize for: the selected account's, when SEO is enabled.
    pub fn seo_keywords<'a>(&self, accounts: &'a [Account]) -> Option<&'a str> {
        if !self.seo_enabled {
            return None;
        }
        let selected = self.selected_account.as_deref()?;
        accounts
            .iter()
            .find(|a| a.id == selected)
            .and_then(|a| a.seo_keywords.as_deref())
    }

    /// Checks content, account and title, in that order.
    pub fn begin_publish(&mut self) -> std::result::Result<PublishRequest, ValidationError> {
        if self.content.is_empty() {
            return Err(ValidationError::MissingContent);
        }
        let account_id = self
            .selected_account
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::MissingAccount)?;
        if self.settings.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let request_id = self.start(Phase::Publishing);
        self.publishing_post_id = self.editing_post_id.clone();
        tracing::debug!(request = %request_id, post_id = ?self.publishing_post_id, "publish started");

        Ok(PublishRequest {
            request_id,
            account_id,
            post_id: self.publishing_post_id.clone(),
            settings: self.settings.clone(),
            content: to_gutenberg_blocks(&self.content),
        })
    }

    /// A successful publish ends the session: draft, content and editing
    /// state are discarded.
    pub fn complete_publish(&mut self, request: RequestId) -> Option<PublishOutcome> {
        if !self.is_current(request, "publish") {
            return None;
        }

        let outcome = if self.publishing_post_id.take().is_some() {
            PublishOutcome::Updated
        } else if self.settings.status == PostStatus::Future {
            PublishOutcome::Scheduled
        } else {
            PublishOutcome::Sent
        };

        self.discard_draft();
        tracing::info!(?outcome, "publish finished");
        Some(outcome)
    }

    /// An in-flight operation failed; return to the resting phase.
    pub fn fail(&mut self, request: RequestId) -> Completion {
        if !self.is_current(request, "failure") {
            return Completion::Stale;
        }
        self.publishing_post_id = None;
        self.phase = self.settled();
        Completion::Applied
    }

    /// Load an existing post into the editor.
    pub fn edit_post(&mut self, post: &Post) {
        self.content = post.content.clone();
        self.settings = PublishSettings {
            title: post.title.clone(),
            status: post.status,
            scheduled_date: (post.status == PostStatus::Future).then_some(post.date),
            ..Default::default()
        };
        self.editing_post_id = Some(post.id.clone());
        self.phase = Phase::Editing(post.id.clone());
        tracing::info!(post_id = %post.id, title = %post.title, "editing post");
    }

    pub fn cancel_editing(&mut self) -> std::result::Result<(), ValidationError> {
        if self.editing_post_id.is_none() {
            return Err(ValidationError::NotEditing);
        }
        self.discard_draft();
        Ok(())
    }

    fn discard_draft(&mut self) {
        self.content.clear();
        self.settings = PublishSettings::default();
        self.editing_post_id = None;
        self.publishing_post_id = None;
        self.phase = self.settled();
    }
}

/// Resolve `url`, fetch its transcript and load it into the session.
pub async fn run_fetch(
    session: &mut Session,
    url: &str,
    source: &dyn TranscriptSource,
) -> Result<Completion> {
    let (request, video_id) = session.begin_fetch(url)?;
    match source.fetch_transcript(&video_id).await {
        Ok(transcript) => Ok(session.complete_fetch(request, transcript)),
        Err(e) => {
            session.fail(request);
            Err(e)
        }
    }
}

/// Regenerate the session content as its current content type.
pub async fn run_refactor(
    session: &mut Session,
    accounts: &[Account],
    generator: &dyn ContentGenerator,
) -> Result<Completion> {
    let request = session.begin_refactor()?;
    let keywords = session.seo_keywords(accounts);
    match generator
        .generate(session.transcript(), session.content_type, keywords)
        .await
    {
        Ok(content) => Ok(session.complete_refactor(request, content)),
        Err(e) => {
            session.fail(request);
            Err(e)
        }
    }
}

/// Publish the session content to the selected account.
pub async fn run_publish(
    session: &mut Session,
    accounts: &[Account],
    backend: &dyn PostsBackend,
) -> Result<Option<(PublishOutcome, Post)>> {
    let request = session.begin_publish()?;
    let Some(account) = accounts.iter().find(|a| a.id == request.account_id) else {
        session.fail(request.request_id);
        return Err(ForgeError::NotFound {
            kind: "Account",
            id: request.account_id,
        });
    };

    match backend.publish_post(account, &request).await {
        Ok(post) => Ok(session
            .complete_publish(request.request_id)
            .map(|outcome| (outcome, post))),
        Err(e) => {
            session.fail(request.request_id);
            Err(e)
        }
    }
}

/// When the draft is scheduled, the instant it goes live.
pub fn scheduled_for(settings: &PublishSettings) -> Option<DateTime<Utc>> {
    (settings.status == PostStatus::Future)
        .then_some(settings.scheduled_date)
        .flatten()
}
