use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{content::ContentType, error::ForgeError, ports::ContentGenerator};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Missing API key: {env_var} environment variable is not set for {provider_name}")]
    MissingApiKey {
        provider_name: String,
        env_var: String,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Grok,
    Openai,
    Gemini,
}

pub struct ProviderConfig {
    pub api_url: &'static str,
    pub model: &'static str,
    pub env_var: &'static str,
}

impl Provider {
    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::Grok => ProviderConfig {
                api_url: "https://api.x.ai/v1/chat/completions",
                model: "grok-4-fast",
                env_var: "XAI_API_KEY",
            },
            Provider::Openai => ProviderConfig {
                api_url: "https://api.openai.com/v1/chat/completions",
                model: "gpt-5.1",
                env_var: "OPENAI_API_KEY",
            },
            Provider::Gemini => ProviderConfig {
                api_url: "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions",
                model: "gemini-3-pro",
                env_var: "GEMINI_API_KEY",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Grok => "Grok",
            Provider::Openai => "OpenAI",
            Provider::Gemini => "Gemini",
        }
    }

    /// Validate that the API key is set for this provider
    pub fn validate_api_key(&self) -> Result<String, ProviderError> {
        let config = self.config();
        std::env::var(config.env_var).map_err(|_| ProviderError::MissingApiKey {
            provider_name: self.name().to_string(),
            env_var: config.env_var.to_string(),
        })
    }
}

fn genre_instructions(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::SalesCopy => {
            "Write persuasive sales copy: an attention-grabbing headline, the core promise, a short list of benefits and a call to action."
        }
        ContentType::BlogPost => {
            "Write a well-structured blog post in Markdown with a title, an introduction, headed sections covering the key points and a conclusion."
        }
        ContentType::CodeMode => {
            "Extract the technical ideas and express them as annotated code examples in fenced Markdown code blocks."
        }
        ContentType::ActionableGuide => {
            "Write a step-by-step guide in Markdown: what the reader needs, numbered steps with instructions and tips for success."
        }
        ContentType::FacebookPost => {
            "Write a short, upbeat Facebook post with a hook, three takeaways, a question to drive comments and a few hashtags."
        }
        ContentType::RawTranscript => "Return the transcript unchanged.",
    }
}

/// System prompt for a generation request.
pub fn system_prompt(content_type: ContentType, seo_keywords: Option<&str>) -> String {
    let mut prompt = format!(
        "You turn YouTube video transcripts into {}. {}\n\nBase everything on the transcript. Output only the content, no explanations.",
        content_type,
        genre_instructions(content_type)
    );

    if let Some(keywords) = seo_keywords.filter(|k| !k.trim().is_empty()) {
        prompt.push_str(&format!(
            "\n\nOptimize the text for these SEO keywords, using them naturally: {}",
            keywords
        ));
    }

    prompt
}

/// Generates content through an OpenAI-compatible chat completion endpoint.
pub struct ProviderGenerator {
    provider: Provider,
    http: reqwest::Client,
}

impl ProviderGenerator {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ContentGenerator for ProviderGenerator {
    async fn generate(
        &self,
        transcript: &str,
        content_type: ContentType,
        seo_keywords: Option<&str>,
    ) -> crate::Result<String> {
        if content_type == ContentType::RawTranscript {
            return Ok(transcript.to_string());
        }

        let config = self.provider.config();
        let api_key = self.provider.validate_api_key()?;

        tracing::debug!(provider = self.provider.name(), %content_type, "requesting generation");

        let response = self
            .http
            .post(config.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&serde_json::json!({
                "model": config.model,
                "messages": [
                    {
                        "role": "system",
                        "content": system_prompt(content_type, seo_keywords),
                    },
                    {
                        "role": "user",
                        "content": format!("Transcript:\n\n{}", transcript),
                    },
                ],
                "temperature": 0.7,
            }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ForgeError::GenerationFailed {
                reason: format!("Invalid API response: {:?}", response),
            })?;

        Ok(content.trim().to_string())
    }
}
