//! Turning a transcript into one of the supported content genres.

use std::{fmt, str::FromStr};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::ForgeError, ports::ContentGenerator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ContentType {
    SalesCopy,
    #[default]
    BlogPost,
    CodeMode,
    ActionableGuide,
    FacebookPost,
    RawTranscript,
}

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        ContentType::SalesCopy,
        ContentType::BlogPost,
        ContentType::CodeMode,
        ContentType::ActionableGuide,
        ContentType::FacebookPost,
        ContentType::RawTranscript,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContentType::SalesCopy => "sales copy",
            ContentType::BlogPost => "blog post",
            ContentType::CodeMode => "code mode",
            ContentType::ActionableGuide => "actionable guide",
            ContentType::FacebookPost => "facebook post",
            ContentType::RawTranscript => "raw transcript",
        }
    }

    /// Fixed body appended after the preamble. `None` for raw transcripts.
    fn body(&self) -> Option<&'static str> {
        match self {
            ContentType::BlogPost => Some(BLOG_POST_BODY),
            ContentType::SalesCopy => Some(SALES_COPY_BODY),
            ContentType::CodeMode => Some(CODE_MODE_BODY),
            ContentType::ActionableGuide => Some(ACTIONABLE_GUIDE_BODY),
            ContentType::FacebookPost => Some(FACEBOOK_POST_BODY),
            ContentType::RawTranscript => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContentType {
    type Err = ForgeError;

    /// Accepts the canonical label with spaces, dashes or underscores, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        ContentType::ALL
            .into_iter()
            .find(|t| t.label() == normalized)
            .ok_or_else(|| ForgeError::UnknownContentType(s.to_string()))
    }
}

impl TryFrom<String> for ContentType {
    type Error = ForgeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContentType> for String {
    fn from(value: ContentType) -> Self {
        value.label().to_string()
    }
}

static BLOG_POST_BODY: &str = "# The Ultimate Guide\n\nWelcome to this comprehensive blog post created from a YouTube video. This content would normally be generated by an AI like Gemini, providing a well-structured blog post with headings, paragraphs, and relevant information extracted from the transcript.\n\n## Key Points\n\n1. First important point from the video\n2. Second important point from the video\n3. Third important point from the video\n\n## Conclusion\n\nThis is where the blog post would summarize the main points and provide a call to action.";

static SALES_COPY_BODY: &str = "ATTENTION: Discover the Secret That's Transforming Lives!\n\nAre you ready to take your skills to the next level? This powerful solution has already helped thousands of people achieve remarkable results.\n\n✓ Benefit 1\n✓ Benefit 2\n✓ Benefit 3\n\nDon't wait! Take action now and transform your life today!";

static CODE_MODE_BODY: &str = "```javascript\n// Here's how you could implement this in code\nfunction processData(data) {\n  const results = data.map(item => {\n    return {\n      id: item.id,\n      value: item.value * 2,\n      processed: true\n    };\n  });\n  \n  return results;\n}\n\n// Example usage\nconst output = processData(inputData);\nconsole.log(output);\n```";

static ACTIONABLE_GUIDE_BODY: &str = "# Step-by-Step Guide\n\n## What You'll Need\n- Item 1\n- Item 2\n- Item 3\n\n## Steps\n\n### 1. First Step\nDetailed instructions for the first step...\n\n### 2. Second Step\nDetailed instructions for the second step...\n\n### 3. Third Step\nDetailed instructions for the third step...\n\n## Tips for Success\n- Important tip 1\n- Important tip 2\n- Important tip 3";

static FACEBOOK_POST_BODY: &str = "✨ Just watched the most AMAZING video on YouTube! 📺\n\nHere are 3 incredible takeaways that will change how you think about this topic:\n\n1️⃣ First takeaway\n2️⃣ Second takeaway\n3️⃣ Third takeaway\n\nWho else has tried this? Share your experience in the comments! 👇\n\n#hashtag1 #hashtag2 #hashtag3";

/// Render `transcript` as `content_type` from the fixed template table.
///
/// Raw transcripts come back verbatim and ignore the keywords. Every other
/// type ignores the transcript text and yields a preamble (with a keyword
/// sentence when keywords are non-empty) followed by the type's body.
pub fn refactor(transcript: &str, content_type: ContentType, seo_keywords: Option<&str>) -> String {
    let Some(body) = content_type.body() else {
        return transcript.to_string();
    };

    let mut output = format!(
        "This is an AI-generated {} based on the transcript.",
        content_type
    );

    if let Some(keywords) = seo_keywords.filter(|k| !k.trim().is_empty()) {
        output.push_str(&format!(
            " It has been optimized for the following SEO keywords: {}.",
            keywords
        ));
    }

    output.push_str("\n\n");
    output.push_str(body);
    output
}

/// Offline generator backed by [`refactor`].
#[derive(Debug, Clone, Default)]
pub struct TemplateGenerator {
    latency: std::time::Duration,
}

impl TemplateGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: std::time::Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl ContentGenerator for TemplateGenerator {
    async fn generate(
        &self,
        transcript: &str,
        content_type: ContentType,
        seo_keywords: Option<&str>,
    ) -> crate::Result<String> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(refactor(transcript, content_type, seo_keywords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_transcript_is_returned_verbatim() {
        let transcript = "hello world, this is the video";
        assert_eq!(
            refactor(transcript, ContentType::RawTranscript, Some("rust, wasm")),
            transcript
        );
        assert_eq!(refactor(transcript, ContentType::RawTranscript, None), transcript);
    }

    #[test]
    fn keywords_sentence_only_when_present() {
        let with = refactor("t", ContentType::BlogPost, Some("rust, tokio"));
        assert!(with.starts_with(
            "This is an AI-generated blog post based on the transcript. It has been optimized for the following SEO keywords: rust, tokio.\n\n# The Ultimate Guide"
        ));

        let without = refactor("t", ContentType::BlogPost, None);
        assert!(without.starts_with("This is an AI-generated blog post based on the transcript.\n\n"));

        let blank = refactor("t", ContentType::BlogPost, Some("  "));
        assert_eq!(blank, without);
    }

    #[test]
    fn every_type_has_its_own_body() {
        let outputs: Vec<String> = ContentType::ALL
            .iter()
            .map(|t| refactor("transcript", *t, None))
            .collect();

        for (i, a) in outputs.iter().enumerate() {
            for b in outputs.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
        assert!(outputs[2].contains("```javascript"));
        assert!(outputs[4].contains("#hashtag1"));
    }

    #[test]
    fn output_ignores_transcript_text() {
        assert_eq!(
            refactor("one", ContentType::SalesCopy, None),
            refactor("two", ContentType::SalesCopy, None)
        );
    }

    #[test]
    fn parses_labels_and_rejects_unknown() {
        assert_eq!("blog post".parse::<ContentType>().unwrap(), ContentType::BlogPost);
        assert_eq!("Sales-Copy".parse::<ContentType>().unwrap(), ContentType::SalesCopy);
        assert_eq!("raw_transcript".parse::<ContentType>().unwrap(), ContentType::RawTranscript);
        assert!(matches!(
            "tweet thread".parse::<ContentType>(),
            Err(ForgeError::UnknownContentType(s)) if s == "tweet thread"
        ));
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&ContentType::ActionableGuide).unwrap();
        assert_eq!(json, "\"actionable guide\"");
        let back: ContentType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ContentType::ActionableGuide);
    }

    #[tokio::test]
    async fn template_generator_delegates_to_refactor() {
        let generator = TemplateGenerator::new();
        let out = generator
            .generate("abc", ContentType::RawTranscript, None)
            .await
            .unwrap();
        assert_eq!(out, "abc");
    }
}
