//! Reusable content templates.

use chrono::{DateTime, Utc};

use crate::{
    error::ValidationError,
    storage::generate_id,
    types::{Account, Template},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateDraft {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct TemplatesPanel {
    templates: Vec<Template>,
}

impl TemplatesPanel {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn into_templates(self) -> Vec<Template> {
        self.templates
    }

    pub fn find(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Save `content` as a template owned by `account_id`.
    ///
    /// Checks title, then account, then content.
    pub fn save_as_template(
        &mut self,
        draft: TemplateDraft,
        content: &str,
        account_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<&Template, ValidationError> {
        if draft.title.trim().is_empty() {
            return Err(ValidationError::MissingTemplateTitle);
        }
        let account_id = account_id
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::MissingAccount)?;
        if content.is_empty() {
            return Err(ValidationError::MissingTemplateContent);
        }

        let template = Template {
            id: generate_id(&self.templates, now),
            title: draft.title,
            content: content.to_string(),
            account_id: account_id.to_string(),
            created_at: now,
            description: Some(draft.description).filter(|d| !d.trim().is_empty()),
        };
        tracing::info!(id = %template.id, "template saved");
        self.templates.push(template);

        Ok(&self.templates[self.templates.len() - 1])
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.templates.len();
        self.templates.retain(|t| t.id != id);
        self.templates.len() != before
    }

    /// Content and title to load into the editor.
    pub fn apply(&self, id: &str) -> Option<(String, String)> {
        self.find(id).map(|t| (t.content.clone(), t.title.clone()))
    }
}

pub fn account_name<'a>(accounts: &'a [Account], account_id: &str) -> &'a str {
    accounts
        .iter()
        .find(|a| a.id == account_id)
        .map(|a| a.site_url.as_str())
        .unwrap_or("Unknown Account")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_717_000_000_000).unwrap()
    }

    fn draft(title: &str) -> TemplateDraft {
        TemplateDraft {
            title: title.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn validation_order_is_title_account_content() {
        let mut panel = TemplatesPanel::default();
        assert_eq!(
            panel.save_as_template(draft(""), "", None, now()).unwrap_err(),
            ValidationError::MissingTemplateTitle
        );
        assert_eq!(
            panel.save_as_template(draft("T"), "", None, now()).unwrap_err(),
            ValidationError::MissingAccount
        );
        assert_eq!(
            panel.save_as_template(draft("T"), "", Some("1"), now()).unwrap_err(),
            ValidationError::MissingTemplateContent
        );
        assert!(panel.templates().is_empty());
    }

    #[test]
    fn save_apply_delete() {
        let mut panel = TemplatesPanel::default();
        let saved = panel
            .save_as_template(
                TemplateDraft {
                    title: "Weekly".to_string(),
                    description: "recap layout".to_string(),
                },
                "<p>body</p>",
                Some("42"),
                now(),
            )
            .unwrap()
            .clone();

        assert_eq!(saved.id, "1717000000000");
        assert_eq!(saved.account_id, "42");
        assert_eq!(saved.created_at, now());
        assert_eq!(saved.description.as_deref(), Some("recap layout"));

        assert_eq!(
            panel.apply(&saved.id),
            Some(("<p>body</p>".to_string(), "Weekly".to_string()))
        );
        assert!(panel.delete(&saved.id));
        assert!(!panel.delete(&saved.id));
        assert_eq!(panel.apply(&saved.id), None);
    }

    #[test]
    fn account_name_falls_back() {
        let accounts = vec![Account {
            id: "1".to_string(),
            site_url: "https://a.example".to_string(),
            username: "u".to_string(),
            password: "p".to_string(),
            seo_keywords: None,
        }];
        assert_eq!(account_name(&accounts, "1"), "https://a.example");
        assert_eq!(account_name(&accounts, "2"), "Unknown Account");
    }
}
