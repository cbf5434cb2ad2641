//! WordPress account management.

use chrono::{DateTime, Utc};

use crate::{error::ValidationError, storage::generate_id, types::Account};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountForm {
    pub site_url: String,
    pub username: String,
    pub password: String,
    pub seo_keywords: String,
}

impl AccountForm {
    fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<&str> = [
            ("site url", &self.site_url),
            ("username", &self.username),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields {
                fields: missing.join(", "),
            })
        }
    }

    fn into_account(self, id: String) -> Account {
        let seo_keywords = Some(self.seo_keywords).filter(|k| !k.trim().is_empty());
        Account {
            id,
            site_url: self.site_url,
            username: self.username,
            password: self.password,
            seo_keywords,
        }
    }
}

impl From<&Account> for AccountForm {
    fn from(account: &Account) -> Self {
        Self {
            site_url: account.site_url.clone(),
            username: account.username.clone(),
            password: account.password.clone(),
            seo_keywords: account.seo_keywords.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountChange {
    Added,
    Updated,
    Deleted,
}

/// Accounts collection plus the add/edit form.
///
/// Failed operations leave the state untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountsPanel {
    accounts: Vec<Account>,
    pub form: AccountForm,
    editing_id: Option<String>,
}

impl AccountsPanel {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts,
            ..Default::default()
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn into_accounts(self) -> Vec<Account> {
        self.accounts
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn find(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn reset_form(&mut self) {
        self.form = AccountForm::default();
        self.editing_id = None;
    }

    /// Load an account into the form. Returns false for unknown ids.
    pub fn edit(&mut self, id: &str) -> bool {
        let Some(account) = self.find(id).cloned() else {
            return false;
        };
        self.form = AccountForm::from(&account);
        self.editing_id = Some(account.id);
        true
    }

    /// Add the form as a new account, or replace the account being edited.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<AccountChange, ValidationError> {
        self.form.validate()?;
        let form = std::mem::take(&mut self.form);

        let change = match self.editing_id.take() {
            Some(id) => {
                let updated = form.into_account(id.clone());
                for account in self.accounts.iter_mut().filter(|a| a.id == id) {
                    *account = updated.clone();
                }
                AccountChange::Updated
            }
            None => {
                let id = generate_id(&self.accounts, now);
                self.accounts.push(form.into_account(id));
                AccountChange::Added
            }
        };

        tracing::info!(?change, count = self.accounts.len(), "accounts changed");
        self.reset_form();
        Ok(change)
    }

    /// Remove an account. Deleting the account being edited resets the form.
    pub fn delete(&mut self, id: &str) -> Option<AccountChange> {
        let before = self.accounts.len();
        self.accounts.retain(|a| a.id != id);

        if self.editing_id.as_deref() == Some(id) {
            self.reset_form();
        }

        (self.accounts.len() != before).then_some(AccountChange::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    fn fill(panel: &mut AccountsPanel, site: &str) {
        panel.form = AccountForm {
            site_url: site.to_string(),
            username: "admin".to_string(),
            password: "app-password".to_string(),
            seo_keywords: String::new(),
        };
    }

    #[test]
    fn submit_requires_fields() {
        let mut panel = AccountsPanel::default();
        panel.form.site_url = "https://a.example".to_string();

        let err = panel.submit(ts(1)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields {
                fields: "username, password".to_string()
            }
        );
        assert!(panel.accounts().is_empty());
        assert_eq!(panel.form.site_url, "https://a.example");
    }

    #[test]
    fn adds_with_unique_time_ids() {
        let mut panel = AccountsPanel::default();
        fill(&mut panel, "https://a.example");
        assert_eq!(panel.submit(ts(1000)).unwrap(), AccountChange::Added);
        fill(&mut panel, "https://b.example");
        panel.submit(ts(1000)).unwrap();

        let ids: Vec<&str> = panel.accounts().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["1000", "1001"]);
        assert_eq!(panel.form, AccountForm::default());
        assert_eq!(panel.accounts()[0].seo_keywords, None);
    }

    #[test]
    fn edit_then_submit_replaces_in_place() {
        let mut panel = AccountsPanel::default();
        fill(&mut panel, "https://a.example");
        panel.submit(ts(5)).unwrap();

        assert!(panel.edit("5"));
        assert_eq!(panel.form.site_url, "https://a.example");
        panel.form.seo_keywords = "rust, wasm".to_string();

        assert_eq!(panel.submit(ts(99)).unwrap(), AccountChange::Updated);
        assert_eq!(panel.accounts().len(), 1);
        assert_eq!(panel.accounts()[0].id, "5");
        assert_eq!(panel.accounts()[0].seo_keywords.as_deref(), Some("rust, wasm"));
        assert_eq!(panel.editing_id(), None);
    }

    #[test]
    fn deleting_the_edited_account_resets_form() {
        let mut panel = AccountsPanel::default();
        fill(&mut panel, "https://a.example");
        panel.submit(ts(7)).unwrap();
        fill(&mut panel, "https://b.example");
        panel.submit(ts(8)).unwrap();

        panel.edit("7");
        assert_eq!(panel.delete("7"), Some(AccountChange::Deleted));
        assert_eq!(panel.editing_id(), None);
        assert_eq!(panel.form, AccountForm::default());
        assert_eq!(panel.accounts().len(), 1);
    }

    #[test]
    fn deleting_another_account_keeps_form() {
        let mut panel = AccountsPanel::default();
        fill(&mut panel, "https://a.example");
        panel.submit(ts(7)).unwrap();
        fill(&mut panel, "https://b.example");
        panel.submit(ts(8)).unwrap();

        panel.edit("7");
        panel.delete("8");
        assert_eq!(panel.editing_id(), Some("7"));
        assert_eq!(panel.form.site_url, "https://a.example");
        assert_eq!(panel.delete("missing"), None);
    }
}
