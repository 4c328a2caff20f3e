//! REST client for the hosted backend.
//!
//! Thin request/response wrapper: every method is one HTTP call, errors
//! map onto [`RemoteError`], and nothing here retries or queues. The
//! optimistic apply/rollback pairing is the caller's job.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::types::{CompletionRow, HabitRow, RemoteError, Table};
use crate::session::User;
use crate::storage::Config;

/// Client for the remote datastore's rows and auth endpoints.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: User,
}

impl RemoteClient {
    /// Create a client against `base_url` with the project api key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        RemoteClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            access_token: None,
        }
    }

    /// Build from configuration; `None` when remote sync is not configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let url = config.remote.url.as_deref()?;
        let api_key = config.remote.api_key.as_deref()?;
        Some(RemoteClient::new(url, api_key))
    }

    /// Attach (or clear) the signed-in user's access token.
    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }

    /// Host part of the base URL, used by the offline cache to pass
    /// backend requests through untouched.
    pub fn host(&self) -> Option<String> {
        url::Url::parse(&self.base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }

    fn rows_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header("apikey", &self.api_key);
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request.bearer_auth(&self.api_key),
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(RemoteError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    /// Sign in with email and password, returning the user and token.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(User, String), RemoteError> {
        let url = format!("{}/auth/v1/token", self.base_url);
        let response = self
            .apply_auth(self.http.post(&url))
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let token: TokenResponse = Self::check(response).await?.json().await?;
        debug!(user_id = %token.user.id, "signed in");
        Ok((token.user, token.access_token))
    }

    /// Invalidate the current access token.
    pub async fn sign_out(&self) -> Result<(), RemoteError> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        let response = self.apply_auth(self.http.post(&url)).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Select all habit rows for `user_id`, newest first.
    pub async fn select_habits(&self, user_id: &str) -> Result<Vec<HabitRow>, RemoteError> {
        let response = self
            .apply_auth(self.http.get(self.rows_url(Table::Habits)))
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Insert a habit row, returning the stored row (id may differ).
    pub async fn insert_habit(&self, row: &HabitRow) -> Result<HabitRow, RemoteError> {
        let response = self
            .apply_auth(self.http.post(self.rows_url(Table::Habits)))
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        let mut rows: Vec<HabitRow> = Self::check(response).await?.json().await?;
        rows.pop()
            .ok_or_else(|| RemoteError::UnexpectedResponse("empty insert response".to_string()))
    }

    /// Update the habit row with the row's id.
    pub async fn update_habit(&self, row: &HabitRow) -> Result<(), RemoteError> {
        let response = self
            .apply_auth(self.http.patch(self.rows_url(Table::Habits)))
            .query(&[("id", format!("eq.{}", row.id))])
            .json(row)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Delete a habit row by id.
    pub async fn delete_habit(&self, id: &str) -> Result<(), RemoteError> {
        let response = self
            .apply_auth(self.http.delete(self.rows_url(Table::Habits)))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Select all completion rows visible to the user, newest first.
    pub async fn select_completions(&self) -> Result<Vec<CompletionRow>, RemoteError> {
        let response = self
            .apply_auth(self.http.get(self.rows_url(Table::Completions)))
            .query(&[("order", "completed_at.desc")])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Insert a completion row, returning the stored row.
    pub async fn insert_completion(&self, row: &CompletionRow) -> Result<CompletionRow, RemoteError> {
        let response = self
            .apply_auth(self.http.post(self.rows_url(Table::Completions)))
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        let mut rows: Vec<CompletionRow> = Self::check(response).await?.json().await?;
        rows.pop()
            .ok_or_else(|| RemoteError::UnexpectedResponse("empty insert response".to_string()))
    }

    /// Insert a batch of completion rows (anonymous-data migration).
    pub async fn insert_completions(&self, rows: &[CompletionRow]) -> Result<(), RemoteError> {
        let response = self
            .apply_auth(self.http.post(self.rows_url(Table::Completions)))
            .json(rows)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Update the completion row with the row's id.
    pub async fn update_completion(&self, row: &CompletionRow) -> Result<(), RemoteError> {
        let response = self
            .apply_auth(self.http.patch(self.rows_url(Table::Completions)))
            .query(&[("id", format!("eq.{}", row.id))])
            .json(row)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Delete the completion for one (habit, date) pair (toggle-off).
    pub async fn delete_completion_by_day(
        &self,
        habit_id: &str,
        date: NaiveDate,
    ) -> Result<(), RemoteError> {
        let response = self
            .apply_auth(self.http.delete(self.rows_url(Table::Completions)))
            .query(&[
                ("habit_id", format!("eq.{habit_id}")),
                ("completed_at", format!("eq.{date}")),
            ])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
