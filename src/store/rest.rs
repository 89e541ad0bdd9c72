// ABOUTME: REST client backend for a hosted document store
// ABOUTME: Speaks the tricks/user_tricks collection API with merge-upserts and bulk replace
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trickline Contributors

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::DocumentStore;
use crate::errors::{AppError, AppResult};
use crate::models::{NewTrick, Patch, ProgressPatch, RawTrickDoc, UserTrickProgress};
use async_trait::async_trait;

/// REST backend configuration
#[derive(Debug, Clone)]
pub struct RestStoreConfig {
    /// Base URL of the hosted document store, e.g. `https://api.example.com/v1`
    pub base_url: String,
    /// Bearer key sent with every request
    pub api_key: String,
}

/// Client for a hosted document-store HTTP API
///
/// The API exposes the two collections the engine needs: `tricks` (queryable
/// by `is_public` and `owner_id`) and `user_tricks` (keyed by
/// `<userId>_<trickId>`, queryable by `user_id`). Progress writes go through
/// `PUT …?merge=true`, matching the merge-upsert contract of the store trait.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct CreatedDoc {
    id: String,
}

#[derive(Deserialize)]
struct ReplacedCatalog {
    inserted: usize,
}

impl RestStore {
    /// Build a client for the given backend
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when the base URL is not a valid URL.
    pub fn new(config: RestStoreConfig) -> AppResult<Self> {
        Url::parse(&config.base_url)
            .map_err(|e| AppError::config(format!("Invalid base URL {}: {e}", config.base_url)))?;
        Ok(Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn check(response: Response, context: &str) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(AppError::external_service(format!(
                "{context} failed with status {status}"
            )))
        }
    }

    async fn list_tricks(&self, query: &[(&str, &str)]) -> AppResult<Vec<RawTrickDoc>> {
        let response = self
            .client
            .get(self.endpoint("tricks"))
            .query(query)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Trick query failed: {e}")))?;
        Self::check(response, "Trick query")
            .await?
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("Malformed trick list: {e}")))
    }
}

fn progress_body(patch: &ProgressPatch) -> Value {
    let mut body = json!({
        "userId": patch.user_id,
        "trickId": patch.trick_id,
        "status": patch.status,
        "updatedAt": patch.updated_at,
    });
    if let Some(obj) = body.as_object_mut() {
        match patch.started_at {
            Patch::Keep => {}
            Patch::Clear => {
                obj.insert("startedAt".to_owned(), Value::Null);
            }
            Patch::Set(at) => {
                obj.insert("startedAt".to_owned(), json!(at));
            }
        }
        match patch.mastered_at {
            Patch::Keep => {}
            Patch::Clear => {
                obj.insert("masteredAt".to_owned(), Value::Null);
            }
            Patch::Set(at) => {
                obj.insert("masteredAt".to_owned(), json!(at));
            }
        }
    }
    body
}

#[async_trait]
impl DocumentStore for RestStore {
    async fn list_public_tricks(&self) -> AppResult<Vec<RawTrickDoc>> {
        self.list_tricks(&[("is_public", "true")]).await
    }

    async fn list_tricks_by_owner(&self, owner_id: &str) -> AppResult<Vec<RawTrickDoc>> {
        self.list_tricks(&[("owner_id", owner_id)]).await
    }

    async fn get_trick(&self, trick_id: &str) -> AppResult<Option<RawTrickDoc>> {
        let response = self
            .client
            .get(self.endpoint(&format!("tricks/{trick_id}")))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Trick fetch failed: {e}")))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::check(response, "Trick fetch")
            .await?
            .json()
            .await
            .map(Some)
            .map_err(|e| AppError::external_service(format!("Malformed trick document: {e}")))
    }

    async fn create_trick(&self, trick: &NewTrick) -> AppResult<String> {
        let response = self
            .client
            .post(self.endpoint("tricks"))
            .bearer_auth(&self.api_key)
            .json(trick)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Trick create failed: {e}")))?;
        let created: CreatedDoc = Self::check(response, "Trick create")
            .await?
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("Malformed create response: {e}")))?;
        debug!(trick_id = %created.id, "trick created");
        Ok(created.id)
    }

    async fn list_progress_for_user(&self, user_id: &str) -> AppResult<Vec<UserTrickProgress>> {
        let response = self
            .client
            .get(self.endpoint("user_tricks"))
            .query(&[("user_id", user_id)])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Progress query failed: {e}")))?;
        Self::check(response, "Progress query")
            .await?
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("Malformed progress list: {e}")))
    }

    async fn upsert_progress(&self, patch: &ProgressPatch) -> AppResult<()> {
        let response = self
            .client
            .put(self.endpoint(&format!("user_tricks/{}", patch.doc_id())))
            .query(&[("merge", "true")])
            .bearer_auth(&self.api_key)
            .json(&progress_body(patch))
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Progress upsert failed: {e}")))?;
        Self::check(response, "Progress upsert").await?;
        Ok(())
    }

    async fn delete_progress(&self, user_id: &str, trick_id: &str) -> AppResult<()> {
        let doc_id = crate::models::progress_doc_id(user_id, trick_id);
        let response = self
            .client
            .delete(self.endpoint(&format!("user_tricks/{doc_id}")))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Progress delete failed: {e}")))?;
        // Idempotent: the record may already be gone.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check(response, "Progress delete").await?;
        Ok(())
    }

    async fn replace_catalog(&self, tricks: &[NewTrick]) -> AppResult<usize> {
        for trick in tricks {
            trick.validate()?;
        }
        let response = self
            .client
            .post(self.endpoint("catalog:replace"))
            .bearer_auth(&self.api_key)
            .json(&json!({ "tricks": tricks }))
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Catalog replace failed: {e}")))?;
        let replaced: ReplacedCatalog = Self::check(response, "Catalog replace")
            .await?
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("Malformed replace response: {e}")))?;
        Ok(replaced.inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrickStatus;
    use chrono::Utc;

    #[test]
    fn progress_body_omits_kept_fields() {
        let now = Utc::now();
        let patch = ProgressPatch::for_transition("u1", "t1", TrickStatus::Completed, now);
        let body = progress_body(&patch);
        let obj = body.as_object().unwrap();
        assert!(!obj.contains_key("startedAt"));
        assert!(obj.contains_key("masteredAt"));
        assert_eq!(obj["status"], "COMPLETED");
    }

    #[test]
    fn progress_body_nulls_cleared_fields() {
        let now = Utc::now();
        let patch = ProgressPatch::for_transition("u1", "t1", TrickStatus::InProgress, now);
        let body = progress_body(&patch);
        let obj = body.as_object().unwrap();
        assert!(obj["masteredAt"].is_null());
        assert!(!obj["startedAt"].is_null());
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = RestStore::new(RestStoreConfig {
            base_url: "not a url".to_owned(),
            api_key: String::new(),
        });
        assert!(result.is_err());
    }
}
