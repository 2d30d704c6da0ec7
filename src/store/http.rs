//! JSON client for a remote article endpoint.
//!
//! Speaks the minimal CRUD contract: `GET <base>` for the full set,
//! `POST <base>` to create, `PUT <base>/<id>` to update and
//! `DELETE <base>/<id>` to remove. Create and update bodies are wrapped
//! Rails-style under an `article` key.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ArticleBody, RemoteStore, StoredArticle};
use crate::error::StoreError;
use crate::record::RecordId;

/// [`RemoteStore`] over HTTP, backed by a shared `reqwest` client.
#[derive(Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base: String,
}

/// Param-root wrapper: the endpoint expects `{"article": {...}}`.
#[derive(Serialize)]
struct ArticleParams<'a> {
    article: &'a ArticleBody,
}

#[derive(Deserialize)]
struct CreateReply {
    id: RecordId,
}

impl HttpStore {
    /// Build a store for the given base resource path,
    /// e.g. `http://localhost:3000/articles.api`.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        HttpStore {
            client: reqwest::Client::new(),
            base,
        }
    }

    /// Same, but with a preconfigured client (timeouts, headers).
    pub fn with_client(client: reqwest::Client, base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        HttpStore { client, base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn item_url(&self, id: &RecordId) -> String {
        format!("{}/{}", self.base, id)
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}

fn decode(err: reqwest::Error) -> StoreError {
    StoreError::Decode(err.to_string())
}

fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(StoreError::Rejected {
            status: status.as_u16(),
        })
    }
}

#[async_trait(?Send)]
impl RemoteStore for HttpStore {
    async fn list(&self) -> Result<Vec<StoredArticle>, StoreError> {
        debug!(base = %self.base, "listing articles");
        let response = self
            .client
            .get(self.base.as_str())
            .send()
            .await
            .map_err(transport)?;
        check(response)?
            .json::<Vec<StoredArticle>>()
            .await
            .map_err(decode)
    }

    async fn create(&self, body: &ArticleBody) -> Result<RecordId, StoreError> {
        debug!(base = %self.base, order = body.order, "creating article");
        let response = self
            .client
            .post(self.base.as_str())
            .json(&ArticleParams { article: body })
            .send()
            .await
            .map_err(transport)?;
        let reply = check(response)?
            .json::<CreateReply>()
            .await
            .map_err(decode)?;
        Ok(reply.id)
    }

    async fn update(&self, id: &RecordId, body: &ArticleBody) -> Result<(), StoreError> {
        debug!(%id, "updating article");
        let response = self
            .client
            .put(self.item_url(id))
            .json(&ArticleParams { article: body })
            .send()
            .await
            .map_err(transport)?;
        check(response)?;
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        debug!(%id, "deleting article");
        let response = self
            .client
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(transport)?;
        check(response)?;
        Ok(())
    }
}
