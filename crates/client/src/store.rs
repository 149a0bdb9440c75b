use api_types::expense::{
    ExpenseCreated, ExpenseFields, ExpenseListResponse, ExpensePatch, ExpenseQuery, ExpenseRecord,
};
use async_trait::async_trait;
use engine::{RecordStore, Session, StoreError};
use reqwest::{StatusCode, Url};

use crate::{API_KEY_HEADER, ClientError, ErrorResponse};

/// Collection holding the expense documents.
const COLLECTION: &str = "expenses";

/// Client for the record store's document API.
///
/// Holds a session read handle and attaches the current bearer token to
/// every request; without a signed-in user no request leaves the
/// process.
#[derive(Debug)]
pub struct StoreClient {
    base_url: Url,
    api_key: String,
    http: reqwest::Client,
    session: Session,
}

impl StoreClient {
    pub fn new(base_url: &str, api_key: &str, session: Session) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|err| ClientError::InvalidBaseUrl(err.to_string()))?;
        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
            session,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        self.base_url
            .join(path)
            .map_err(|err| StoreError::Transport(format!("invalid endpoint: {err}")))
    }

    fn token(&self) -> Result<String, StoreError> {
        self.session.token().ok_or(StoreError::Unauthorized)
    }

    async fn error_for(res: reqwest::Response) -> StoreError {
        let status = res.status();
        let message = res
            .json::<ErrorResponse>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| "unknown error".to_string());
        tracing::warn!("record store request failed: {status} {message}");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Unauthorized,
            StatusCode::NOT_FOUND => StoreError::NotFound,
            _ => StoreError::Rejected(message),
        }
    }
}

#[async_trait]
impl RecordStore for StoreClient {
    async fn create(&self, fields: ExpenseFields) -> Result<String, StoreError> {
        let token = self.token()?;
        let endpoint = self.endpoint(&format!("documents/{COLLECTION}"))?;

        let res = self
            .http
            .post(endpoint)
            .bearer_auth(token)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&fields)
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        if res.status().is_success() {
            let created = res
                .json::<ExpenseCreated>()
                .await
                .map_err(|err| StoreError::Transport(err.to_string()))?;
            return Ok(created.id);
        }

        Err(Self::error_for(res).await)
    }

    async fn list_for_owner(&self, owner: &str) -> Result<Vec<ExpenseRecord>, StoreError> {
        let token = self.token()?;
        let endpoint = self.endpoint(&format!("documents/{COLLECTION}/query"))?;

        let payload = ExpenseQuery {
            owner: owner.to_string(),
        };
        let res = self
            .http
            .post(endpoint)
            .bearer_auth(token)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        if res.status().is_success() {
            return res
                .json::<ExpenseListResponse>()
                .await
                .map(|body| body.expenses)
                .map_err(|err| StoreError::Transport(err.to_string()));
        }

        Err(Self::error_for(res).await)
    }

    async fn update(&self, id: &str, patch: ExpensePatch) -> Result<(), StoreError> {
        let token = self.token()?;
        let endpoint = self.endpoint(&format!("documents/{COLLECTION}/{id}"))?;

        let res = self
            .http
            .patch(endpoint)
            .bearer_auth(token)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&patch)
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        if res.status().is_success() {
            return Ok(());
        }

        Err(Self::error_for(res).await)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let token = self.token()?;
        let endpoint = self.endpoint(&format!("documents/{COLLECTION}/{id}"))?;

        let res = self
            .http
            .delete(endpoint)
            .bearer_auth(token)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        if res.status().is_success() {
            return Ok(());
        }

        Err(Self::error_for(res).await)
    }
}
