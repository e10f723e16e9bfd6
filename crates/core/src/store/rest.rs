use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use uuid::Uuid;

use super::traits::HoldingsStore;
use crate::errors::CoreError;
use crate::models::holding::{Holding, HoldingPatch, NewHolding};
use crate::models::session::Session;
use crate::models::settings::StoreConfig;

const TABLE: &str = "portfolios";

/// REST client for the managed record store (PostgREST-style API).
///
/// Table `portfolios`: `id, user_id, ticker, quantity, purchase_price,
/// purchase_date`. Row-level security on the backend enforces per-user
/// access; this client forwards the anon key plus the session's bearer
/// token on every request.
pub struct RestHoldingsStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestHoldingsStore {
    pub fn new(config: &StoreConfig) -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{TABLE}", self.base_url)
    }

    fn request(
        &self,
        method: reqwest::Method,
        url: &str,
        session: &Session,
    ) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&session.access_token)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response.text().await.unwrap_or_default();
        Err(CoreError::Store(if detail.is_empty() {
            format!("request failed with status {status}")
        } else {
            format!("request failed with status {status}: {detail}")
        }))
    }
}

#[async_trait]
impl HoldingsStore for RestHoldingsStore {
    async fn list(&self, session: &Session) -> Result<Vec<Holding>, CoreError> {
        let user_filter = format!("eq.{}", session.user_id);
        let response = self
            .request(reqwest::Method::GET, &self.table_url(), session)
            .query(&[
                ("select", "*"),
                ("user_id", user_filter.as_str()),
                ("order", "ticker.asc"),
            ])
            .send()
            .await?;

        let holdings = Self::check_status(response)
            .await?
            .json::<Vec<Holding>>()
            .await
            .map_err(|e| CoreError::Deserialization(format!("holdings list: {e}")))?;
        Ok(holdings)
    }

    async fn insert(&self, session: &Session, holding: NewHolding) -> Result<Holding, CoreError> {
        let response = self
            .request(reqwest::Method::POST, &self.table_url(), session)
            // Ask the store to echo the inserted row back, id included
            .header("Prefer", "return=representation")
            .json(&holding)
            .send()
            .await?;

        let mut rows = Self::check_status(response)
            .await?
            .json::<Vec<Holding>>()
            .await
            .map_err(|e| CoreError::Deserialization(format!("inserted holding: {e}")))?;

        rows.pop()
            .ok_or_else(|| CoreError::Store("insert returned no row".into()))
    }

    async fn update(
        &self,
        session: &Session,
        id: Uuid,
        patch: HoldingPatch,
    ) -> Result<(), CoreError> {
        let id_filter = format!("eq.{id}");
        let response = self
            .request(reqwest::Method::PATCH, &self.table_url(), session)
            .query(&[("id", id_filter.as_str())])
            .json(&patch)
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn delete(&self, session: &Session, id: Uuid) -> Result<(), CoreError> {
        let id_filter = format!("eq.{id}");
        let response = self
            .request(reqwest::Method::DELETE, &self.table_url(), session)
            .query(&[("id", id_filter.as_str())])
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }
}
