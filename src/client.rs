use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::models::*;

const PANTRY_PATH: &str = "/pantry";
const COMPATIBLE_PATH: &str = "/recipes/compatible";
const GENERATE_PATH: &str = "/diet/generate";

/// HTTP client for the diet service.
#[derive(Debug, Clone)]
pub struct PlannerClient {
    client: Client,
    base_url: String,
}

impl PlannerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("pantry-planner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| PlannerError::Transport {
                endpoint: "client setup",
                source,
            })?;
        Ok(Self::with_client(client, config.base_url.clone()))
    }

    /// Store a pantry on the server and get its id back.
    pub async fn create_pantry(&self, ingredient_ids: &[String]) -> Result<PantryRecord> {
        self.post(PANTRY_PATH, &json!({ "ingredient_ids": ingredient_ids }))
            .await
    }

    /// Ask the server to work out which recipes the pantry can cook.
    pub async fn compatible_recipes(&self, pantry_id: &str) -> Result<CompatibleRecipes> {
        self.post(COMPATIBLE_PATH, &json!({ "pantry_id": pantry_id }))
            .await
    }

    pub async fn generate_diet(&self, request: &DietRequest) -> Result<DietResult> {
        self.post(GENERATE_PATH, request).await
    }

    async fn post<B, T>(&self, endpoint: &'static str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        let transport = |source| PlannerError::Transport { endpoint, source };

        debug!("POST {}", url);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(PlannerError::RemoteCallFailed {
                endpoint,
                status,
                body,
            });
        }

        resp.json().await.map_err(transport)
    }
}
