use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::actions::DeployAction;
use crate::models::{DockerInventory, NpmSettings};

use super::client::{ApiClient, ApiResult};
use super::fingerprint::encode_fingerprint;

/// Typed client for the deploy-actions surface of the backend.
#[derive(Clone)]
pub struct DeployClient {
    client: ApiClient,
}

#[derive(Debug, Deserialize)]
struct SaveResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Outcome of a single-action test run.
#[derive(Debug, Clone, Deserialize)]
pub struct TestOutcome {
    pub success: bool,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Report from the bulk-execute endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteReport {
    pub success: bool,
    pub actions_executed: usize,
    pub actions_succeeded: usize,
    #[serde(default)]
    pub results: Vec<ExecutionResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionResult {
    #[serde(default)]
    pub name: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
struct TogglePayload {
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct DeploymentSettingsResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    deployment: DeploymentSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentSettings {
    #[serde(default)]
    nginx_proxy_manager: NpmSettings,
}

impl DeployClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn actions_path(fingerprint: &str) -> String {
        format!(
            "/api/certificates/{}/deploy-actions",
            encode_fingerprint(fingerprint)
        )
    }

    fn action_path(fingerprint: &str, index: usize) -> String {
        format!("{}/{}", Self::actions_path(fingerprint), index)
    }

    /// Fetch the ordered action list for a certificate.
    pub async fn list(&self, fingerprint: &str) -> ApiResult<Vec<DeployAction>> {
        let response = self
            .client
            .request(Method::GET, &Self::actions_path(fingerprint))
            .send()
            .await?;
        ApiClient::read_json(response).await
    }

    /// Append a new action.
    pub async fn create(&self, fingerprint: &str, action: &DeployAction) -> ApiResult<()> {
        let response = self
            .client
            .request(Method::POST, &Self::actions_path(fingerprint))
            .json(action)
            .send()
            .await?;
        let body: SaveResponse = ApiClient::read_json(response).await?;
        ApiClient::check(body.success, body.message)
    }

    /// Replace the action at an index.
    pub async fn update(
        &self,
        fingerprint: &str,
        index: usize,
        action: &DeployAction,
    ) -> ApiResult<()> {
        let response = self
            .client
            .request(Method::PUT, &Self::action_path(fingerprint, index))
            .json(action)
            .send()
            .await?;
        let body: SaveResponse = ApiClient::read_json(response).await?;
        ApiClient::check(body.success, body.message)
    }

    /// Delete the action at an index; the server compacts the list.
    pub async fn delete(&self, fingerprint: &str, index: usize) -> ApiResult<()> {
        let response = self
            .client
            .request(Method::DELETE, &Self::action_path(fingerprint, index))
            .send()
            .await?;
        let body: SaveResponse = ApiClient::read_json(response).await?;
        ApiClient::check(body.success, body.message)
    }

    /// Run the server-side test for one action.
    pub async fn test(&self, fingerprint: &str, index: usize) -> ApiResult<TestOutcome> {
        let path = format!("{}/test", Self::action_path(fingerprint, index));
        let response = self.client.request(Method::POST, &path).send().await?;
        ApiClient::read_json(response).await
    }

    /// Enable or disable one action.
    pub async fn toggle(
        &self,
        fingerprint: &str,
        index: usize,
        enabled: bool,
    ) -> ApiResult<()> {
        let path = format!("{}/toggle", Self::action_path(fingerprint, index));
        let response = self
            .client
            .request(Method::POST, &path)
            .json(&TogglePayload { enabled })
            .send()
            .await?;
        let body: SaveResponse = ApiClient::read_json(response).await?;
        ApiClient::check(body.success, body.message)
    }

    /// Execute every enabled action in list order.
    pub async fn execute_all(&self, fingerprint: &str) -> ApiResult<ExecuteReport> {
        let path = format!("{}/execute", Self::actions_path(fingerprint));
        let response = self.client.request(Method::POST, &path).send().await?;
        ApiClient::read_json(response).await
    }

    /// Persist a reorder by rewriting the actions whose index changed.
    ///
    /// The surface has no bulk endpoint, so the slice between the old and new
    /// position is PUT one index at a time, in order. Callers reload on any
    /// failure, which doubles as the revert path.
    pub async fn persist_order(
        &self,
        fingerprint: &str,
        actions: &[DeployAction],
        from: usize,
        to: usize,
    ) -> ApiResult<()> {
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        for index in lo..=hi {
            self.update(fingerprint, index, &actions[index]).await?;
        }
        Ok(())
    }

    /// Containers the server can see, for the docker-restart completions.
    pub async fn docker_containers(&self) -> ApiResult<DockerInventory> {
        let response = self
            .client
            .request(Method::GET, "/api/docker/containers")
            .send()
            .await?;
        ApiClient::read_json(response).await
    }

    /// Stored NPM connection defaults.
    pub async fn deployment_settings(&self) -> ApiResult<NpmSettings> {
        let response = self
            .client
            .request(Method::GET, "/api/settings/deployment")
            .send()
            .await?;
        let body: DeploymentSettingsResponse = ApiClient::read_json(response).await?;
        ApiClient::check(body.success, body.message)?;
        Ok(body.deployment.nginx_proxy_manager)
    }
}
