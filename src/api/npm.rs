use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::models::NpmCertificate;

use super::client::{ApiClient, ApiResult};

/// Client for the backend's Nginx Proxy Manager integration endpoints.
///
/// The backend brokers every call to the NPM instance itself; the bearer
/// token it obtains is stored server-side keyed by the NPM base URL and is
/// never returned to this client.
#[derive(Clone)]
pub struct NpmClient {
    client: ApiClient,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckConnectionPayload<'a> {
    api_url: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestTokenPayload<'a> {
    api_url: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValidateTokenResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    valid: bool,
    #[serde(default)]
    user: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CertificatesResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    certificates: Vec<NpmCertificate>,
}

/// Result of asking the backend whether its stored token still works.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenStatus {
    Valid { user: Option<String> },
    Invalid,
}

impl NpmClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Probe whether the NPM instance at `api_url` is reachable.
    pub async fn check_connection(&self, api_url: &str) -> ApiResult<()> {
        let response = self
            .client
            .request(Method::POST, "/api/integrations/npm/check-connection")
            .json(&CheckConnectionPayload { api_url })
            .send()
            .await?;
        let body: Envelope = ApiClient::read_json(response).await?;
        ApiClient::check(body.success, body.message)
    }

    /// Ask whether the server-side token for the configured NPM is valid.
    pub async fn validate_token(&self) -> ApiResult<TokenStatus> {
        let response = self
            .client
            .request(Method::GET, "/api/integrations/npm/validate-token")
            .send()
            .await?;
        let body: ValidateTokenResponse = ApiClient::read_json(response).await?;
        ApiClient::check(body.success, body.message)?;
        if body.valid {
            Ok(TokenStatus::Valid { user: body.user })
        } else {
            Ok(TokenStatus::Invalid)
        }
    }

    /// Exchange operator credentials for a token, stored server-side.
    /// Credentials are sent once and not retained here.
    pub async fn request_token(
        &self,
        api_url: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<()> {
        let response = self
            .client
            .request(Method::POST, "/api/integrations/npm/request-token")
            .json(&RequestTokenPayload {
                api_url,
                email,
                password,
            })
            .send()
            .await?;
        let body: Envelope = ApiClient::read_json(response).await?;
        ApiClient::check(body.success, body.message)
    }

    /// List the certificates the NPM instance manages.
    pub async fn certificates(&self) -> ApiResult<Vec<NpmCertificate>> {
        let response = self
            .client
            .request(Method::GET, "/api/integrations/npm/certificates")
            .send()
            .await?;
        let body: CertificatesResponse = ApiClient::read_json(response).await?;
        ApiClient::check(body.success, body.message)?;
        Ok(body.certificates)
    }
}
