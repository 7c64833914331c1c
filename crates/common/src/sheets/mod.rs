//! Spreadsheet collaborator
//!
//! Read-only access to the lead sheet through the Google Sheets v4 API,
//! authenticated with a service account via the OAuth 2.0 JWT-bearer grant.

use crate::config::SheetsConfig;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

/// Read-only scope requested for the access token
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

/// Lifetime of the signed assertion, in seconds
const ASSERTION_TTL_SECS: i64 = 3600;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Trait for reading a rectangular grid of cells
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Read every row of the configured range. Rows may be ragged.
    async fn read_rows(&self) -> Result<Vec<Vec<String>>>;
}

/// Claims of the service account assertion
#[derive(Debug, Serialize)]
struct ServiceAccountClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Google Sheets client
pub struct GoogleSheetsClient {
    client: reqwest::Client,
    config: SheetsConfig,
}

impl GoogleSheetsClient {
    /// Create a new client
    pub fn new(config: SheetsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    /// Sign the JWT assertion exchanged for an access token
    fn sign_assertion(&self, now: i64) -> Result<String> {
        let claims = ServiceAccountClaims {
            iss: &self.config.service_account_email,
            scope: SHEETS_READONLY_SCOPE,
            aud: &self.config.token_url,
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        };

        let key = EncodingKey::from_rsa_pem(self.config.private_key.as_bytes()).map_err(|e| {
            AppError::Configuration {
                message: format!("Invalid service account private key: {}", e),
            }
        })?;

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key).map_err(|e| {
            AppError::Configuration {
                message: format!("Failed to sign service account assertion: {}", e),
            }
        })
    }

    async fn access_token(&self) -> Result<String> {
        let assertion = self.sign_assertion(chrono::Utc::now().timestamp())?;

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::SourceUnavailable {
                message: format!("Token exchange failed {}: {}", status, body),
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Build `{api_base}/spreadsheets/{id}/values/{range}` with each segment escaped
    fn values_url(&self) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.config.api_base).map_err(|e| {
            AppError::Configuration {
                message: format!("Invalid sheets api_base: {}", e),
            }
        })?;

        url.path_segments_mut()
            .map_err(|_| AppError::Configuration {
                message: "Sheets api_base cannot be a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend([
                "spreadsheets",
                self.config.sheet_id.as_str(),
                "values",
                self.config.range.as_str(),
            ]);

        Ok(url)
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsClient {
    async fn read_rows(&self) -> Result<Vec<Vec<String>>> {
        if !self.config.is_configured() {
            return Err(AppError::Configuration {
                message: "Sheet id and service account credentials must be set".to_string(),
            });
        }

        let token = self.access_token().await?;
        let url = self.values_url()?;

        let response = self.client.get(url).bearer_auth(token).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::SourceUnavailable {
                message: format!("Sheets API error {}: {}", status, body),
            });
        }

        let range: ValueRange = response.json().await?;
        Ok(range.values)
    }
}
