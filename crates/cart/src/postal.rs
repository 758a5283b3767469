//! Postal code (CEP) lookup used to pre-fill the delivery address.
//!
//! The default implementation calls the public ViaCEP API:
//! `GET {base_url}/{cep}/json/`. An unknown CEP answers `200 OK` with
//! `{"erro": true}` (or `"true"` on newer deployments), which maps to
//! [`LookupError::NotFound`].

use std::future::Future;

use coffee_delivery_core::PostalCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::PostalLookupConfig;

/// Errors that can occur when looking up a postal code.
#[derive(Debug, Error)]
pub enum LookupError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status}")]
    Api { status: u16 },

    /// The postal code does not exist.
    #[error("Postal code not found: {0}")]
    NotFound(PostalCode),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Address fields resolved from a postal code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalAddress {
    pub postal_code: PostalCode,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    /// Two-letter state abbreviation (UF).
    pub state: String,
}

/// Resolves a postal code to an address.
pub trait PostalCodeLookup: Send + Sync {
    /// Look up `code`.
    fn lookup(
        &self,
        code: &PostalCode,
    ) -> impl Future<Output = Result<PostalAddress, LookupError>> + Send;
}

/// ViaCEP API client.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ViaCepClient {
    /// Create a new ViaCEP client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &PostalLookupConfig) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Request URL for `code`.
    #[must_use]
    pub fn url_for(&self, code: &PostalCode) -> String {
        format!(
            "{}/{}/json/",
            self.base_url.as_str().trim_end_matches('/'),
            code.as_str()
        )
    }
}

impl PostalCodeLookup for ViaCepClient {
    #[instrument(skip_all, fields(cep = %code))]
    async fn lookup(&self, code: &PostalCode) -> Result<PostalAddress, LookupError> {
        let response = self.client.get(self.url_for(code)).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Postal code lookup failed");
            return Err(LookupError::Api {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let address = parse_response(code, &body)?;
        tracing::debug!(city = %address.city, state = %address.state, "Postal code resolved");
        Ok(address)
    }
}

/// ViaCEP JSON body. Success and "not found" share the endpoint.
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    erro: Option<serde_json::Value>,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
}

impl ViaCepResponse {
    fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag == "true",
            _ => false,
        }
    }
}

/// Map a ViaCEP body onto a [`PostalAddress`].
///
/// # Errors
///
/// - [`LookupError::NotFound`] if the body carries the `erro` flag
/// - [`LookupError::Parse`] if the body is not the expected JSON
pub fn parse_response(code: &PostalCode, body: &str) -> Result<PostalAddress, LookupError> {
    let response: ViaCepResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Parse(e.to_string()))?;

    if response.is_not_found() {
        return Err(LookupError::NotFound(code.clone()));
    }

    Ok(PostalAddress {
        postal_code: code.clone(),
        street: response.logradouro,
        neighborhood: response.bairro,
        city: response.localidade,
        state: response.uf,
    })
}
