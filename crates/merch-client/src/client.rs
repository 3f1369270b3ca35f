//! Merch shop HTTP client implementation.

use reqwest::{Client, Url};
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, AuthRequest, AuthResponse, BuyResponse, InfoResponse, SendCoinRequest,
    SendCoinResponse,
};

/// Merch shop API client.
#[derive(Debug, Clone)]
pub struct MerchClient {
    client: Client,
    base_url: String,
}

impl MerchClient {
    /// Create a new merch client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the merch service (e.g., `"http://merch-shop:8080"`)
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new merch client with custom options.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Sign in, registering the user on first use, and return a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthorized` on a wrong password, or another
    /// error if the request fails.
    pub async fn authenticate(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<String, ClientError> {
        let url = format!("{}/api/auth", self.base_url);
        let request = AuthRequest {
            username: username.into(),
            password: password.into(),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let auth: AuthResponse = self.handle_response(response).await?;
        Ok(auth.token)
    }

    /// Buy one unit of `item`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InsufficientFunds` if the balance is too low, or
    /// another error if the request fails.
    pub async fn buy(&self, token: &str, item: &str) -> Result<BuyResponse, ClientError> {
        let url = self.endpoint(&["api", "buy", item])?;

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Join percent-encoded path segments onto the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Configuration(format!("invalid base URL: {e}")))?;

        url.path_segments_mut()
            .map_err(|()| ClientError::Configuration("base URL cannot take path segments".into()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Send `amount` coins to `to_user`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InsufficientFunds` if the balance is too low, or
    /// another error if the request fails.
    pub async fn send_coins(
        &self,
        token: &str,
        to_user: impl Into<String>,
        amount: i64,
    ) -> Result<SendCoinResponse, ClientError> {
        let url = format!("{}/api/sendCoin", self.base_url);
        let request = SendCoinRequest {
            to_user: to_user.into(),
            amount,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get balance, inventory and coin history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn info(&self, token: &str) -> Result<InfoResponse, ClientError> {
        let url = format!("{}/api/info", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        let Ok(api_error) = error_body else {
            tracing::debug!(status = %status, "Unparseable error response");
            return Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            });
        };

        let detail = |key: &str| {
            api_error
                .error
                .details
                .as_ref()
                .and_then(|d| d.get(key))
                .and_then(serde_json::Value::as_i64)
                .unwrap_or(0)
        };

        // Map specific error codes to typed errors
        match api_error.error.code.as_str() {
            "insufficient_funds" => Err(ClientError::InsufficientFunds {
                balance: detail("balance"),
                required: detail("required"),
            }),
            "unauthorized" | "invalid_credentials" => Err(ClientError::Unauthorized {
                message: api_error.error.message.clone(),
            }),
            code => Err(ClientError::Api {
                code: code.to_string(),
                message: api_error.error.message.clone(),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = MerchClient::new("http://localhost:8080").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = MerchClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn endpoint_encodes_reserved_characters() {
        let client = MerchClient::new("http://localhost:8080/").unwrap();
        let url = client.endpoint(&["api", "buy", "a/b?c#d"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/buy/a%2Fb%3Fc%23d");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client = MerchClient::new("http://localhost:8080/shop").unwrap();
        let url = client.endpoint(&["api", "buy", "cup"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/shop/api/buy/cup");
    }

    #[test]
    fn endpoint_rejects_invalid_base_url() {
        let client = MerchClient::new("not a url").unwrap();
        let result = client.endpoint(&["api", "buy", "cup"]);
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }

    #[test]
    fn client_options() {
        let options = ClientOptions { timeout_seconds: 5 };
        let client = MerchClient::with_options("http://localhost:8080", options).unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
