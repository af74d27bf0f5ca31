use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Result, SsActivewearError};
use crate::models::{
    ErrorResponse, OrderRequest, OrderResponseContainer, OrderResponseShape, Product,
};
use crate::schema::WireModel;

pub const DEFAULT_BASE_URL: &str = "https://api.ssactivewear.com/v2";

/// Applied to every call except the catalog download.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The full catalog is a single large response.
pub const CATALOG_TIMEOUT: Duration = Duration::from_secs(500);

// ---------------------------------------------------------------------------
// Internal request handling
// ---------------------------------------------------------------------------

/// Shared logic for the configured [`Client`] and making requests.
struct BaseClient {
    base_url: String,
    http: Client,
    account_number: String,
    token: String,
    timeout: Duration,
}

impl BaseClient {
    /// Build the full URL for a given endpoint.
    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    /// Send one authenticated request and return the body of a 2xx answer.
    fn send(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        json: Option<&Value>,
        timeout: Option<Duration>,
    ) -> Result<String> {
        let timeout = timeout.unwrap_or(self.timeout);
        debug!(%method, endpoint, timeout_secs = timeout.as_secs(), "sending request");

        let mut request = self
            .http
            .request(method, self.url(endpoint))
            .basic_auth(&self.account_number, Some(&self.token))
            .timeout(timeout);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = json {
            request = request.json(body);
        }

        self.handle_response(request.send()?)
    }

    /// Status-code → error mapping.
    fn handle_response(&self, response: Response) -> Result<String> {
        let status = response.status();
        let body = response.text()?;
        debug!(status = status.as_u16(), bytes = body.len(), "received response");

        if status == StatusCode::BAD_REQUEST {
            let error_response = ErrorResponse::from_json(&body)?;
            warn!(
                code = %error_response.code,
                message = %error_response.message,
                field_errors = error_response.errors.len(),
                "request rejected"
            );
            return Err(SsActivewearError::BadRequest {
                message: error_response.message.clone(),
                response: error_response,
            });
        }

        if !status.is_success() {
            warn!(status = status.as_u16(), "request failed");
            return Err(SsActivewearError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

// ---------------------------------------------------------------------------
// Credential checks
// ---------------------------------------------------------------------------

/// Account numbers are integers, optionally signed and padded with spaces.
/// Single underscores may group digits (`1_000`).
fn check_account_number(account_number: &str) -> Result<()> {
    let trimmed = account_number.trim();
    let digits = trimmed
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(trimmed);
    let well_formed = digits
        .split('_')
        .all(|group| !group.is_empty() && group.bytes().all(|b| b.is_ascii_digit()));
    if !well_formed {
        return Err(SsActivewearError::InvalidAccountNumber(
            account_number.to_string(),
        ));
    }
    Ok(())
}

fn check_token(token: &str) -> Result<()> {
    Uuid::parse_str(token)
        .map(|_| ())
        .map_err(|source| SsActivewearError::InvalidToken { source })
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures an [`SsActivewearClient`].
///
/// ```no_run
/// use std::time::Duration;
/// use ssactivewear_client::SsActivewearClient;
///
/// let client = SsActivewearClient::builder("123456", "4d7a3c4e-5d0b-4f4e-9a8e-0e6f1b2c3d4e")
///     .timeout(Duration::from_secs(60))
///     .build()
///     .unwrap();
/// ```
pub struct ClientBuilder {
    account_number: String,
    token: String,
    base_url: String,
    timeout: Duration,
    catalog_timeout: Duration,
    user_agent: String,
}

impl ClientBuilder {
    fn new(account_number: &str, token: &str) -> Self {
        Self {
            account_number: account_number.to_string(),
            token: token.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            catalog_timeout: CATALOG_TIMEOUT,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
        }
    }

    /// API root, e.g. `https://api.ssactivewear.com/v2`.
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Timeout of [`SsActivewearClient::products`].
    pub fn catalog_timeout(mut self, timeout: Duration) -> Self {
        self.catalog_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Validate the credentials and create the HTTP client.
    pub fn build(self) -> Result<SsActivewearClient> {
        check_account_number(&self.account_number)?;
        check_token(&self.token)?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http = Client::builder()
            .default_headers(headers)
            .user_agent(self.user_agent)
            .build()?;

        Ok(SsActivewearClient {
            base: BaseClient {
                base_url: self.base_url,
                http,
                account_number: self.account_number,
                token: self.token,
                timeout: self.timeout,
            },
            catalog_timeout: self.catalog_timeout,
        })
    }
}

// ---------------------------------------------------------------------------
// Public client
// ---------------------------------------------------------------------------

/// Main entry point for the S&S Activewear API.
///
/// Each call is one blocking round trip; nothing is cached or retried.
///
/// ```no_run
/// use ssactivewear_client::SsActivewearClient;
///
/// let client =
///     SsActivewearClient::new("123456", "4d7a3c4e-5d0b-4f4e-9a8e-0e6f1b2c3d4e").unwrap();
/// for product in client.products().unwrap().iter().take(3) {
///     println!("{} {} ({})", product.brand_name, product.style_name, product.quantity);
/// }
/// ```
pub struct SsActivewearClient {
    base: BaseClient,
    catalog_timeout: Duration,
}

impl SsActivewearClient {
    /// Create a client for the production API.
    ///
    /// * `account_number` – numeric S&S account number (basic auth user)
    /// * `token`          – API key, a UUID (basic auth password)
    pub fn new(account_number: &str, token: &str) -> Result<Self> {
        Self::builder(account_number, token).build()
    }

    pub fn builder(account_number: &str, token: &str) -> ClientBuilder {
        ClientBuilder::new(account_number, token)
    }

    pub fn base_url(&self) -> &str {
        &self.base.base_url
    }

    pub fn account_number(&self) -> &str {
        &self.base.account_number
    }

    /// Download the whole catalog (`GET /products`).
    pub fn products(&self) -> Result<Vec<Product>> {
        let body = self.base.send(
            Method::GET,
            "/products",
            &[],
            None,
            Some(self.catalog_timeout),
        )?;
        let products = Product::list_from_json(&body)?;
        debug!(count = products.len(), "decoded catalog");
        Ok(products)
    }

    /// Place an order (`POST /orders`).
    ///
    /// The request is checked against its schema first; an invalid request
    /// never reaches the network. Unset optional fields are left out of the
    /// body.
    pub fn submit_order(&self, request: &OrderRequest) -> Result<OrderResponseContainer> {
        request.validate()?;
        let payload = request.to_value()?;

        let body = self
            .base
            .send(Method::POST, "/orders", &[], Some(&payload), None)?;

        let container = OrderResponseShape::for_request(request).decode(&body)?;
        debug!(
            orders = container.orders.len(),
            line_errors = container.line_errors.len(),
            "decoded order response"
        );
        Ok(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_number_must_be_numeric() {
        assert!(check_account_number("123456").is_ok());
        assert!(check_account_number(" 42 ").is_ok());
        assert!(check_account_number("-7").is_ok());
        assert!(check_account_number("1_000").is_ok());
        assert!(check_account_number("+12_345_6").is_ok());

        for bad in ["", " ", "+", "12a", "1.5", "abc", "_1", "1_", "1__0", "-_1", "_"] {
            let err = check_account_number(bad).unwrap_err();
            assert!(err.to_string().contains("Account number"), "{bad:?}");
        }
    }

    #[test]
    fn token_must_be_a_uuid() {
        assert!(check_token("4d7a3c4e-5d0b-4f4e-9a8e-0e6f1b2c3d4e").is_ok());
        assert!(check_token("4d7a3c4e5d0b4f4e9a8e0e6f1b2c3d4e").is_ok());

        for bad in ["", "not-a-token", "4d7a3c4e-5d0b-4f4e-9a8e"] {
            let err = check_token(bad).unwrap_err();
            assert!(err.to_string().contains("Token"), "{bad:?}");
        }
    }

    #[test]
    fn builder_strips_trailing_slash() {
        let client = SsActivewearClient::builder("1", "4d7a3c4e-5d0b-4f4e-9a8e-0e6f1b2c3d4e")
            .base_url("http://localhost:8080/v2/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/v2");
        assert_eq!(client.base.url("/products"), "http://localhost:8080/v2/products");
    }

    #[test]
    fn defaults_to_production_api() {
        let client = SsActivewearClient::new("1", "4d7a3c4e-5d0b-4f4e-9a8e-0e6f1b2c3d4e").unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.account_number(), "1");
        assert_eq!(client.catalog_timeout, CATALOG_TIMEOUT);
    }
}
