//! HTTP client for network-based API calls

use crate::{ClientConfig, ClientError, ClientResult, LoginResponse};
use reqwest::{Client, IntoUrl, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use shared::client::LoginRequest;
use shared::{BusinessProfile, Order, OrderLine, Product, StoreLinkRequest, StoredBill, UpdateItemsRequest};

/// HTTP client for making requests to the POS API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Base URL with `segments` appended, each percent-encoded
    ///
    /// Use for paths carrying caller-supplied ids.
    pub fn segment_url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Config(format!("Invalid base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("Base URL cannot take a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth_header() {
            Some(auth) => request.header(reqwest::header::AUTHORIZATION, auth),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.get_url(self.url(path)).await
    }

    async fn get_url<T: DeserializeOwned>(&self, url: impl IntoUrl) -> ClientResult<T> {
        let request = self.authorized(self.client.get(url));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<T> {
        let request = self.authorized(self.client.get(self.url(path)).query(query));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorized(self.client.post(self.url(path)).json(body));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body, ignoring the response body
    pub async fn put<B: serde::Serialize>(&self, path: &str, body: &B) -> ClientResult<()> {
        let request = self.authorized(self.client.put(self.url(path)).json(body));
        let response = request.send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Map a non-success status to a client error
    async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        tracing::debug!(status = %status, body = %text, "API request failed");
        Err(status_error(status, text))
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    // ========== Auth API ==========

    /// Login with email and password
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response: LoginResponse = self.post("/api/auth/login", &request).await?;
        if response.token.trim().is_empty() {
            return Err(ClientError::InvalidResponse("Missing login token".to_string()));
        }
        Ok(response)
    }

    // ========== Orders API ==========

    /// Fetch a single order
    pub async fn fetch_order(&self, order_id: &str) -> ClientResult<Order> {
        self.get_url(self.segment_url(&["api", "orders", order_id])?)
            .await
    }

    // ========== Bill API ==========

    /// Replace the order's line items
    pub async fn update_bill_items(&self, bill_id: u64, lines: &[OrderLine]) -> ClientResult<()> {
        let body = UpdateItemsRequest::from_lines(lines);
        self.put(&format!("/api/bill/{}/update-items", bill_id), &body)
            .await
    }

    /// Record the stored receipt link
    pub async fn store_bill_link(
        &self,
        bill_id: u64,
        link: &str,
        public_id: &str,
    ) -> ClientResult<()> {
        let body = StoreLinkRequest {
            bill_store_link: link.to_string(),
            cloudinary_public_id: public_id.to_string(),
        };
        self.put(&format!("/api/bill/{}/store-link", bill_id), &body)
            .await
    }

    /// Look up a previously stored receipt
    pub async fn fetch_stored_bill(&self, bill_id: u64) -> ClientResult<StoredBill> {
        self.get(&format!("/api/bill/{}", bill_id)).await
    }

    // ========== Catalog API ==========

    /// Purchasable dishes of a business
    pub async fn fetch_products(&self, business_id: &str) -> ClientResult<Vec<Product>> {
        self.get_with_query("/api/products", &[("businessId", business_id)])
            .await
    }

    /// Business name, theme and tagline
    pub async fn fetch_business(&self, business_id: &str) -> ClientResult<BusinessProfile> {
        self.get_url(self.segment_url(&["api", "business", business_id])?)
            .await
    }
}

fn status_error(status: StatusCode, text: String) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::FORBIDDEN => ClientError::Forbidden(text),
        StatusCode::NOT_FOUND => ClientError::NotFound(text),
        StatusCode::BAD_REQUEST => ClientError::Validation(text),
        _ => ClientError::Server {
            status: status.as_u16(),
            message: text,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = ClientConfig::new("http://localhost:5000/")
            .build_http_client()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(
            client.url("/api/orders/ORD-1"),
            "http://localhost:5000/api/orders/ORD-1"
        );
        assert_eq!(client.url("api/bill/1"), "http://localhost:5000/api/bill/1");
    }

    #[test]
    fn test_segment_url_encodes_ids() {
        let client = ClientConfig::new("http://localhost:5000/pos/")
            .build_http_client()
            .unwrap();
        let url = client.segment_url(&["api", "orders", "ORD/1?x#y"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/pos/api/orders/ORD%2F1%3Fx%23y"
        );

        let url = client.segment_url(&["api", "orders", "ORD-42"]).unwrap();
        assert_eq!(url.path(), "/pos/api/orders/ORD-42");
    }

    #[test]
    fn test_token_from_config() {
        let client = ClientConfig::new("http://localhost:5000")
            .with_token("abc")
            .with_timeout(5)
            .build_http_client()
            .unwrap();
        assert_eq!(client.token(), Some("abc"));
        assert_eq!(client.auth_header().as_deref(), Some("Bearer abc"));

        let anonymous = ClientConfig::default().build_http_client().unwrap();
        assert!(anonymous.token().is_none());
        assert_eq!(anonymous.with_token("t").token(), Some("t"));
    }

    #[test]
    fn test_status_mapping() {
        assert!(status_error(StatusCode::UNAUTHORIZED, String::new()).is_unauthorized());
        assert!(status_error(StatusCode::NOT_FOUND, "order".into()).is_not_found());
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, "bad".into()),
            ClientError::Validation(m) if m == "bad"
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "down".into()),
            ClientError::Server { status: 502, .. }
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_http_error() {
        let client = ClientConfig::new("http://127.0.0.1:9")
            .with_timeout(2)
            .build_http_client()
            .unwrap();
        let err = client.fetch_order("ORD-1").await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
