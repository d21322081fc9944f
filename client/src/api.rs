//! # Storefront API
//!
//! Thin REST client, everything is JSON.
//!
//! ## Endpoints
//! - `GET /products`: full catalog
//! - `GET /products/search?value=`: filtered catalog, 404 when nothing matches
//! - `GET /cart`, `POST /cart {productId, qty}`: sparse cart, bearer token required
//! - `POST /auth/login`, `POST /auth/register`: `{username, password}`
//!
//! Failures come back as `{success: false, message}`.
use std::time::Duration;

use qkart::{CartEntry, CatalogItem, Credentials};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{error::AppError, session::Session};

#[derive(Deserialize)]
struct Failure {
    message: String,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    endpoint: String,
}

impl ApiClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn products(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.fetch(self.http.get(self.url("/products"))).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, AppError> {
        let request = self
            .http
            .get(self.url("/products/search"))
            .query(&[("value", query)]);

        self.fetch(request).await
    }

    pub async fn cart(&self, session: &Session) -> Result<Vec<CartEntry>, AppError> {
        let request = self.http.get(self.url("/cart")).bearer_auth(&session.token);

        self.fetch(request).await
    }

    /// Sets the quantity of one line, returning the whole cart as the store now holds it.
    pub async fn update_cart(
        &self,
        session: &Session,
        entry: &CartEntry,
    ) -> Result<Vec<CartEntry>, AppError> {
        let request = self
            .http
            .post(self.url("/cart"))
            .bearer_auth(&session.token)
            .json(entry);

        self.fetch(request).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AppError> {
        self.fetch(self.http.post(self.url("/auth/login")).json(credentials)).await
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<(), AppError> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(credentials)
            .send()
            .await?;

        check(response).await.map(|_| ())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let response = check(request.send().await?).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(AppError::MalformedPayload)
    }
}

async fn check(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!("Backend answered {status}: {body}");

    let message = serde_json::from_str::<Failure>(&body)
        .map(|failure| failure.message)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Request failed").to_string());

    Err(AppError::Status { status, message })
}
