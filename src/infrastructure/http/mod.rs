// src/infrastructure/http/mod.rs
// REST backend for the menu and order endpoints

use async_trait::async_trait;
use hyper::body::Bytes;
use hyper::client::HttpConnector;
use hyper::header::{ACCEPT, CONTENT_TYPE};
use hyper::{Body, Client, Method, Request, StatusCode, Uri};
use hyper_tls::HttpsConnector;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::application::dto::parser::{parse_error_messages, parse_json};
use crate::application::dto::PlaceOrderResponse;
use crate::config::ApiConfig;
use crate::domain::errors::{AppResult, BackendError, BackendResult};
use crate::domain::models::{Catalog, OrderDraft, PlacedOrder};
use crate::domain::repository::{MenuRepository, OrderRepository};

pub struct HttpBackend {
    client: Client<HttpsConnector<HttpConnector>>,
    base_url: Url,
    timeout: Option<Duration>,
}

impl HttpBackend {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let base_url = config.parsed_base_url()?;
        let client = Client::builder().build::<_, Body>(HttpsConnector::new());

        Ok(Self {
            client,
            base_url,
            timeout: config.request_timeout_secs.map(Duration::from_secs),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> BackendResult<Uri> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                BackendError::InvalidRequest(format!("Base URL cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);

        url.as_str()
            .parse::<Uri>()
            .map_err(|e| BackendError::InvalidRequest(format!("{}: {}", url, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> BackendResult<T> {
        let uri = self.endpoint(segments)?;
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(ACCEPT, "application/json")
            .body(Body::empty())
            .map_err(|e| BackendError::InvalidRequest(e.to_string()))?;

        let body = self.send(request).await?;
        parse_json(&body)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        payload: &B,
    ) -> BackendResult<T> {
        let uri = self.endpoint(segments)?;
        let json = serde_json::to_vec(payload)
            .map_err(|e| BackendError::InvalidRequest(format!("Failed to encode body: {}", e)))?;
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json))
            .map_err(|e| BackendError::InvalidRequest(e.to_string()))?;

        let body = self.send(request).await?;
        parse_json(&body)
    }

    /// Sends a request and returns the body of a 2xx response
    async fn send(&self, request: Request<Body>) -> BackendResult<Bytes> {
        let method = request.method().clone();
        let uri = request.uri().clone();
        log::debug!("{} {}", method, uri);

        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| BackendError::Connection(e.to_string()))?;
            let status = response.status();
            let body = hyper::body::to_bytes(response.into_body())
                .await
                .map_err(|e| BackendError::Connection(e.to_string()))?;
            Ok::<(StatusCode, Bytes), BackendError>((status, body))
        };

        let (status, body) = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange).await.map_err(|_| {
                BackendError::Connection(format!("timeout of {}s exceeded", limit.as_secs()))
            })??,
            None => exchange.await?,
        };

        if status.is_success() {
            log::debug!("{} {} -> {}", method, uri, status);
            return Ok(body);
        }

        log::warn!("{} {} -> {}", method, uri, status);
        Err(BackendError::Status {
            status: status.as_u16(),
            errors: parse_error_messages(&body),
        })
    }
}

#[async_trait]
impl MenuRepository for HttpBackend {
    async fn fetch_catalog(&self) -> BackendResult<Catalog> {
        self.get_json(&["menu", "categories"]).await
    }
}

#[async_trait]
impl OrderRepository for HttpBackend {
    async fn place_order(&self, draft: &OrderDraft) -> BackendResult<PlacedOrder> {
        let response: PlaceOrderResponse = self.post_json(&["orders"], draft).await?;
        Ok(response.data)
    }

    async fn orders_for_phone(&self, phone_number: &str) -> BackendResult<Vec<PlacedOrder>> {
        self.get_json(&["orders", phone_number]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base_url: &str) -> HttpBackend {
        HttpBackend::new(&ApiConfig {
            base_url: base_url.to_string(),
            request_timeout_secs: None,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments_onto_base_path() {
        let api = backend("http://localhost:3000/api");
        assert_eq!(
            api.endpoint(&["menu", "categories"]).unwrap().to_string(),
            "http://localhost:3000/api/menu/categories"
        );

        let trailing = backend("http://localhost:3000/api/");
        assert_eq!(
            trailing.endpoint(&["orders"]).unwrap().to_string(),
            "http://localhost:3000/api/orders"
        );
    }

    #[test]
    fn test_endpoint_encodes_raw_phone_input() {
        let api = backend("http://localhost:3000/api");
        let uri = api.endpoint(&["orders", "(123) 456/7890"]).unwrap();
        assert_eq!(
            uri.to_string(),
            "http://localhost:3000/api/orders/(123)%20456%2F7890"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_connection_error() {
        // nothing listens on the loopback discard port
        let api = backend("http://127.0.0.1:9/api");
        let result = api.fetch_catalog().await;
        assert!(matches!(result, Err(BackendError::Connection(_))));
    }
}
