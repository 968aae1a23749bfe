//! HTTP transport seam.
//!
//! The engine only needs "send this request, give me status and body". The
//! production implementation wraps a `reqwest::Client`; tests script
//! responses through [`MockTransport`](super::MockTransport).

use std::future::Future;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};

use super::config::RzdConfig;
use super::error::{RzdError, TransportError};
use super::request::{Method, RequestDescriptor};

/// Status and raw body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns whatever came back.
///
/// Non-2xx statuses are returned as responses, not errors; the engine
/// decides what they mean.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &RequestDescriptor,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        request: &RequestDescriptor,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).send(request)
    }
}

/// Transport backed by `reqwest`.
///
/// The client keeps a cookie store: the service ties a session token to the
/// session cookie issued alongside the challenge.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &RzdConfig) -> Result<Self, RzdError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| RzdError::Config(format!("invalid user agent: {e}")))?,
        );
        headers.insert(
            REFERER,
            HeaderValue::from_str(&config.base_path)
                .map_err(|e| RzdError::Config(format!("invalid base path header: {e}")))?,
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .cookie_store(true);

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| RzdError::Config(format!("invalid proxy {proxy:?}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| RzdError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        request: &RequestDescriptor,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        let builder = match request.method() {
            Method::Get => self.http.get(request.url().clone()).query(request.params()),
            Method::Post => self.http.post(request.url().clone()).form(request.params()),
        };

        async move {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?.to_vec();
            Ok(HttpResponse { status, body })
        }
    }
}
