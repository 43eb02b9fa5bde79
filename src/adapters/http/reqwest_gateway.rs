//! Reqwest-backed API gateway.
//!
//! Implements the `ApiGateway` port against the Farmart REST backend.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GatewayConfig::new("https://farmart-backend-k8f8.onrender.com")
//!     .with_connect_timeout(Duration::from_secs(10));
//! let gateway = ReqwestGateway::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::ports::{
    ApiError, ApiGateway, ConnectionError, FilePart, GatewayError, HttpMethod, MultipartForm,
};

/// Default backend the storefront talks to.
pub const DEFAULT_BASE_URL: &str = "https://farmart-backend-k8f8.onrender.com";

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Backend origin without a trailing slash.
    base_url: String,

    /// Connect timeout of the transport. Requests themselves are not timed out.
    connect_timeout: Duration,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// `ApiGateway` over HTTP.
#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    config: GatewayConfig,
    http_client: reqwest::Client,
}

impl ReqwestGateway {
    /// Build a gateway with its own connection pool.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn connection_error(method: HttpMethod, path: &str, err: reqwest::Error) -> GatewayError {
        tracing::error!(
            method = %method,
            path = %path,
            error = %err,
            connect = err.is_connect(),
            "Network error: could not reach the backend"
        );
        ConnectionError {
            method,
            path: path.to_string(),
            message: err.to_string(),
        }
        .into()
    }

    /// Turns a response into the gateway result. Failures are logged here and
    /// nowhere else.
    async fn read_response(
        method: HttpMethod,
        path: &str,
        response: Response,
    ) -> Result<Option<Value>, GatewayError> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::connection_error(method, path, e))?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<Value>(&bytes)
                .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
            let err = ApiError::new(status.as_u16(), detail);
            if status.is_server_error() {
                tracing::error!(method = %method, path = %path, status = status.as_u16(), detail = %err.detail, "API request failed");
            } else {
                tracing::warn!(method = %method, path = %path, status = status.as_u16(), detail = %err.detail, "API request rejected");
            }
            return Err(err.into());
        }

        if status == StatusCode::NO_CONTENT || bytes.is_empty() {
            return Ok(None);
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::debug!(method = %method, path = %path, error = %e, "Success body is not JSON");
                Ok(Some(Value::String(String::from_utf8_lossy(&bytes).into_owned())))
            }
        }
    }

    fn method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    fn file_part(file: FilePart) -> Part {
        let fallback = file.bytes.clone();
        let name = file.file_name.clone();
        Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime_type)
            .unwrap_or_else(|_| Part::bytes(fallback).file_name(name))
    }

    fn multipart(form: MultipartForm) -> (Form, Option<String>) {
        let mut out = Form::new();
        for (name, value) in form.fields {
            out = out.text(name, value);
        }
        let mut field = None;
        if let Some(file) = form.file {
            field = Some(file.field.clone());
            out = out.part(file.field.clone(), Self::file_part(file));
        }
        (out, field)
    }
}

#[async_trait]
impl ApiGateway for ReqwestGateway {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Result<Option<Value>, GatewayError> {
        let url = self.config.url(path);
        tracing::debug!(method = %method, path = %path, authenticated = token.is_some(), "API request");

        let mut builder = self
            .http_client
            .request(Self::method(method), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::connection_error(method, path, e))?;

        Self::read_response(method, path, response).await
    }

    async fn request_with_file(
        &self,
        method: HttpMethod,
        path: &str,
        form: MultipartForm,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        let url = self.config.url(path);
        let (form, file_field) = Self::multipart(form);
        tracing::debug!(method = %method, path = %path, file = ?file_field, "API upload");

        // The transport sets the multipart content type with its boundary.
        let mut builder = self
            .http_client
            .request(Self::method(method), &url)
            .header(ACCEPT, "application/json")
            .multipart(form);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::connection_error(method, path, e))?;

        Ok(Self::read_response(method, path, response)
            .await?
            .unwrap_or(Value::Null))
    }
}
