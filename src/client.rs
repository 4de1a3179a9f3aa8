use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::observability;
use crate::types::{ChatRequest, ChatResponse, ResetResponse};

const DEFAULT_BASE_URL: &str = "http://localhost:8000/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// The chat backend as seen by the conversation controller.
///
/// The controller only ever sends one message at a time and resets; this
/// trait is the seam that lets tests drive the controller with a scripted
/// backend instead of a live server.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Send one user message and return the bot's reply.
    async fn send_message(&self, message: &str) -> Result<ChatResponse>;

    /// Ask the backend to drop its conversation history.
    async fn reset(&self) -> Result<()>;
}

/// HTTP client for the chat backend.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
}

impl ChatClient {
    /// Create a new chat client.
    ///
    /// The base URL defaults to `http://localhost:8000/` when not provided.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Returns the backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Create and return default headers for backend requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Convert a reqwest send failure (no response received) to our Error type.
    fn process_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Process backend response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        // FastAPI-style error bodies carry a "detail" field
        #[derive(Deserialize)]
        struct ErrorResponse {
            detail: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let error_message = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.detail)
            .unwrap_or(error_body);

        // Map HTTP status code to appropriate error type
        match status_code {
            500 => Error::internal_server(error_message),
            502..=504 => Error::service_unavailable(error_message),
            _ => Error::api(status_code, error_message),
        }
    }
}

#[async_trait::async_trait]
impl Backend for ChatClient {
    /// Send one user message via `POST /chat` and parse the reply.
    async fn send_message(&self, message: &str) -> Result<ChatResponse> {
        let url = self.base_url.join("chat")?;
        observability::CLIENT_REQUESTS.click();

        let response = self
            .client
            .post(url)
            .headers(self.default_headers())
            .json(&ChatRequest::new(message))
            .send()
            .await
            .map_err(|e| {
                observability::CLIENT_REQUEST_ERRORS.click();
                self.process_send_error(e)
            })?;

        if !response.status().is_success() {
            observability::CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        response.json::<ChatResponse>().await.map_err(|e| {
            observability::CLIENT_REQUEST_ERRORS.click();
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Drop the backend's conversation history via `POST /chat/reset`.
    ///
    /// Any 2xx counts as success; the response body is ignored.
    async fn reset(&self) -> Result<()> {
        let url = self.base_url.join("chat/reset")?;
        observability::CLIENT_REQUESTS.click();

        let response = self
            .client
            .post(url)
            .headers(self.default_headers())
            .send()
            .await
            .map_err(|e| {
                observability::CLIENT_REQUEST_ERRORS.click();
                self.process_send_error(e)
            })?;

        if !response.status().is_success() {
            observability::CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        if let Ok(confirmation) = response.json::<ResetResponse>().await {
            tracing::debug!(message = %confirmation.message, "backend confirmed reset");
        }
        Ok(())
    }
}

/// Parse and normalize a base URL so endpoint joins append path segments.
fn normalize_base_url(base_url: &str) -> Result<Url> {
    let base_url = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };
    let url = Url::parse(&base_url)?;
    if url.cannot_be_a_base() {
        return Err(Error::url(
            format!("base URL cannot carry endpoint paths: {}", url),
            None,
        ));
    }
    Ok(url)
}
