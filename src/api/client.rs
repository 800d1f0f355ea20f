//! HTTP client for the visit service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{CareQueueError, Result};
use crate::schemas::{
    Config, HandoffRequest, Invoice, LoginResponse, NewVisit, Payment, QueuePage, Role, Stage,
    Staff, Visit,
};

use super::VisitApi;

/// JSON client for the visit REST API.
pub struct HttpVisitApi {
    base_url: String,
    base: Url,
    client: reqwest::Client,
    token: Option<String>,
    timeout_secs: u64,
}

impl HttpVisitApi {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .map_err(|e| CareQueueError::ConfigError(format!("API URL {}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(CareQueueError::ConfigError(format!(
                "API URL {} cannot take paths",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CareQueueError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            base,
            client,
            token: None,
            timeout_secs,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_base_url, config.timeout_seconds as u64)
    }

    /// Authenticate subsequent requests with a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join `segments` onto the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> CareQueueError {
        if e.is_timeout() {
            CareQueueError::Timeout(format!("no response after {}s", self.timeout_secs))
        } else if e.is_connect() {
            CareQueueError::Network(format!("cannot reach {}", self.base_url))
        } else {
            CareQueueError::Network(e.to_string())
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, what: &str) -> Result<T> {
        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        decode(response, what).await
    }

    async fn send_json<B: Serialize + ?Sized + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: &B,
        what: &str,
    ) -> Result<T> {
        tracing::debug!(%method, path = url.path(), "Sending {}", what);
        self.send(self.request(method, url).json(body), what).await
    }

    async fn get<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
        tracing::debug!(path = url.path(), "Fetching {}", what);
        self.send(self.request(Method::GET, url), what).await
    }
}

/// Responses arrive either bare or wrapped in `{"data": ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
}

/// Extract the human-readable message from an error response body.
fn error_message(body: &str, status: u16) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => format!("HTTP {}", status),
    }
}

async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| CareQueueError::Network(format!("reading {}: {}", what, e)))?;

    if !status.is_success() {
        let message = error_message(&body, status.as_u16());
        tracing::warn!(status = status.as_u16(), "{} rejected: {}", what, message);
        return Err(CareQueueError::from_status(status.as_u16(), message));
    }

    parse_body(&body, what)
}

fn parse_body<T: DeserializeOwned>(body: &str, what: &str) -> Result<T> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(Envelope::into_inner)
        .map_err(|e| CareQueueError::MalformedResponse(format!("{} response: {}", what, e)))
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[async_trait]
impl VisitApi for HttpVisitApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let body = LoginBody { email, password };
        self.send_json(Method::POST, self.url(&["auth", "login"]), &body, "login")
            .await
    }

    async fn queue(&self, stage: Stage, page: u32, limit: u32) -> Result<QueuePage> {
        let mut url = self.url(&["visits", "queue", stage.as_str()]);
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());
        self.get(url, "queue").await
    }

    async fn get_visit(&self, visit_id: &str) -> Result<Visit> {
        self.get(self.url(&["visits", visit_id]), "visit").await
    }

    async fn create_visit(&self, new_visit: &NewVisit) -> Result<Visit> {
        self.send_json(Method::POST, self.url(&["visits"]), new_visit, "visit registration")
            .await
    }

    async fn update_visit(&self, visit_id: &str, fields: serde_json::Value) -> Result<Visit> {
        self.send_json(
            Method::PATCH,
            self.url(&["visits", visit_id]),
            &fields,
            "visit update",
        )
        .await
    }

    async fn clock_in(&self, visit_id: &str, stage: Stage) -> Result<Visit> {
        let url = self.url(&["visits", visit_id, stage.as_str(), "clock-in"]);
        self.send_json(Method::POST, url, &serde_json::json!({}), "clock-in")
            .await
    }

    async fn record_stage(
        &self,
        visit_id: &str,
        stage: Stage,
        payload: serde_json::Value,
    ) -> Result<Visit> {
        let url = self.url(&["visits", visit_id, stage.as_str()]);
        self.send_json(Method::PUT, url, &payload, "stage data").await
    }

    async fn handoff(&self, request: &HandoffRequest) -> Result<Visit> {
        let url = self.url(&["visits", &request.visit_id, "handoff"]);
        self.send_json(Method::POST, url, request, "handoff").await
    }

    async fn list_staff(&self, role: Role) -> Result<Vec<Staff>> {
        let mut url = self.url(&["users"]);
        url.query_pairs_mut().append_pair("role", role.as_str());
        self.get(url, "staff list").await
    }

    async fn list_doctors(&self) -> Result<Vec<Staff>> {
        self.get(self.url(&["users", "doctors"]), "doctor list").await
    }

    async fn get_invoice(&self, visit_id: &str) -> Result<Invoice> {
        self.get(self.url(&["invoices", "visit", visit_id]), "invoice")
            .await
    }

    async fn record_payment(&self, invoice_id: &str, payment: &Payment) -> Result<Invoice> {
        let url = self.url(&["invoices", invoice_id, "payments"]);
        self.send_json(Method::POST, url, payment, "payment").await
    }
}
