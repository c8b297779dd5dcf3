//! Client for the event feed, health, and webhook endpoints.

use reqwest::Client;
use url::Url;

use super::{ClientError, parse_response};
use crate::objects::{CanonicalEvent, EVENT_HEADER, HealthResponse, WebhookResponse};

/// Typed HTTP client for a hookfeed server.
///
/// The dashboard polls [`recent_events`](FeedClient::recent_events) and
/// [`health`](FeedClient::health); [`send_webhook`](FeedClient::send_webhook)
/// replays a raw payload the way the hosting platform would deliver it.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: Client,
    base_url: Url,
}

impl FeedClient {
    /// Create a new `FeedClient` for the server at `base_url`
    /// (e.g. `http://localhost:5000`).
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `GET /api/events` – the most recent events, newest first.
    pub async fn recent_events(&self) -> Result<Vec<CanonicalEvent>, ClientError> {
        let url = self.endpoint("/api/events")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/health` – liveness probe.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = self.endpoint("/api/health")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `POST /webhook` – deliver a raw payload tagged with `event`.
    pub async fn send_webhook(
        &self,
        event: &str,
        payload: &serde_json::Value,
    ) -> Result<WebhookResponse, ClientError> {
        let url = self.endpoint("/webhook")?;
        let resp = self
            .http
            .post(url)
            .header(EVENT_HEADER, event)
            .json(payload)
            .send()
            .await?;
        parse_response(resp).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }
}
