//! JSON HTTP client with retry and exponential backoff.

use crate::error::{ClaimError, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Thin wrapper over `reqwest` used by the weather and summary collaborators.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(request_timeout: Duration, max_retries: u32) -> Result<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            max_retries,
        })
    }

    /// GET `url` with query parameters and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        let req = self.client.get(url).query(query);
        let resp = self.execute_with_retry(req).await?;
        Self::decode(url, resp).await
    }

    /// POST a JSON body, optionally with a bearer token, and decode the reply.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        bearer: Option<&str>,
        body: &B,
    ) -> Result<T> {
        let mut req = self.client.post(url).json(body);
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        let resp = self.execute_with_retry(req).await?;
        Self::decode(url, resp).await
    }

    async fn decode<T: DeserializeOwned>(url: &str, resp: Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            return Err(ClaimError::Provider(format!("HTTP {} from {}", status, url)));
        }
        Ok(resp.json::<T>().await?)
    }

    /// Execute a request, retrying transient failures with exponential backoff.
    async fn execute_with_retry(&self, request: RequestBuilder) -> Result<Response> {
        let mut attempt = 0u32;
        loop {
            let Some(cloned) = request.try_clone() else {
                return Ok(request.send().await?);
            };
            let outcome = cloned.send().await;
            let retryable = match &outcome {
                Ok(resp) => is_transient(resp.status()),
                Err(e) => e.is_timeout() || e.is_connect(),
            };
            if !retryable || attempt >= self.max_retries {
                return Ok(outcome?);
            }

            attempt += 1;
            let delay = backoff(attempt);
            debug!("Retrying request (attempt {}) after {:?}", attempt, delay);
            tokio::time::sleep(delay).await;
        }
    }
}

/// Doublings stop here; later attempts all wait the same ~102 s.
const MAX_BACKOFF_EXPONENT: u32 = 10;

/// Delay before retry number `attempt` (1-based): 100 ms, 200 ms, 400 ms, ...
fn backoff(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
    Duration::from_millis(100 * 2u64.pow(exponent))
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
