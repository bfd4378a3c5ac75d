//! HTTP client shared by all extraction strategies.
//!
//! Wraps a single [`reqwest::Client`] (cookie jar, gzip/brotli, timeout)
//! together with the pacing limiter and the configured base URL. Every
//! fetch rotates through a fresh browser identity and goes through the
//! limiter first, so no strategy can bypass the anti-detection policy.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;

use instascrape_core::AppConfig;

use crate::error::ScraperError;
use crate::identity::{document_headers, random_identity, xhr_headers};
use crate::rate_limit::RateLimiter;

pub struct ProfileClient {
    http: reqwest::Client,
    limiter: Arc<RateLimiter>,
    base_url: String,
}

impl ProfileClient {
    /// Build a client from the application config.
    ///
    /// # Errors
    ///
    /// Fails only if the underlying TLS/connector setup fails, which is a
    /// startup-time condition rather than a per-request one.
    pub fn new(config: &AppConfig) -> Result<Self, ScraperError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            http,
            limiter: Arc::new(RateLimiter::new(
                config.min_delay_ms,
                config.max_delay_ms,
                config.block_backoff_secs,
            )),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base origin all strategy paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn limiter(&self) -> Arc<RateLimiter> {
        Arc::clone(&self.limiter)
    }

    /// Fetch a path as an HTML document, with navigation-style headers.
    ///
    /// # Errors
    ///
    /// [`ScraperError::RateLimited`] on a 429, [`ScraperError::ProfileUnavailable`]
    /// on a 404, [`ScraperError::UnexpectedStatus`] for other non-success
    /// statuses, and [`ScraperError::Http`] for transport failures.
    pub async fn fetch_html(&self, path: &str) -> Result<String, ScraperError> {
        self.limiter.throttle().await;
        let url = format!("{}{path}", self.base_url);

        let identity = random_identity();
        let mut request = self.http.get(&url);
        for (name, value) in document_headers(&identity) {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let response = Self::check_status(response, &url).await?;
        Ok(response.text().await?)
    }

    /// Fetch a path as JSON, with XHR-style headers mimicking the target's
    /// own web client.
    ///
    /// # Errors
    ///
    /// Same status mapping as [`Self::fetch_html`], plus
    /// [`ScraperError::Deserialize`] when a 200 body is not valid JSON.
    pub async fn fetch_json(&self, path: &str) -> Result<serde_json::Value, ScraperError> {
        self.limiter.throttle().await;
        let url = format!("{}{path}", self.base_url);

        let identity = random_identity();
        let mut request = self.http.get(&url);
        for (name, value) in xhr_headers(&identity, &self.base_url) {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let response = Self::check_status(response, &url).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ScraperError::Deserialize {
            context: url,
            source,
        })
    }

    /// Map refusal statuses to typed errors before the body is touched.
    async fn check_status(
        response: reqwest::Response,
        url: &str,
    ) -> Result<reqwest::Response, ScraperError> {
        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => Err(ScraperError::RateLimited {
                domain: response
                    .url()
                    .host_str()
                    .unwrap_or("unknown")
                    .to_string(),
                retry_after_secs: retry_after_secs(&response),
            }),
            StatusCode::NOT_FOUND => Err(ScraperError::ProfileUnavailable {
                url: url.to_string(),
            }),
            status if !status.is_success() => Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }),
            _ => Ok(response),
        }
    }
}

fn retry_after_secs(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use instascrape_core::{AppConfig, Environment};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> AppConfig {
        AppConfig {
            env: Environment::Test,
            log_level: "debug".to_string(),
            profiles_path: "./config/profiles.yaml".into(),
            base_url,
            request_timeout_secs: 5,
            min_delay_ms: 0,
            max_delay_ms: 0,
            batch_min_delay_ms: 0,
            batch_max_delay_ms: 0,
            block_backoff_secs: 0,
            max_batch_size: 20,
        }
    }

    #[tokio::test]
    async fn fetch_json_sends_xhr_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/test/info/"))
            .and(header("X-IG-App-ID", "936619743392459"))
            .and(header("X-Requested-With", "XMLHttpRequest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user": {"username": "test"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ProfileClient::new(&test_config(server.uri())).expect("client builds");
        let body = client
            .fetch_json("/api/v1/users/test/info/")
            .await
            .expect("fetch succeeds");
        assert_eq!(body["user"]["username"], "test");
    }

    #[tokio::test]
    async fn fetch_html_sends_browser_identity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/someone/"))
            .and(header("Sec-Fetch-Mode", "navigate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = ProfileClient::new(&test_config(server.uri())).expect("client builds");
        let body = client.fetch_html("/someone/").await.expect("fetch succeeds");
        assert_eq!(body, "<html>hi</html>");
    }

    #[tokio::test]
    async fn status_429_maps_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blocked/"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
            .mount(&server)
            .await;

        let client = ProfileClient::new(&test_config(server.uri())).expect("client builds");
        let err = client.fetch_html("/blocked/").await.unwrap_err();
        match err {
            ScraperError::RateLimited {
                retry_after_secs, ..
            } => assert_eq!(retry_after_secs, 30),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn status_404_maps_to_profile_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ProfileClient::new(&test_config(server.uri())).expect("client builds");
        let err = client.fetch_html("/missing/").await.unwrap_err();
        assert!(matches!(err, ScraperError::ProfileUnavailable { .. }));
    }

    #[tokio::test]
    async fn status_500_maps_to_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ProfileClient::new(&test_config(server.uri())).expect("client builds");
        let err = client.fetch_html("/broken/").await.unwrap_err();
        assert!(matches!(
            err,
            ScraperError::UnexpectedStatus { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn malformed_json_body_maps_to_deserialize() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/garbage/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = ProfileClient::new(&test_config(server.uri())).expect("client builds");
        let err = client.fetch_json("/garbage/").await.unwrap_err();
        assert!(matches!(err, ScraperError::Deserialize { .. }));
    }
}
