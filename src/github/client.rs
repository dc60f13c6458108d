//! The REST/GraphQL HTTP mediator (spec §4.2).
//!
//! Adapted from the teacher's `github::client::GithubClient`: same request
//! configuration (`configure`), same `send_req`/retry shape. Two additions
//! the teacher doesn't need: a read-only response cache (§4.2 "Cache") and
//! jittered exponential backoff on rate limiting, grounded in
//! `rate_limiter.py`'s `backoff_with_jitter` (base delay doubles per
//! attempt, capped, plus up to ±25% jitter of the computed delay).

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use bytes::Bytes;
use rand::Rng;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace, warn};

use crate::cache::{ApiCache, InMemoryCache, cache_key};
use crate::errors::GithubDataError;

/// A request is retried this many times after an initial rate-limited
/// attempt before the error is surfaced to the caller (mirrors
/// `rate_limiter.py`'s `max_retries`).
const MAX_ATTEMPTS: u32 = 3;

/// Threshold below which the mediator proactively backs off even on a
/// successful response, so a burst of calls doesn't walk straight into the
/// rate limit (`rate_limiter.py`'s `RATE_LIMIT_THRESHOLD`).
const RATE_LIMIT_WARNING_THRESHOLD: u64 = 100;

#[derive(Clone)]
pub struct GithubClient {
    token: SecretString,
    client: Client,
    api_url: String,
    graphql_url: String,
    cache: Arc<dyn ApiCache>,
}

impl GithubClient {
    pub fn new(token: SecretString, api_url: String, graphql_url: String) -> Self {
        GithubClient {
            client: Client::new(),
            token,
            api_url,
            graphql_url,
            cache: Arc::new(InMemoryCache::new()),
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ApiCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn new_from_env(token: SecretString) -> Self {
        Self::new(
            token,
            std::env::var("GITHUB_API_URL").unwrap_or_else(|_| "https://api.github.com".to_string()),
            std::env::var("GITHUB_GRAPHQL_API_URL")
                .unwrap_or_else(|_| "https://api.github.com/graphql".to_string()),
        )
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// An HTTPS clone URL with the token embedded for non-interactive
    /// `git clone`/`git push`, matching the `https://{token}@host/...`
    /// shape GitHub Actions' own checkout action uses.
    pub fn clone_url(&self, owner: &str, name: &str) -> String {
        format!("https://{}@github.com/{owner}/{name}.git", self.token.expose_secret())
    }

    fn get(&self, url: &str) -> RequestBuilder {
        trace!(url, "GET");
        self.client.get(url).configure(self)
    }

    fn post(&self, url: &str) -> RequestBuilder {
        trace!(url, "POST");
        self.client.post(url).configure(self)
    }

    fn patch(&self, url: &str) -> RequestBuilder {
        trace!(url, "PATCH");
        self.client.patch(url).configure(self)
    }

    fn delete(&self, url: &str) -> RequestBuilder {
        trace!(url, "DELETE");
        self.client.delete(url).configure(self)
    }

    /// Issues a GET and deserializes the JSON body, serving from and
    /// populating the read cache keyed by `method_name` + `params`.
    pub async fn get_json_cached<T: serde::de::DeserializeOwned>(
        &self,
        method_name: &str,
        params: &[(&str, &str)],
        url: &str,
    ) -> Result<T, GithubDataError> {
        let key = cache_key(method_name, params);
        if let Some(cached) = self.cache.get(&key) {
            debug!(method_name, "cache hit");
            return serde_json::from_value(cached)
                .map_err(|e| GithubDataError::Validation(e.to_string()));
        }
        let (body, _) = self.send_req(self.get(url)).await?;
        let value: serde_json::Value =
            serde_json::from_slice(&body).map_err(|e| GithubDataError::Validation(e.to_string()))?;
        self.cache.put(&key, value.clone());
        serde_json::from_value(value).map_err(|e| GithubDataError::Validation(e.to_string()))
    }

    pub async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, GithubDataError> {
        self.json(self.get(url)).await
    }

    pub async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, GithubDataError> {
        self.json(self.post(url).json(body)).await
    }

    pub async fn patch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, GithubDataError> {
        self.json(self.patch(url).json(body)).await
    }

    pub async fn delete_ok(&self, url: &str) -> Result<(), GithubDataError> {
        self.send_req(self.delete(url)).await.map(|_| ())
    }

    async fn json<T: serde::de::DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<T, GithubDataError> {
        let (body, _) = self.send_req(req).await?;
        serde_json::from_slice(&body).map_err(|e| GithubDataError::Validation(e.to_string()))
    }

    /// Builds, sends, and retries a request, returning the raw response
    /// (before the body is consumed) so callers that need response headers
    /// — pagination's `Link` header, in particular — can inspect them.
    async fn execute_with_retry(&self, req: RequestBuilder) -> Result<(Response, String), GithubDataError> {
        let req_dbg = format!("{req:?}");
        let req = req
            .build()
            .map_err(|e| GithubDataError::Transport(e))?;

        let mut resp = self
            .client
            .execute(req.try_clone().expect("request body is not a stream"))
            .await?;

        let mut attempt = 0;
        while let Some(sleep) = Self::needs_retry(&resp) {
            if attempt >= MAX_ATTEMPTS {
                return Err(GithubDataError::RateLimit(format!(
                    "exhausted {MAX_ATTEMPTS} retries: {req_dbg}"
                )));
            }
            let delay = backoff_with_jitter(attempt, sleep);
            warn!(attempt, delay_secs = delay.as_secs(), "rate limited, backing off");
            tokio::time::sleep(delay).await;
            resp = self
                .client
                .execute(req.try_clone().expect("request body is not a stream"))
                .await?;
            attempt += 1;
        }

        Self::warn_if_near_limit(&resp);
        Ok((resp, req_dbg))
    }

    async fn send_req(&self, req: RequestBuilder) -> Result<(Bytes, String), GithubDataError> {
        let (resp, req_dbg) = self.execute_with_retry(req).await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        if let Some(err) = GithubDataError::classify_status(status, &String::from_utf8_lossy(&body)) {
            return Err(err);
        }
        Ok((body, req_dbg))
    }

    /// Follows the `Link: <url>; rel="next"` header (GitHub's REST
    /// pagination scheme) until exhausted, concatenating each page's JSON
    /// array and caching the assembled result under `method_name` +
    /// `params`, same as `get_json_cached`.
    pub async fn get_json_list_cached(
        &self,
        method_name: &str,
        params: &[(&str, &str)],
        first_url: &str,
    ) -> Result<Vec<serde_json::Value>, GithubDataError> {
        let key = cache_key(method_name, params);
        if let Some(cached) = self.cache.get(&key) {
            debug!(method_name, "cache hit");
            return serde_json::from_value(cached)
                .map_err(|e| GithubDataError::Validation(e.to_string()));
        }

        let mut results = Vec::new();
        let mut url = first_url.to_string();
        loop {
            let (resp, _) = self.execute_with_retry(self.get(&url)).await?;
            let next = next_page_url(&resp);
            let status = resp.status();
            let body = resp.bytes().await?;
            if let Some(err) = GithubDataError::classify_status(status, &String::from_utf8_lossy(&body)) {
                return Err(err);
            }
            let mut page: Vec<serde_json::Value> =
                serde_json::from_slice(&body).map_err(|e| GithubDataError::Validation(e.to_string()))?;
            results.append(&mut page);
            match next {
                Some(next_url) => url = next_url,
                None => break,
            }
        }

        self.cache.put(&key, serde_json::Value::Array(results.clone()));
        Ok(results)
    }

    fn needs_retry(resp: &Response) -> Option<Duration> {
        if !matches!(resp.status(), StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS) {
            return None;
        }
        let headers = resp.headers();
        let remaining: u64 = headers
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())?;
        if remaining > 0 {
            return None;
        }
        let reset: u64 = headers
            .get("X-RateLimit-Reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())?;
        let now = SystemTime::UNIX_EPOCH.elapsed().unwrap().as_secs();
        Some(Duration::from_secs(reset.saturating_sub(now)))
    }

    fn warn_if_near_limit(resp: &Response) {
        if let Some(remaining) = resp
            .headers()
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            && remaining < RATE_LIMIT_WARNING_THRESHOLD
        {
            warn!(remaining, "approaching GitHub rate limit");
        }
    }

    pub async fn graphql_query_with_errors(
        &self,
        query: &str,
        vars: serde_json::Value,
    ) -> Result<serde_json::Value, GithubDataError> {
        self.post_json(
            &self.graphql_url,
            &serde_json::json!({ "query": query, "variables": vars }),
        )
        .await
    }

    pub async fn graphql_query(
        &self,
        query: &str,
        vars: serde_json::Value,
    ) -> Result<serde_json::Value, GithubDataError> {
        let result = self.graphql_query_with_errors(query, vars).await?;
        if let Some(errors) = result["errors"].as_array() {
            let messages = errors
                .iter()
                .filter_map(|e| e["message"].as_str())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(GithubDataError::Validation(messages));
        }
        Ok(result)
    }
}

/// Extracts the `rel="next"` target from a GitHub REST `Link` response
/// header, e.g. `<https://api.github.com/...&page=2>; rel="next", <...>; rel="last"`.
fn next_page_url(resp: &Response) -> Option<String> {
    let link = resp.headers().get(reqwest::header::LINK)?.to_str().ok()?;
    link.split(',').find_map(|part| {
        let mut segments = part.split(';').map(str::trim);
        let url_part = segments.next()?;
        if !segments.any(|s| s == "rel=\"next\"") {
            return None;
        }
        url_part.strip_prefix('<').and_then(|s| s.strip_suffix('>')).map(str::to_string)
    })
}

/// Exponential backoff with jitter: `min(base * 2^attempt, cap)` seconds,
/// then scaled by up to ±25%, floored by the server-reported reset delay
/// when that's larger (`rate_limiter.py::_add_jitter_to_delay`).
fn backoff_with_jitter(attempt: u32, server_reset: Duration) -> Duration {
    const BASE_SECS: u64 = 1;
    const CAP_SECS: u64 = 60;
    let exp = BASE_SECS.saturating_mul(1 << attempt.min(6)).min(CAP_SECS);
    let jitter_factor = rand::thread_rng().gen_range(-0.25..=0.25);
    let computed = Duration::from_secs_f64((exp as f64) * (1.0 + jitter_factor));
    computed.max(server_reset)
}

trait RequestSend: Sized {
    fn configure(self, g: &GithubClient) -> Self;
}

impl RequestSend for RequestBuilder {
    fn configure(self, g: &GithubClient) -> RequestBuilder {
        let mut auth = reqwest::header::HeaderValue::from_maybe_shared(format!(
            "token {}",
            g.token.expose_secret()
        ))
        .unwrap();
        auth.set_sensitive(true);
        self.header(USER_AGENT, "github-mirror").header(AUTHORIZATION, auth)
    }
}
