use reqwest::{header, Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::github::cache::ResponseCache;
use crate::github::paginator::Paginator;
use crate::github::rate_limiter::RateLimiter;
use crate::models::{CommitSummary, GitHubUser, Repository};

pub struct GitHubClient {
    client: Client,
    rate_limiter: RateLimiter,
    cache: ResponseCache,
    base_url: String,
}

impl GitHubClient {
    /// Build a client. Without a token the public, lower rate limit applies.
    pub fn new(token: Option<&str>, cache: ResponseCache) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("gitshame/0.1"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(),
            cache,
            base_url: "https://api.github.com".to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    /// `base_url` joined with `segments`, each one percent-encoded so a name
    /// can't reach another path or add query parameters.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid GitHub base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("GitHub base URL cannot have a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get_user(&self, username: &str) -> Result<GitHubUser> {
        let url = self.endpoint(&["users", username])?.to_string();
        if let Some(user) = self.cache_get(&url).await {
            return Ok(user);
        }

        self.rate_limiter.wait().await;
        tracing::info!("Fetching user: {}", username);

        let response = self.client.get(&url).send().await?;
        self.rate_limiter.update_from_headers(response.headers()).await;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::UserNotFound(username.to_string()));
        }
        let response = error_for_status(response, &url).await?;

        let user: GitHubUser = response.json().await?;
        self.cache_put(&url, &user).await;
        Ok(user)
    }

    pub async fn get_user_repos(&self, username: &str) -> Result<Vec<Repository>> {
        let mut url = self.endpoint(&["users", username, "repos"])?;
        url.query_pairs_mut()
            .append_pair("type", "owner")
            .append_pair("sort", "updated");
        let url = url.to_string();
        if let Some(repos) = self.cache_get(&url).await {
            return Ok(repos);
        }

        tracing::info!("Fetching repositories for: {}", username);
        let repos: Vec<Repository> = Paginator::new(&self.client, &self.rate_limiter)
            .fetch_all(&url, 100)
            .await?;
        self.cache_put(&url, &repos).await;
        Ok(repos)
    }

    pub async fn get_repo_commits(
        &self,
        owner: &str,
        repo: &str,
        author: Option<&str>,
        max_commits: u32,
    ) -> Result<Vec<CommitSummary>> {
        let mut url = self.endpoint(&["repos", owner, repo, "commits"])?;
        if let Some(author) = author {
            url.query_pairs_mut().append_pair("author", author);
        }
        let url = url.to_string();
        let key = format!("{}#max={}", url, max_commits);
        if let Some(commits) = self.cache_get(&key).await {
            return Ok(commits);
        }

        tracing::debug!("Fetching commits for: {}/{}", owner, repo);
        let commits: Vec<CommitSummary> = Paginator::new(&self.client, &self.rate_limiter)
            .fetch_limited(&url, 100, max_commits)
            .await?;
        self.cache_put(&key, &commits).await;
        Ok(commits)
    }

    async fn cache_get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.cache.get(key).await?;
        match serde_json::from_value(value) {
            Ok(hit) => {
                tracing::debug!("Cache hit: {}", key);
                Some(hit)
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable cache entry {}: {}", key, e);
                None
            }
        }
    }

    async fn cache_put<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => self.cache.insert(key, value).await,
            Err(e) => tracing::warn!("Not caching {}: {}", key, e),
        }
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}

/// Turn a non-success GitHub response into an [`Error`].
pub(crate) async fn error_for_status(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let exhausted = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "0")
        .unwrap_or(false);

    if status == StatusCode::TOO_MANY_REQUESTS || (status == StatusCode::FORBIDDEN && exhausted) {
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);
        return Err(Error::RateLimited(retry_after));
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::GitHubApi(format!(
        "Request to {} failed: {} - {}",
        context, status, body
    )))
}
