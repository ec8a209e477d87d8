use std::env;
use std::time::Duration;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Claude,
    Gemini,
}

impl std::str::FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "claude" | "anthropic" => Ok(ProviderKind::Claude),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            other => Err(Error::Config(format!("Unknown roast provider: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub database_path: String,
    pub max_repos: usize,
    pub max_commits_per_repo: u32,
    pub include_forks: bool,
    pub concurrency_limit: usize,
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let github_token = non_empty("GITHUB_TOKEN");
        let anthropic_api_key = non_empty("ANTHROPIC_API_KEY");
        let gemini_api_key = non_empty("GEMINI_API_KEY");

        // Explicit choice wins, otherwise whichever key is present
        let provider = match non_empty("ROAST_PROVIDER") {
            Some(name) => Some(name.parse::<ProviderKind>()?),
            None if anthropic_api_key.is_some() => Some(ProviderKind::Claude),
            None if gemini_api_key.is_some() => Some(ProviderKind::Gemini),
            None => None,
        };

        match provider {
            Some(ProviderKind::Claude) if anthropic_api_key.is_none() => {
                return Err(Error::Config(
                    "ROAST_PROVIDER=claude requires ANTHROPIC_API_KEY".to_string(),
                ));
            }
            Some(ProviderKind::Gemini) if gemini_api_key.is_none() => {
                return Err(Error::Config(
                    "ROAST_PROVIDER=gemini requires GEMINI_API_KEY".to_string(),
                ));
            }
            _ => {}
        }

        Ok(Self {
            github_token,
            anthropic_api_key,
            gemini_api_key,
            provider,
            model: non_empty("ROAST_MODEL"),
            database_path: non_empty("DATABASE_PATH").unwrap_or_else(|| "gitshame.db".to_string()),
            max_repos: parse_var(non_empty("MAX_REPOS")).unwrap_or(10),
            max_commits_per_repo: parse_var(non_empty("MAX_COMMITS_PER_REPO")).unwrap_or(30),
            include_forks: non_empty("INCLUDE_FORKS")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(false),
            concurrency_limit: parse_var::<usize>(non_empty("CONCURRENCY_LIMIT")).unwrap_or(5).max(1),
            cache_capacity: parse_var(non_empty("CACHE_CAPACITY")).unwrap_or(256),
            cache_ttl: Duration::from_secs(parse_var(non_empty("CACHE_TTL_SECS")).unwrap_or(300)),
            host: non_empty("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_var(non_empty("PORT")).unwrap_or(8000),
        })
    }
}

fn parse_var<T: std::str::FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.parse().ok())
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub max_repos: usize,
    pub max_commits_per_repo: u32,
    pub include_forks: bool,
    pub concurrency_limit: usize,
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_repos: config.max_repos,
            max_commits_per_repo: config.max_commits_per_repo,
            include_forks: config.include_forks,
            concurrency_limit: config.concurrency_limit,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_repos: 10,
            max_commits_per_repo: 30,
            include_forks: false,
            concurrency_limit: 5,
        }
    }
}
