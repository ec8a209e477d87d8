pub mod client;
pub mod rate_limiter;
pub mod paginator;
pub mod cache;

pub use client::GitHubClient;
pub use rate_limiter::RateLimiter;
pub use paginator::Paginator;
pub use cache::ResponseCache;
