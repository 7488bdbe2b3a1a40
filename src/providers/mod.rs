pub mod compatible;
pub mod factory;
pub mod ollama;
pub mod reliable;
pub mod scrub;
pub mod traits;

pub use factory::{create_provider, create_resilient_provider};
pub use reliable::ReliableProvider;
pub use scrub::{api_error, sanitize_api_error, scrub_secret_patterns};
pub use traits::Provider;

use reqwest::Client;
use std::time::Duration;

/// Shared HTTP client settings for every provider.
pub fn build_provider_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}
