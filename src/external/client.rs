use std::time::Duration;

use crate::config::HttpSettings;
use crate::error::{AppError, AppResult};

/// Default User-Agent sent to both providers
pub fn default_user_agent() -> String {
    format!("herald-rs/{}", crate::pkg_version())
}

/// Build the HTTP client shared by the Discord and email transports
///
/// One client per `Notifier` so both transports reuse the same connection
/// pool.
///
/// # Features
/// - **Timeouts**: whole-request and connect timeouts from [`HttpSettings`]
///   (10s / 5s by default) so a stalled provider cannot hang a send
/// - **Connection pooling**: small idle pool, both providers are single hosts
/// - **Compression**: gzip responses
/// - **Security**: Rustls for TLS (no OpenSSL dependency)
///
/// # Example
/// ```rust,ignore
/// use herald_rs::config::HttpSettings;
/// use herald_rs::external::client::build_http_client;
///
/// let client = build_http_client(&HttpSettings::default())?;
/// ```
pub fn build_http_client(settings: &HttpSettings) -> AppResult<reqwest::Client> {
    let user_agent = settings
        .user_agent
        .clone()
        .unwrap_or_else(default_user_agent);

    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        // Connection pooling
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(90))
        .gzip(true)
        .user_agent(user_agent)
        .build()
        .map_err(|source| AppError::HttpClient { source })
}
