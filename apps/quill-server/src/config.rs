//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use quill_infra::RateLimitConfig;
use url::Url;

const DEFAULT_MAIL_FROM: &str = "noreply@quill.local";

/// Hosts accepted in share links when neither `SITE_URL` nor `ALLOWED_HOSTS`
/// is set: local development only.
pub const DEFAULT_ALLOWED_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

/// Database settings; the pool is only opened when `url` is present.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Outbound mail settings.
#[derive(Debug, Clone)]
pub struct MailSettings {
    /// Sender address of every message.
    pub from: String,
    /// HTTP relay endpoint; console transport when unset.
    pub webhook_url: Option<String>,
    pub webhook_api_key: Option<String>,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseSettings>,
    /// Public base URL used in shared links. Derived per request when unset.
    pub site_url: Option<Url>,
    /// Host names a request may carry when the link base is taken from it.
    /// A leading dot matches subdomains; `*` matches anything.
    pub allowed_hosts: Vec<String>,
    /// Read `X-Forwarded-*` / `Forwarded` headers (behind a reverse proxy only).
    pub trust_proxy_headers: bool,
    pub mail: MailSettings,
    /// Shared secret of the identity provider's tokens.
    pub jwt_secret: Option<String>,
    pub jwt_issuer: Option<String>,
    pub share_rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseSettings {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS").unwrap_or(20),
            min_connections: parsed("DB_MIN_CONNECTIONS").unwrap_or(2),
        });

        let site_url = env::var("SITE_URL")
            .ok()
            .and_then(|raw| match Url::parse(&raw) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!(site_url = %raw, error = %e, "Ignoring invalid SITE_URL");
                    None
                }
            });

        let allowed_hosts = env::var("ALLOWED_HOSTS")
            .map(|raw| split_list(&raw))
            .unwrap_or_else(|_| DEFAULT_ALLOWED_HOSTS.map(String::from).to_vec());

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            database,
            site_url,
            allowed_hosts,
            trust_proxy_headers: flag("TRUST_PROXY_HEADERS"),
            mail: MailSettings {
                from: env::var("MAIL_FROM").unwrap_or_else(|_| DEFAULT_MAIL_FROM.to_string()),
                webhook_url: env::var("MAIL_WEBHOOK_URL").ok(),
                webhook_api_key: env::var("MAIL_WEBHOOK_API_KEY").ok(),
            },
            jwt_secret: env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
            jwt_issuer: env::var("JWT_ISSUER").ok(),
            share_rate_limit: RateLimitConfig {
                max_requests: parsed("SHARE_RATE_LIMIT_MAX").unwrap_or(10),
                window: Duration::from_secs(parsed("SHARE_RATE_LIMIT_WINDOW_SECS").unwrap_or(60)),
            },
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

fn flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|host| host.trim().to_ascii_lowercase())
        .filter(|host| !host.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" Blog.Example.com, .example.org ,,"),
            ["blog.example.com", ".example.org"]
        );
        assert!(split_list("").is_empty());
    }
}
