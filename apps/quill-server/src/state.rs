//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{Mailer, PostRepository, TokenService};
use quill_core::services::{AuthoringService, BlogService};
use quill_infra::{ConsoleMailer, DisabledTokenService, InMemoryPostRepository, JwtConfig, JwtTokenService};
use url::Url;

use crate::config::{AppConfig, DEFAULT_ALLOWED_HOSTS};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<BlogService>,
    pub authoring: Arc<AuthoringService>,
    /// Public base URL; `None` means "derive from the request".
    pub site_url: Option<Url>,
    /// Hosts a request-derived base URL may use.
    pub allowed_hosts: Vec<String>,
    pub trust_proxy_headers: bool,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let posts = post_repository(config).await;
        let mailer = mailer(config);
        let state = Self::with_parts(posts, mailer, &config.mail.from, config.site_url.clone())
            .with_allowed_hosts(config.allowed_hosts.clone())
            .trusting_proxy_headers(config.trust_proxy_headers);
        tracing::info!("Application state initialized");
        state
    }

    /// Assemble the services over the given adapters.
    pub fn with_parts(
        posts: Arc<dyn PostRepository>,
        mailer: Arc<dyn Mailer>,
        sender: &str,
        site_url: Option<Url>,
    ) -> Self {
        Self {
            blog: Arc::new(BlogService::new(posts.clone(), mailer, sender)),
            authoring: Arc::new(AuthoringService::new(posts)),
            site_url,
            allowed_hosts: DEFAULT_ALLOWED_HOSTS.map(String::from).to_vec(),
            trust_proxy_headers: false,
        }
    }

    pub fn with_allowed_hosts(mut self, hosts: Vec<String>) -> Self {
        self.allowed_hosts = hosts;
        self
    }

    pub fn trusting_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }
}

/// Token verifier for the authoring API.
pub fn token_service(config: &AppConfig) -> Arc<dyn TokenService> {
    match &config.jwt_secret {
        Some(secret) => Arc::new(JwtTokenService::new(JwtConfig {
            secret: secret.clone(),
            issuer: config.jwt_issuer.clone(),
        })),
        None => {
            tracing::warn!("JWT_SECRET not set. The authoring API will reject every request.");
            Arc::new(DisabledTokenService)
        }
    }
}

#[cfg(feature = "postgres")]
async fn post_repository(config: &AppConfig) -> Arc<dyn PostRepository> {
    use quill_infra::{DatabaseConfig, PostgresPostRepository, database};

    let Some(settings) = &config.database else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return Arc::new(InMemoryPostRepository::new());
    };

    let db_config = DatabaseConfig {
        url: settings.url.clone(),
        max_connections: settings.max_connections,
        min_connections: settings.min_connections,
    };
    match database::connect(&db_config).await {
        Ok(conn) => Arc::new(PostgresPostRepository::new(conn)),
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            Arc::new(InMemoryPostRepository::new())
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn post_repository(_config: &AppConfig) -> Arc<dyn PostRepository> {
    tracing::info!("Running without postgres feature - using in-memory repository");
    Arc::new(InMemoryPostRepository::new())
}

fn mailer(config: &AppConfig) -> Arc<dyn Mailer> {
    #[cfg(feature = "webhook-mail")]
    {
        if let Some(url) = &config.mail.webhook_url {
            use quill_infra::{WebhookMailer, WebhookMailerConfig};

            let mut relay = WebhookMailerConfig::new(url.clone());
            relay.api_key = config.mail.webhook_api_key.clone();
            match WebhookMailer::new(relay) {
                Ok(mailer) => {
                    tracing::info!("Mail relay configured");
                    return Arc::new(mailer);
                }
                Err(e) => tracing::error!("Mail relay unavailable: {}. Using console mailer.", e),
            }
        }
    }

    #[cfg(not(feature = "webhook-mail"))]
    {
        if config.mail.webhook_url.is_some() {
            tracing::warn!("MAIL_WEBHOOK_URL ignored: built without webhook-mail feature");
        }
    }

    Arc::new(ConsoleMailer)
}
