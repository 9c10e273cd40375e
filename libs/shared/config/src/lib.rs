use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub sesami_api_url: String,
    pub sesami_api_key: String,
    pub sesami_webhook_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_URL not set, using empty value");
                    String::new()
                }),
            sesami_api_url: env::var("SESAMI_API_URL")
                .unwrap_or_else(|_| {
                    warn!("SESAMI_API_URL not set, outbound booking sync disabled");
                    String::new()
                }),
            sesami_api_key: env::var("SESAMI_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("SESAMI_API_KEY not set, using empty value");
                    String::new()
                }),
            sesami_webhook_secret: env::var("SESAMI_WEBHOOK_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SESAMI_WEBHOOK_SECRET not set, webhook signatures will not be verified");
                    String::new()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.database_url.is_empty()
    }

    pub fn is_sync_configured(&self) -> bool {
        !self.sesami_api_url.is_empty()
    }

    pub fn is_signature_verification_configured(&self) -> bool {
        !self.sesami_webhook_secret.is_empty()
    }
}
