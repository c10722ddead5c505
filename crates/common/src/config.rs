//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,

    /// Token secrets, one per token family
    pub access_token_secret: String,
    pub refresh_token_secret: String,

    /// Token lifetimes as duration strings ("15m", "7d", "900s")
    pub access_token_ttl: String,
    pub refresh_token_ttl: String,

    /// Issuer/audience pair bound into every token
    pub token_issuer: String,
    pub token_audience: String,

    /// Runtime configuration
    pub log_level: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?,

            access_token_secret: env::var("ACCESS_TOKEN_SECRET")
                .map_err(|_| anyhow::anyhow!("ACCESS_TOKEN_SECRET is required"))?,
            refresh_token_secret: env::var("REFRESH_TOKEN_SECRET")
                .map_err(|_| anyhow::anyhow!("REFRESH_TOKEN_SECRET is required"))?,

            access_token_ttl: env::var("ACCESS_TOKEN_TTL").unwrap_or_else(|_| "15m".to_string()),
            refresh_token_ttl: env::var("REFRESH_TOKEN_TTL").unwrap_or_else(|_| "7d".to_string()),

            token_issuer: env::var("TOKEN_ISSUER").unwrap_or_else(|_| "worklane".to_string()),
            token_audience: env::var("TOKEN_AUDIENCE")
                .unwrap_or_else(|_| "worklane-api".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }
}
