use anyhow::{bail, Context, Result};

use crate::invoice::tax::AmountRounding;

/// Application configuration loaded from environment variables.
/// Fails at startup if the database settings are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseSettings,
    pub port: u16,
    pub rust_log: String,
    pub invoice_prefix: String,
    pub logo_path: String,
    pub amount_rounding: AmountRounding,
}

/// Discrete PostgreSQL connection parameters (`PG_*` variables).
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: String,
    pub port: u16,
}

const DATABASE_VARS: [&str; 5] = ["PG_HOST", "PG_DB", "PG_USER", "PG_PASS", "PG_PORT"];

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database: DatabaseSettings::from_lookup(|key| std::env::var(key).ok())?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            invoice_prefix: std::env::var("INVOICE_PREFIX").unwrap_or_else(|_| "PTPL".to_string()),
            logo_path: std::env::var("LOGO_PATH")
                .unwrap_or_else(|_| "assets/logo.png".to_string()),
            amount_rounding: match std::env::var("AMOUNT_ROUNDING") {
                Ok(raw) => raw.parse()?,
                Err(_) => AmountRounding::default(),
            },
        })
    }
}

impl DatabaseSettings {
    /// Builds the settings from a variable lookup. Every missing variable is
    /// reported in a single error so the operator can fix them in one go.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let values: Vec<Option<String>> = DATABASE_VARS
            .iter()
            .map(|key| lookup(key).filter(|v| !v.trim().is_empty()))
            .collect();

        let missing: Vec<&str> = DATABASE_VARS
            .iter()
            .zip(&values)
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| *k)
            .collect();
        if !missing.is_empty() {
            bail!(
                "Missing required database environment variables: {}",
                missing.join(", ")
            );
        }

        let mut values = values.into_iter().flatten();
        let mut next = || values.next().unwrap_or_default();
        let (host, database, user, password, raw_port) = (next(), next(), next(), next(), next());

        let port = raw_port
            .trim()
            .parse::<u16>()
            .with_context(|| format!("Invalid PG_PORT value: {raw_port}"))?;

        Ok(DatabaseSettings {
            host,
            database,
            user,
            password,
            port,
        })
    }
}
