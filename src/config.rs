//! Runtime Configuration
//! Mission: Read every tunable once at startup from the environment

use anyhow::{bail, Context, Result};
use chrono::Duration;
use std::str::FromStr;

/// One year; longer-lived bearer tokens are refused.
const MAX_TOKEN_LIFETIME_MINUTES: i64 = 365 * 24 * 60;

/// Credentials for the admin account created on first start.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct Config {
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub application_name: String, // token issuer
    pub token_lifetime: Duration,
    pub bcrypt_cost: u32,
    pub admin: Option<AdminBootstrap>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; `from_env` passes the process environment.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = var("DATABASE_PATH").unwrap_or_else(|| "edulearn.db".to_string());
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&var, "PORT", 8080u16)?;

        let jwt_secret = match var("JWT_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None => bail!("JWT_SECRET must be set to a non-empty value"),
        };

        let application_name =
            var("APPLICATION_NAME").unwrap_or_else(|| "edulearn".to_string());

        let lifetime_minutes = parse_or(&var, "TOKEN_LIFETIME_MINUTES", 60i64)?;
        if !(1..=MAX_TOKEN_LIFETIME_MINUTES).contains(&lifetime_minutes) {
            bail!(
                "TOKEN_LIFETIME_MINUTES must be between 1 and {}, got {}",
                MAX_TOKEN_LIFETIME_MINUTES,
                lifetime_minutes
            );
        }

        let bcrypt_cost = parse_or(&var, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31, got {}", bcrypt_cost);
        }

        let admin = match (var("ADMIN_EMAIL"), var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminBootstrap {
                    name: var("ADMIN_NAME").unwrap_or_else(|| "Administrator".to_string()),
                    email,
                    password,
                })
            }
            _ => None,
        };

        Ok(Self {
            database_path,
            host,
            port,
            jwt_secret,
            application_name,
            token_lifetime: Duration::minutes(lifetime_minutes),
            bcrypt_cost,
            admin,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
