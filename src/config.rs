/*
 * Responsibility
 * - read environment / .env (PORT, APP_ENV, JWT_*)
 * - validate values (startup fails when something is missing or invalid)
 * - AuthSettings is built once here and shared read-only afterwards
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

const DEV_JWT_SECRET: &str = "secret";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Token verification settings shared by the auth middleware and the
/// ownership hooks.
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub algorithm: Algorithm,
    pub subject_claim: String,
    pub leeway_seconds: u64,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the secret
        f.debug_struct("AuthSettings")
            .field("algorithm", &self.algorithm)
            .field("subject_claim", &self.subject_claim)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl AuthSettings {
    /// HS256, subject under `user_id`, 60s leeway.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            subject_claim: "user_id".to_string(),
            leeway_seconds: 60,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_subject_claim(mut self, claim: impl Into<String>) -> Self {
        self.subject_claim = claim.into();
        self
    }
}

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub auth: AuthSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.is_empty() => return Err(ConfigError::Invalid("JWT_SECRET")),
            Ok(secret) => secret,
            Err(_) if app_env.is_production() => return Err(ConfigError::Missing("JWT_SECRET")),
            Err(_) => {
                tracing::warn!(
                    "JWT_SECRET is not set, using the development secret {:?}",
                    DEV_JWT_SECRET
                );
                DEV_JWT_SECRET.to_string()
            }
        };

        let algorithm = parse_algorithm(
            &std::env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string()),
        )?;

        let subject_claim = std::env::var("JWT_SUBJECT_CLAIM")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "user_id".to_string());

        let leeway_seconds = std::env::var("JWT_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        Ok(Self {
            addr,
            app_env,
            auth: AuthSettings {
                jwt_secret,
                algorithm,
                subject_claim,
                leeway_seconds,
            },
        })
    }
}

// Only shared-secret algorithms make sense with a single secret.
fn parse_algorithm(value: &str) -> Result<Algorithm, ConfigError> {
    match Algorithm::from_str(value.trim()) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(ConfigError::Invalid("JWT_ALGORITHM")),
    }
}
