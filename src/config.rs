use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GameServerConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub words: WordsConfig,
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardConfig {
    pub server: ServerConfig,
    pub registration: RegistrationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WordsConfig {
    pub answers_path: String,
    pub valid_guesses_path: String,
}

/// Tuning for completion event delivery to registered callback URLs.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    pub delivery_attempts: u32,
    pub delivery_timeout_secs: u64,
    pub retry_backoff_ms: u64,
}

/// Where the leaderboard finds the game server, and where the game server
/// should push results back to.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationConfig {
    pub game_server_url: String,
    pub public_url: String,
}

impl GameServerConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
        };

        let server = ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a number")?,
        };

        let words = WordsConfig {
            answers_path: env::var("ANSWERS_PATH")
                .unwrap_or_else(|_| "./words/answers.txt".to_string()),
            valid_guesses_path: env::var("VALID_GUESSES_PATH")
                .unwrap_or_else(|_| "./words/valid_guesses.txt".to_string()),
        };

        let notify = NotifyConfig {
            delivery_attempts: env::var("NOTIFY_DELIVERY_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("NOTIFY_DELIVERY_ATTEMPTS must be a number")?,
            delivery_timeout_secs: env::var("NOTIFY_DELIVERY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("NOTIFY_DELIVERY_TIMEOUT_SECS must be a number")?,
            retry_backoff_ms: env::var("NOTIFY_RETRY_BACKOFF_MS")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .context("NOTIFY_RETRY_BACKOFF_MS must be a number")?,
        };

        Ok(GameServerConfig {
            database,
            server,
            words,
            notify,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl LeaderboardConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5400".to_string())
                .parse()
                .context("PORT must be a number")?,
        };

        let registration = RegistrationConfig {
            game_server_url: env::var("GAME_SERVER_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string()),
            public_url: env::var("PUBLIC_URL")
                .unwrap_or_else(|_| format!("http://127.0.0.1:{}", server.port)),
        };

        Ok(LeaderboardConfig {
            server,
            registration,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Endpoint on the game server that accepts callback registrations.
    pub fn register_url(&self) -> String {
        format!(
            "{}/client_register",
            self.registration.game_server_url.trim_end_matches('/')
        )
    }

    /// Our own results endpoint, as the game server should see it.
    pub fn results_url(&self) -> String {
        format!(
            "{}/results",
            self.registration.public_url.trim_end_matches('/')
        )
    }
}

impl NotifyConfig {
    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}
