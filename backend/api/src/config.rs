//! Application configuration loaded from environment variables.

use crate::errors::{ApiError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Ledger-submission JSON-RPC endpoint the gateway posts to
    pub ledger_rpc_url: String,
    /// Path to the SQLite journal database
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// How often (in seconds) the gateway drains pending journal rows
    pub submit_interval_secs: u64,
    /// Maximum pending operations submitted per gateway cycle
    pub submit_batch_size: u32,
    /// Lifetime (in seconds) of an issued authentication challenge
    pub challenge_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            ledger_rpc_url: env_var("LEDGER_RPC_URL")
                .unwrap_or_else(|_| "https://soroban-testnet.stellar.org".to_string()),
            database_url: env_var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./viewshare_journal.db".to_string()),
            api_port: env_var("API_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid API_PORT".to_string()))?,
            submit_interval_secs: env_var("SUBMIT_INTERVAL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid SUBMIT_INTERVAL_SECS".to_string()))?,
            submit_batch_size: env_var("SUBMIT_BATCH_SIZE")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid SUBMIT_BATCH_SIZE".to_string()))?,
            challenge_ttl_secs: env_var("CHALLENGE_TTL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid CHALLENGE_TTL_SECS".to_string()))?,
        })
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| ApiError::Config(format!("Missing env var: {key}")))
}
