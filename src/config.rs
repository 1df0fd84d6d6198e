use std::env;
use std::fmt;
use std::str::FromStr;
use anyhow::{Context, Result, anyhow};

/// Which backend holds the todo records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Spanner,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "spanner" => Ok(StoreBackend::Spanner),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!("expected 'spanner' or 'memory', got '{}'", other)),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Spanner => write!(f, "spanner"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub spanner_emulator_host: Option<String>,
    pub spanner_project: String,
    pub spanner_instance: String,
    pub spanner_database: String,
    pub spanner_region: String,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let store_backend = env::var("TODO_STORE")
            .unwrap_or_else(|_| "spanner".to_string())
            .parse::<StoreBackend>()
            .context("TODO_STORE must be 'spanner' or 'memory'")?;

        let spanner_emulator_host = env::var("SPANNER_EMULATOR_HOST").ok();

        // The in-memory backend never talks to Spanner, so the connection
        // settings are only mandatory for the spanner backend.
        let required = |name: &str| -> Result<String> {
            match env::var(name) {
                Ok(value) => Ok(value),
                Err(_) if store_backend == StoreBackend::Memory => Ok(String::new()),
                Err(_) => Err(anyhow!("{} environment variable is required", name)),
            }
        };

        let spanner_project = required("SPANNER_PROJECT")?;
        let spanner_instance = required("SPANNER_INSTANCE")?;
        let spanner_database = required("SPANNER_DATABASE")?;

        let spanner_region = env::var("SPANNER_REGION")
            .unwrap_or_else(|_| "us-central1".to_string());

        let service_port = env::var("SERVICE_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = env::var("SERVICE_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        Ok(Config {
            store_backend,
            spanner_emulator_host,
            spanner_project,
            spanner_instance,
            spanner_database,
            spanner_region,
            service_port,
            service_host,
        })
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.service_host, self.service_port)
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Store backend: {}", self.store_backend);
        if self.store_backend == StoreBackend::Spanner {
            tracing::info!("  Spanner emulator: {}",
                self.spanner_emulator_host.as_deref().unwrap_or("disabled (using production)"));
            tracing::info!("  Spanner project: {}", self.spanner_project);
            tracing::info!("  Spanner instance: {}", self.spanner_instance);
            tracing::info!("  Spanner database: {}", self.spanner_database);
            tracing::info!("  Spanner region: {}", self.spanner_region);
        }
        tracing::info!("  Service listening on: {}", self.bind_addr());
    }
}
