//! Application configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Result, ServiceError};
use crate::store::DocumentKind;

/// Origin value meaning "any origin".
pub const ANY_ORIGIN: &str = "*";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Address to bind the HTTP server to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    // === Document Storage ===
    /// Contribution settings file.
    #[serde(default = "default_contribution_file")]
    pub contribution_file: PathBuf,

    /// Year-to-date data file.
    #[serde(default = "default_ytd_file")]
    pub ytd_file: PathBuf,

    // === Cross-Origin Policy ===
    /// Allowed origins, comma separated. `*` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// Whether cross-origin requests may carry credentials.
    #[serde(default = "default_true")]
    pub cors_allow_credentials: bool,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::from([127, 0, 0, 1])
}

fn default_port() -> u16 {
    8000
}

fn default_contribution_file() -> PathBuf {
    PathBuf::from(DocumentKind::Contribution.default_file_name())
}

fn default_ytd_file() -> PathBuf {
    PathBuf::from(DocumentKind::Ytd.default_file_name())
}

fn default_cors_origins() -> Vec<String> {
    vec![ANY_ORIGIN.to_string()]
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(ServiceError::InvalidConfig("PORT must be non-zero".to_string()));
        }

        if self.contribution_file.as_os_str().is_empty() || self.ytd_file.as_os_str().is_empty() {
            return Err(ServiceError::InvalidConfig(
                "CONTRIBUTION_FILE and YTD_FILE must not be empty".to_string(),
            ));
        }

        if self.contribution_file == self.ytd_file {
            return Err(ServiceError::InvalidConfig(
                "CONTRIBUTION_FILE and YTD_FILE must be different files".to_string(),
            ));
        }

        let origins: Vec<&str> = self.origins().collect();
        if origins.is_empty() {
            return Err(ServiceError::InvalidConfig(
                "CORS_ALLOWED_ORIGINS must list at least one origin".to_string(),
            ));
        }

        if origins.len() > 1 && origins.contains(&ANY_ORIGIN) {
            return Err(ServiceError::InvalidConfig(
                "CORS_ALLOWED_ORIGINS cannot mix * with explicit origins".to_string(),
            ));
        }

        Ok(())
    }

    /// Socket address the server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Configured origins with blanks dropped.
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.cors_allowed_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
    }

    /// Whether every origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.origins().any(|origin| origin == ANY_ORIGIN)
    }

    /// Backing file for the given document.
    pub fn document_path(&self, kind: DocumentKind) -> &PathBuf {
        match kind {
            DocumentKind::Contribution => &self.contribution_file,
            DocumentKind::Ytd => &self.ytd_file,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            contribution_file: default_contribution_file(),
            ytd_file: default_ytd_file(),
            cors_allowed_origins: default_cors_origins(),
            cors_allow_credentials: default_true(),
            rust_log: default_log_level(),
            log_json: false,
        }
    }
}
