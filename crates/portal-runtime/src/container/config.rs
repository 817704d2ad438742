//! # Portal Configuration
//!
//! One TOML file with a section per subsystem, then environment overrides.
//!
//! ```toml
//! [identity]
//! portal_domain = "evans-portal.com"
//! portal_url = "https://evansrenovation.fr"
//!
//! [records]
//! backend = "json_file"
//! path = "./data/clients.json"
//!
//! [certificate]
//! utc_offset_minutes = 60
//! ```
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `PORTAL_CONFIG` | path of the TOML file |
//! | `PORTAL_DOMAIN` | `identity.portal_domain` |
//! | `PORTAL_STORE_PATH` | `records.path`, and selects the JSON file backend |
//! | `PORTAL_VIEWER_BASE` | `viewer.embed_base` |
//! | `PORTAL_UTC_OFFSET_MINUTES` | `certificate.utc_offset_minutes` |

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sp_01_identity::{IdentityConfig, DEFAULT_PORTAL_DOMAIN};
use sp_04_view_router::ViewerConfig;
use sp_05_signature_capture::{CaptureConfig, CertificateConfig};
use thiserror::Error;
use tracing::{info, warn};

/// Landing page linked from onboarding invites.
pub const DEFAULT_PORTAL_URL: &str = "https://evansrenovation.fr";

/// Complete portal configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Login and account configuration.
    pub identity: IdentitySection,
    /// Client record storage.
    pub records: RecordsSection,
    /// Document viewer endpoints.
    pub viewer: ViewerConfig,
    /// Certificate rendering.
    pub certificate: CertificateConfig,
    /// Signature canvas.
    pub capture: CaptureConfig,
}

/// `[identity]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitySection {
    /// Domain appended to bare usernames.
    pub portal_domain: String,
    /// Public portal address used in invites.
    pub portal_url: String,
    /// Federated providers whose assertions are accepted.
    pub trusted_providers: Vec<String>,
    /// Password accounts (Argon2 PHC hashes).
    pub accounts: Vec<AccountEntry>,
    /// Federated subjects bound to portal identities.
    pub federated: Vec<FederatedLink>,
}

impl Default for IdentitySection {
    fn default() -> Self {
        Self {
            portal_domain: DEFAULT_PORTAL_DOMAIN.to_string(),
            portal_url: DEFAULT_PORTAL_URL.to_string(),
            trusted_providers: Vec::new(),
            accounts: Vec::new(),
            federated: Vec::new(),
        }
    }
}

impl IdentitySection {
    pub fn resolver_config(&self) -> IdentityConfig {
        IdentityConfig {
            portal_domain: self.portal_domain.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntry {
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederatedLink {
    pub provider: String,
    pub subject: String,
    pub email: String,
}

/// Where client records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process-local map. Lost on exit.
    #[default]
    Memory,
    /// One JSON document holding every client.
    JsonFile,
}

/// `[records]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsSection {
    pub backend: StoreBackend,
    /// JSON file path, used by the `json_file` backend.
    pub path: PathBuf,
}

impl Default for RecordsSection {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            path: PathBuf::from("./data/clients.json"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Cannot parse config file {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl PortalConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Read a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Load from `PORTAL_CONFIG` (or defaults), apply environment overrides,
    /// then validate.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var("PORTAL_CONFIG") {
            Ok(path) => {
                info!(path = %path, "Loading portal configuration");
                Self::from_file(Path::new(&path))?
            }
            Err(_) => {
                info!("PORTAL_CONFIG not set, using defaults");
                Self::default()
            }
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PORTAL_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(domain) = lookup("PORTAL_DOMAIN") {
            self.identity.portal_domain = domain;
        }
        if let Some(path) = lookup("PORTAL_STORE_PATH") {
            self.records.backend = StoreBackend::JsonFile;
            self.records.path = PathBuf::from(path);
        }
        if let Some(base) = lookup("PORTAL_VIEWER_BASE") {
            self.viewer.embed_base = base;
        }
        if let Some(offset) = lookup("PORTAL_UTC_OFFSET_MINUTES") {
            self.certificate.utc_offset_minutes =
                offset.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    key: "PORTAL_UTC_OFFSET_MINUTES",
                    value: offset.clone(),
                })?;
        }
        Ok(())
    }

    /// Check every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let domain = self.identity.portal_domain.trim();
        if domain.is_empty() || domain.contains('@') {
            return Err(ConfigError::Invalid(format!(
                "portal_domain must be a bare domain, got {:?}",
                self.identity.portal_domain
            )));
        }
        if self.viewer.embed_base.trim().is_empty() {
            return Err(ConfigError::Invalid("viewer.embed_base is empty".into()));
        }
        if self.records.backend == StoreBackend::JsonFile
            && self.records.path.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid("records.path is empty".into()));
        }
        self.capture
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("capture: {e}")))?;
        self.certificate
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("certificate: {e}")))?;
        if self.identity.portal_url.trim().is_empty() {
            warn!("identity.portal_url is empty, invites will carry no link");
        }
        Ok(())
    }
}
