//! TOML-based configuration system for Coursehub.

use crate::error::{CoursehubError, Result};
use crate::models::permission::RepositoryPermission;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest page size the GitHub REST API accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Top-level Coursehub configuration, deserialized from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CoursehubConfig {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
}

/// GitHub REST API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Upper bound on pages fetched when listing repositories. Unset follows
    /// every `next` link; `1` only reads the first page.
    #[serde(default)]
    pub max_pages: Option<u32>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Environment variable holding the installation token used by the CLI.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_version: default_api_version(),
            user_agent: default_user_agent(),
            per_page: default_per_page(),
            max_pages: None,
            timeout_secs: default_timeout_secs(),
            token_env: default_token_env(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".into()
}

fn default_api_version() -> String {
    "2022-11-28".into()
}

fn default_user_agent() -> String {
    concat!("coursehub/", env!("CARGO_PKG_VERSION")).into()
}

fn default_per_page() -> u32 {
    MAX_PER_PAGE
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".into()
}

/// Defaults applied when provisioning student repositories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    #[serde(default = "default_private")]
    pub private: bool,
    #[serde(default)]
    pub permission: RepositoryPermission,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            private: default_private(),
            permission: RepositoryPermission::default(),
        }
    }
}

fn default_private() -> bool {
    true
}

impl CoursehubConfig {
    /// Load configuration from a TOML file at the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| CoursehubError::Config(format!("failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Serialize the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CoursehubError::Serialization(format!("failed to write config: {e}")))
    }

    /// Write the configuration to a TOML file at the given path.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Validate the configuration, returning an error for invalid combinations.
    pub fn validate(&self) -> Result<()> {
        let github = &self.github;

        if github.api_url.is_empty() {
            return Err(CoursehubError::Config(
                "github.api_url must not be empty".into(),
            ));
        }

        if !(github.api_url.starts_with("http://") || github.api_url.starts_with("https://")) {
            return Err(CoursehubError::Config(format!(
                "github.api_url must be an http(s) URL: {}",
                github.api_url
            )));
        }

        if github.api_version.is_empty() {
            return Err(CoursehubError::Config(
                "github.api_version must not be empty".into(),
            ));
        }

        if github.user_agent.is_empty() {
            return Err(CoursehubError::Config(
                "github.user_agent must not be empty".into(),
            ));
        }

        if github.per_page == 0 || github.per_page > MAX_PER_PAGE {
            return Err(CoursehubError::Config(format!(
                "github.per_page must be between 1 and {MAX_PER_PAGE}"
            )));
        }

        if github.max_pages == Some(0) {
            return Err(CoursehubError::Config(
                "github.max_pages must be at least 1 when set".into(),
            ));
        }

        if github.timeout_secs == 0 {
            return Err(CoursehubError::Config(
                "github.timeout_secs must be greater than zero".into(),
            ));
        }

        if github.token_env.is_empty() {
            return Err(CoursehubError::Config(
                "github.token_env must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a sensible default configuration.
    pub fn generate_default() -> Self {
        Self {
            github: GitHubConfig::default(),
            provisioning: ProvisioningConfig::default(),
        }
    }
}
