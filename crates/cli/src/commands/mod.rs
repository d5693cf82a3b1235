pub mod delete_assignment;
pub mod init;
pub mod list;
pub mod provision;

use std::path::Path;
use std::sync::Arc;

use coursehub_core::config::CoursehubConfig;
use coursehub_core::credentials::EnvCredentialProvider;
use coursehub_github::client::GitHubClient;
use coursehub_github::service::RepositoryService;

/// Load and validate the configuration file.
pub fn load_config(config_path: &str) -> anyhow::Result<CoursehubConfig> {
    let path = Path::new(config_path);
    if !path.exists() {
        anyhow::bail!(
            "configuration file {config_path} not found. Run `coursehub init` to create one."
        );
    }
    let config = CoursehubConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

/// Build the GitHub-backed lifecycle service, reading the token from the
/// environment variable named by `github.token_env`.
pub fn build_service(
    config: &CoursehubConfig,
) -> anyhow::Result<Arc<RepositoryService<EnvCredentialProvider>>> {
    let client = GitHubClient::new(&config.github)?;
    let credentials = Arc::new(EnvCredentialProvider::new(&config.github.token_env));
    Ok(Arc::new(RepositoryService::new(
        client,
        credentials,
        &config.github,
    )))
}
