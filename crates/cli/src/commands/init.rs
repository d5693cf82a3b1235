use std::path::Path;

use coursehub_core::config::CoursehubConfig;
use tracing::info;

/// Run the `init` command: write a default configuration file.
pub fn run(config_path: &str, force: bool) -> anyhow::Result<()> {
    let path = Path::new(config_path);

    if path.exists() && !force {
        anyhow::bail!(
            "configuration file {config_path} already exists. Use --force to overwrite it."
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
            info!("Created directory: {}", parent.display());
        }
    }

    let config = CoursehubConfig::generate_default();
    config.save(path)?;
    info!("Wrote default configuration: {config_path}");

    println!("Coursehub initialized!");
    println!("  Config: {config_path}");
    println!(
        "  Export an installation token in ${} before running other commands.",
        config.github.token_env
    );

    Ok(())
}
