use coursehub_core::models::course::Course;
use coursehub_github::service::RepositoryLifecycle;

use super::{build_service, load_config};

/// Run the `list` command: print repositories named `<prefix>-*`.
pub async fn run(
    config_path: &str,
    org: &str,
    installation_id: &str,
    prefix: &str,
) -> anyhow::Result<Vec<String>> {
    let config = load_config(config_path)?;
    let service = build_service(&config)?;
    let course = Course::new(org, installation_id);

    let names = service.list_repositories_by_prefix(&course, prefix).await?;

    if names.is_empty() {
        println!("No repositories in {org} match {prefix}-*");
    } else {
        for name in &names {
            println!("{name}");
        }
        println!();
        println!("{} repositories in {org} match {prefix}-*", names.len());
    }

    Ok(names)
}
