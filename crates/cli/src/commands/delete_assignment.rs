use coursehub_core::jobs::TracingJobContext;
use coursehub_core::models::course::Course;
use coursehub_github::jobs::{DeleteAssignmentRepositoriesJob, DeletionSummary};
use coursehub_github::service::RepositoryLifecycle;

use super::{build_service, load_config};

/// Run the `delete-assignment` command.
///
/// Without `confirmed`, only lists what would be deleted and returns `None`.
pub async fn run(
    config_path: &str,
    org: &str,
    installation_id: &str,
    assignment: &str,
    confirmed: bool,
) -> anyhow::Result<Option<DeletionSummary>> {
    let config = load_config(config_path)?;

    if assignment.is_empty() {
        anyhow::bail!("--assignment must not be empty");
    }

    let service = build_service(&config)?;
    let course = Course::new(org, installation_id);

    if !confirmed {
        let names = service
            .list_repositories_by_prefix(&course, assignment)
            .await?;
        println!("{} repositories in {org} would be deleted:", names.len());
        for name in &names {
            println!("  {name}");
        }
        println!();
        println!("Re-run with --yes to delete them.");
        return Ok(None);
    }

    let job = DeleteAssignmentRepositoriesJob::new(course, service, assignment);
    let summary = job
        .run(&TracingJobContext::new("delete-assignment"))
        .await?;

    println!("Deletion finished for {org}/{assignment}-*");
    println!("  Deleted: {}", summary.succeeded);
    println!("  Failed:  {}", summary.failed);

    Ok(Some(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::write_config;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with_two_repos() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orgs/test-org/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "jpa01-alice"},
                {"name": "jpa01-bob"},
                {"name": "lab00-alice"}
            ])))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn without_confirmation_nothing_is_deleted() {
        let server = server_with_two_repos().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        std::env::set_var("COURSEHUB_CLI_TEST_DRY_TOKEN", "dry-token");
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(&dir, &server.uri(), "COURSEHUB_CLI_TEST_DRY_TOKEN");

        let result = run(config.to_str().unwrap(), "test-org", "1", "jpa01", false)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn confirmed_run_deletes_and_tallies() {
        let server = server_with_two_repos().await;
        Mock::given(method("DELETE"))
            .and(path("/repos/test-org/jpa01-alice"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/repos/test-org/jpa01-bob"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        std::env::set_var("COURSEHUB_CLI_TEST_DELETE_TOKEN", "del-token");
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(&dir, &server.uri(), "COURSEHUB_CLI_TEST_DELETE_TOKEN");

        let summary = run(config.to_str().unwrap(), "test-org", "1", "jpa01", true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary, DeletionSummary { succeeded: 1, failed: 1 });
    }
}
