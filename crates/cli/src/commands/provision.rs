use coursehub_core::jobs::TracingJobContext;
use coursehub_core::models::course::Course;
use coursehub_core::models::permission::RepositoryPermission;
use coursehub_core::models::roster::RosterStudent;
use coursehub_github::jobs::{ProvisionAssignmentRepositoriesJob, ProvisioningSummary};
use tracing::info;

use super::{build_service, load_config};

/// Run the `provision` command: create and grant one repository per student.
pub async fn run(
    config_path: &str,
    org: &str,
    installation_id: &str,
    prefix: &str,
    logins: &[String],
    public: bool,
    permission: Option<&str>,
) -> anyhow::Result<ProvisioningSummary> {
    let config = load_config(config_path)?;

    if prefix.is_empty() {
        anyhow::bail!("--prefix must not be empty");
    }

    let permission: RepositoryPermission = match permission {
        Some(name) => name.parse()?,
        None => config.provisioning.permission,
    };
    let is_private = !public && config.provisioning.private;

    let service = build_service(&config)?;
    let course = Course::new(org, installation_id);
    let students: Vec<RosterStudent> = logins
        .iter()
        .map(|login| RosterStudent::with_login(login, login))
        .collect();

    info!(org, prefix, students = students.len(), %permission, is_private, "Starting provisioning");

    let job = ProvisionAssignmentRepositoriesJob::new(
        course,
        service,
        students,
        prefix,
        is_private,
        permission,
    );
    let summary = job.run(&TracingJobContext::new("provision")).await;

    println!("Provisioning finished for {org}/{prefix}-*");
    println!("  Created:        {}", summary.created);
    println!("  Already there:  {}", summary.existing);
    println!("  Skipped:        {}", summary.skipped);
    println!("  Failed:         {}", summary.failed);
    if summary.grant_failures > 0 {
        println!("  Grant failures: {}", summary.grant_failures);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::write_config;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn provision_requires_config_file() {
        let result = run(
            "/nonexistent/coursehub.toml",
            "o",
            "1",
            "jpa01",
            &["alice".to_string()],
            false,
            None,
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn provision_rejects_unknown_permission() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(&dir, "http://127.0.0.1:9", "COURSEHUB_CLI_TEST_PERM_TOKEN");
        let err = run(
            config.to_str().unwrap(),
            "o",
            "1",
            "jpa01",
            &["alice".to_string()],
            false,
            Some("owner"),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("owner"));
    }

    #[tokio::test]
    async fn provision_public_repo_with_requested_permission() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/test-org/jpa01-alice"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/orgs/test-org/repos"))
            .and(body_json(serde_json::json!({"name": "jpa01-alice", "private": false})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/repos/test-org/jpa01-alice/collaborators/alice"))
            .and(body_json(serde_json::json!({"permission": "maintain"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        std::env::set_var("COURSEHUB_CLI_TEST_PROVISION_TOKEN", "prov-token");
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(&dir, &server.uri(), "COURSEHUB_CLI_TEST_PROVISION_TOKEN");

        let summary = run(
            config.to_str().unwrap(),
            "test-org",
            "1",
            "jpa01",
            &["alice".to_string()],
            true,
            Some("maintain"),
        )
        .await
        .unwrap();
        assert_eq!(summary.created, 1);
        assert_eq!(summary.grant_failures, 0);
    }
}
