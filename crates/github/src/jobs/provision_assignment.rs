//! Bulk provisioning of one repository per roster student.

use std::sync::Arc;

use tracing::info;

use coursehub_core::jobs::JobContext;
use coursehub_core::models::course::Course;
use coursehub_core::models::permission::RepositoryPermission;
use coursehub_core::models::roster::RosterStudent;

use crate::service::{Creation, GrantResult, ProvisionOutcome, RepositoryLifecycle, SkipReason};

/// Tally of a provisioning run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisioningSummary {
    pub created: usize,
    pub existing: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Repositories that exist but whose collaborator grant failed.
    pub grant_failures: usize,
}

/// Provisions `<prefix>-<login>` for every student on a roster.
///
/// Students without a GitHub login are skipped. Errors for one student are
/// logged and counted; the job always runs to the end of the roster.
pub struct ProvisionAssignmentRepositoriesJob<S: RepositoryLifecycle + ?Sized> {
    course: Course,
    service: Arc<S>,
    students: Vec<RosterStudent>,
    repo_prefix: String,
    is_private: bool,
    permission: RepositoryPermission,
}

impl<S: RepositoryLifecycle + ?Sized> ProvisionAssignmentRepositoriesJob<S> {
    pub fn new(
        course: Course,
        service: Arc<S>,
        students: Vec<RosterStudent>,
        repo_prefix: &str,
        is_private: bool,
        permission: RepositoryPermission,
    ) -> Self {
        Self {
            course,
            service,
            students,
            repo_prefix: repo_prefix.to_string(),
            is_private,
            permission,
        }
    }

    pub async fn run(&self, ctx: &dyn JobContext) -> ProvisioningSummary {
        let prefix = self.repo_prefix.as_str();
        ctx.log(&format!(
            "Starting provisioning of {} repositories with prefix: {prefix}",
            self.students.len()
        ));

        let mut summary = ProvisioningSummary::default();

        for student in &self.students {
            if student.login().is_none() {
                ctx.log(&format!(
                    "Skipped student {}: no GitHub login",
                    student.student_id
                ));
                summary.skipped += 1;
                continue;
            }

            let result = self
                .service
                .provision_repository(
                    &self.course,
                    student,
                    prefix,
                    self.is_private,
                    self.permission,
                )
                .await;

            match result {
                Ok(ProvisionOutcome::Provisioned {
                    repo_name,
                    creation,
                    grant,
                }) => {
                    match creation {
                        Creation::Created => {
                            ctx.log(&format!("Created: {repo_name}"));
                            summary.created += 1;
                        }
                        Creation::AlreadyExisted | Creation::CreatedConcurrently => {
                            ctx.log(&format!("Already exists: {repo_name}"));
                            summary.existing += 1;
                        }
                    }
                    if let GrantResult::Failed(reason) = grant {
                        ctx.log(&format!(
                            "Could not grant {} access to {repo_name}: {reason}",
                            self.permission
                        ));
                        summary.grant_failures += 1;
                    }
                }
                Ok(ProvisionOutcome::Skipped { repo_name, reason }) => {
                    let detail = match reason {
                        SkipReason::UnexpectedStatus(status) => {
                            format!("unexpected status {status}")
                        }
                        SkipReason::Unreachable(e) => e,
                    };
                    ctx.log(&format!("Skipped {repo_name}: {detail}"));
                    summary.skipped += 1;
                }
                Err(e) => {
                    ctx.log(&format!(
                        "Failed to provision repository for {}: {e}",
                        student.student_id
                    ));
                    summary.failed += 1;
                }
            }
        }

        ctx.log(&format!(
            "Provisioning complete. Created: {}, Existing: {}, Skipped: {}, Failed: {}",
            summary.created, summary.existing, summary.skipped, summary.failed
        ));

        info!(
            org = %self.course.org_name,
            prefix,
            created = summary.created,
            existing = summary.existing,
            skipped = summary.skipped,
            failed = summary.failed,
            grant_failures = summary.grant_failures,
            "assignment repository provisioning finished"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::testing::{FakeLifecycle, ProvisionBehavior};
    use coursehub_core::jobs::MemoryJobContext;
    use reqwest::StatusCode;

    fn course() -> Course {
        Course::new("test-org", "123")
    }

    fn roster() -> Vec<RosterStudent> {
        vec![
            RosterStudent::with_login("A1", "alice"),
            RosterStudent::with_login("A2", "bob"),
            RosterStudent::with_login("A3", "carol"),
        ]
    }

    fn job(
        fake: Arc<FakeLifecycle>,
        students: Vec<RosterStudent>,
    ) -> ProvisionAssignmentRepositoriesJob<FakeLifecycle> {
        ProvisionAssignmentRepositoriesJob::new(
            course(),
            fake,
            students,
            "jpa01",
            true,
            RepositoryPermission::Write,
        )
    }

    #[tokio::test]
    async fn provisions_every_student_in_order() {
        let fake = Arc::new(FakeLifecycle::with_repos(&[]));
        let ctx = MemoryJobContext::new();

        let summary = job(fake.clone(), roster()).run(&ctx).await;

        assert_eq!(summary.created, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(
            fake.provisioned(),
            vec!["jpa01-alice", "jpa01-bob", "jpa01-carol"]
        );
        assert!(ctx.contains("Created: jpa01-bob"));
        assert!(ctx.contains(
            "Provisioning complete. Created: 3, Existing: 0, Skipped: 0, Failed: 0"
        ));
    }

    #[tokio::test]
    async fn mixed_outcomes_are_tallied() {
        let fake = Arc::new(
            FakeLifecycle::with_repos(&[])
                .provision_as("alice", ProvisionBehavior::Exists)
                .provision_as("bob", ProvisionBehavior::Skip(StatusCode::FORBIDDEN))
                .provision_as("carol", ProvisionBehavior::Fail("revoked".into())),
        );
        let ctx = MemoryJobContext::new();

        let summary = job(fake.clone(), roster()).run(&ctx).await;

        assert_eq!(
            summary,
            ProvisioningSummary {
                created: 0,
                existing: 1,
                skipped: 1,
                failed: 1,
                grant_failures: 0,
            }
        );
        assert!(ctx.contains("Already exists: jpa01-alice"));
        assert!(ctx.contains("Skipped jpa01-bob: unexpected status 403 Forbidden"));
        assert!(ctx.contains("Failed to provision repository for A3"));
    }

    #[tokio::test]
    async fn grant_failure_is_logged_but_repo_counts() {
        let fake = Arc::new(
            FakeLifecycle::with_repos(&[]).provision_as("alice", ProvisionBehavior::GrantFails),
        );
        let ctx = MemoryJobContext::new();

        let summary = job(fake, vec![RosterStudent::with_login("A1", "alice")])
            .run(&ctx)
            .await;

        assert_eq!(summary.created, 1);
        assert_eq!(summary.grant_failures, 1);
        assert!(ctx.contains("Could not grant write access to jpa01-alice"));
    }

    #[tokio::test]
    async fn students_without_login_are_skipped() {
        let fake = Arc::new(FakeLifecycle::with_repos(&[]));
        let ctx = MemoryJobContext::new();
        let mut unlinked = RosterStudent::with_login("A9", "");
        unlinked.github_login = None;

        let summary = job(
            fake.clone(),
            vec![unlinked, RosterStudent::with_login("A1", "alice")],
        )
        .run(&ctx)
        .await;

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.created, 1);
        assert_eq!(fake.provisioned(), vec!["jpa01-alice"]);
        assert!(ctx.contains("Skipped student A9: no GitHub login"));
    }
}
