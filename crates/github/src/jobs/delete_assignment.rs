//! Bulk deletion of every repository created for one assignment.

use std::sync::Arc;

use tracing::info;

use coursehub_core::error::Result;
use coursehub_core::jobs::JobContext;
use coursehub_core::models::course::Course;

use crate::service::RepositoryLifecycle;

/// Tally of a deletion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Deletes all repositories named `<assignment>-*` in a course organization.
///
/// Individual deletion failures are logged and counted; only a failure to
/// list the repositories ends the job with an error.
pub struct DeleteAssignmentRepositoriesJob<S: RepositoryLifecycle + ?Sized> {
    course: Course,
    service: Arc<S>,
    assignment_name: String,
}

impl<S: RepositoryLifecycle + ?Sized> DeleteAssignmentRepositoriesJob<S> {
    pub fn new(course: Course, service: Arc<S>, assignment_name: &str) -> Self {
        Self {
            course,
            service,
            assignment_name: assignment_name.to_string(),
        }
    }

    pub async fn run(&self, ctx: &dyn JobContext) -> Result<DeletionSummary> {
        let assignment = self.assignment_name.as_str();
        ctx.log(&format!(
            "Starting deletion of repos for assignment: {assignment}"
        ));

        let repos = self
            .service
            .list_repositories_by_prefix(&self.course, assignment)
            .await?;

        let mut summary = DeletionSummary::default();

        if repos.is_empty() {
            ctx.log(&format!(
                "No repositories found matching prefix: {assignment}"
            ));
            return Ok(summary);
        }

        ctx.log(&format!("Found {} repositories to delete", repos.len()));

        for repo_name in &repos {
            match self.service.delete_repository(&self.course, repo_name).await {
                Ok(()) => {
                    ctx.log(&format!("Successfully deleted: {repo_name}"));
                    summary.succeeded += 1;
                }
                Err(e) => {
                    ctx.log(&format!("Failed to delete {repo_name}: {e}"));
                    summary.failed += 1;
                }
            }
        }

        ctx.log(&format!(
            "Deletion complete. Success: {}, Failed: {}",
            summary.succeeded, summary.failed
        ));

        info!(
            org = %self.course.org_name,
            assignment,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "assignment repository deletion finished"
        );

        Ok(summary)
    }
}
