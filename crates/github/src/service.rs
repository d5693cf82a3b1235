//! Student repository lifecycle: provision, list by prefix, delete.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, error, info, warn};

use coursehub_core::config::GitHubConfig;
use coursehub_core::credentials::CredentialProvider;
use coursehub_core::error::{CoursehubError, Result};
use coursehub_core::models::course::Course;
use coursehub_core::models::permission::RepositoryPermission;
use coursehub_core::models::roster::RosterStudent;

use crate::client::{CreateOutcome, GitHubClient, RepoExistence};
use crate::models::CreateRepoRequest;

/// How the repository came to exist during provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Creation {
    /// The existence check found it.
    AlreadyExisted,
    Created,
    /// The create call lost a race with another caller.
    CreatedConcurrently,
}

/// Outcome of the collaborator grant step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantResult {
    Granted,
    Failed(String),
}

/// Why provisioning stopped before creating or granting anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnexpectedStatus(StatusCode),
    Unreachable(String),
}

/// Result of [`RepositoryLifecycle::provision_repository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Provisioned {
        repo_name: String,
        creation: Creation,
        grant: GrantResult,
    },
    Skipped {
        repo_name: String,
        reason: SkipReason,
    },
}

impl ProvisionOutcome {
    pub fn repo_name(&self) -> &str {
        match self {
            Self::Provisioned { repo_name, .. } | Self::Skipped { repo_name, .. } => repo_name,
        }
    }
}

/// Name of a student's repository for an assignment or project prefix.
pub fn student_repo_name(prefix: &str, login: &str) -> String {
    format!("{prefix}-{login}")
}

/// Repository operations the bulk jobs are written against.
#[async_trait]
pub trait RepositoryLifecycle: Send + Sync {
    /// Create `<prefix>-<login>` if it does not exist, then grant the student
    /// `permission` on it.
    ///
    /// An unexpected status from the existence check yields
    /// [`ProvisionOutcome::Skipped`] rather than an error, and a failed grant
    /// is reported in the outcome, never as an error.
    async fn provision_repository(
        &self,
        course: &Course,
        student: &RosterStudent,
        name_prefix: &str,
        is_private: bool,
        permission: RepositoryPermission,
    ) -> Result<ProvisionOutcome>;

    /// Names of the organization's repositories starting with `<prefix>-`,
    /// in the order GitHub lists them.
    async fn list_repositories_by_prefix(&self, course: &Course, prefix: &str)
        -> Result<Vec<String>>;

    async fn delete_repository(&self, course: &Course, repo_name: &str) -> Result<()>;
}

/// [`RepositoryLifecycle`] backed by the GitHub REST API.
pub struct RepositoryService<P: CredentialProvider> {
    client: GitHubClient,
    credentials: Arc<P>,
    per_page: u32,
    max_pages: Option<u32>,
}

impl<P: CredentialProvider> RepositoryService<P> {
    /// Create a service with listing limits taken from `config`.
    pub fn new(client: GitHubClient, credentials: Arc<P>, config: &GitHubConfig) -> Self {
        Self {
            client,
            credentials,
            per_page: config.per_page,
            max_pages: config.max_pages,
        }
    }

    /// Override the listing page limit (`Some(1)` reads a single page).
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }
}

#[async_trait]
impl<P: CredentialProvider> RepositoryLifecycle for RepositoryService<P> {
    async fn provision_repository(
        &self,
        course: &Course,
        student: &RosterStudent,
        name_prefix: &str,
        is_private: bool,
        permission: RepositoryPermission,
    ) -> Result<ProvisionOutcome> {
        if name_prefix.is_empty() {
            return Err(CoursehubError::InvalidInput(
                "repository name prefix must not be empty".into(),
            ));
        }
        let login = student.login().ok_or_else(|| {
            CoursehubError::InvalidInput(format!(
                "student {} has no GitHub login",
                student.student_id
            ))
        })?;

        let org = course.org_name.as_str();
        let repo_name = student_repo_name(name_prefix, login);
        let credential = self.credentials.credential(course).await?;

        let existence = match self
            .client
            .check_repository(&credential, org, &repo_name)
            .await
        {
            Ok(existence) => existence,
            Err(e) => {
                warn!(org, repo = %repo_name, error = %e, "could not check repository existence");
                return Ok(ProvisionOutcome::Skipped {
                    repo_name,
                    reason: SkipReason::Unreachable(e.to_string()),
                });
            }
        };

        let creation = match existence {
            RepoExistence::Found => {
                debug!(org, repo = %repo_name, "repository already exists");
                Creation::AlreadyExisted
            }
            RepoExistence::NotFound => {
                let request = CreateRepoRequest {
                    name: repo_name.clone(),
                    private: is_private,
                };
                match self
                    .client
                    .create_repository(&credential, org, &request)
                    .await?
                {
                    CreateOutcome::Created => {
                        info!(org, repo = %repo_name, private = is_private, "created repository");
                        Creation::Created
                    }
                    CreateOutcome::AlreadyExists => {
                        info!(org, repo = %repo_name, "repository was created concurrently");
                        Creation::CreatedConcurrently
                    }
                }
            }
            RepoExistence::UnexpectedStatus(status) => {
                warn!(
                    org,
                    repo = %repo_name,
                    %status,
                    "unexpected response code when checking for existence of repository"
                );
                return Ok(ProvisionOutcome::Skipped {
                    repo_name,
                    reason: SkipReason::UnexpectedStatus(status),
                });
            }
        };

        let grant = match self
            .client
            .add_collaborator(&credential, org, &repo_name, login, permission.api_name())
            .await
        {
            Ok(()) => GrantResult::Granted,
            Err(e) => {
                warn!(org, repo = %repo_name, login, error = %e, "failed to grant repository access");
                GrantResult::Failed(e.to_string())
            }
        };

        Ok(ProvisionOutcome::Provisioned {
            repo_name,
            creation,
            grant,
        })
    }

    async fn list_repositories_by_prefix(
        &self,
        course: &Course,
        prefix: &str,
    ) -> Result<Vec<String>> {
        let credential = self.credentials.credential(course).await?;
        let org = course.org_name.as_str();
        let needle = format!("{prefix}-");

        let mut pages = self
            .client
            .org_repositories(&credential, org, self.per_page, self.max_pages)?;

        let repos = match pages.collect_all().await {
            Ok(repos) => repos,
            Err(e) => {
                error!(org, error = %e, "error listing repositories");
                return Err(e);
            }
        };

        let matching: Vec<String> = repos
            .into_iter()
            .map(|repo| repo.name)
            .filter(|name| name.starts_with(&needle))
            .collect();

        debug!(
            org,
            prefix,
            pages = pages.pages_fetched(),
            matched = matching.len(),
            "listed repositories by prefix"
        );
        Ok(matching)
    }

    async fn delete_repository(&self, course: &Course, repo_name: &str) -> Result<()> {
        let credential = self.credentials.credential(course).await?;
        let org = course.org_name.as_str();

        match self
            .client
            .delete_repository(&credential, org, repo_name)
            .await
        {
            Ok(()) => {
                info!(org, repo = repo_name, "deleted repository");
                Ok(())
            }
            Err(e) => {
                error!(org, repo = repo_name, error = %e, "error deleting repository");
                Err(e)
            }
        }
    }
}
