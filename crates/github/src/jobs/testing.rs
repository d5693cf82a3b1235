//! In-memory [`RepositoryLifecycle`] used by the job tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use coursehub_core::error::{CoursehubError, Result};
use coursehub_core::models::course::Course;
use coursehub_core::models::permission::RepositoryPermission;
use coursehub_core::models::roster::RosterStudent;

use crate::service::{
    student_repo_name, Creation, GrantResult, ProvisionOutcome, RepositoryLifecycle, SkipReason,
};

#[derive(Debug, Clone)]
pub enum ProvisionBehavior {
    Exists,
    GrantFails,
    Skip(StatusCode),
    Fail(String),
}

#[derive(Default)]
pub struct FakeLifecycle {
    repos: Vec<String>,
    list_error: Option<String>,
    delete_errors: HashMap<String, String>,
    behaviors: HashMap<String, ProvisionBehavior>,
    listed: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    provisioned: Mutex<Vec<String>>,
}

impl FakeLifecycle {
    pub fn with_repos(repos: &[&str]) -> Self {
        Self {
            repos: repos.iter().map(|r| r.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing_list(mut self, message: &str) -> Self {
        self.list_error = Some(message.to_string());
        self
    }

    pub fn failing_delete(mut self, repo: &str, message: &str) -> Self {
        self.delete_errors
            .insert(repo.to_string(), message.to_string());
        self
    }

    pub fn provision_as(mut self, login: &str, behavior: ProvisionBehavior) -> Self {
        self.behaviors.insert(login.to_string(), behavior);
        self
    }

    pub fn listed_prefixes(&self) -> Vec<String> {
        self.listed.lock().unwrap().clone()
    }

    /// Every repository a delete was attempted on, in call order.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn provisioned(&self) -> Vec<String> {
        self.provisioned.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositoryLifecycle for FakeLifecycle {
    async fn provision_repository(
        &self,
        _course: &Course,
        student: &RosterStudent,
        name_prefix: &str,
        _is_private: bool,
        _permission: RepositoryPermission,
    ) -> Result<ProvisionOutcome> {
        let login = student.login().unwrap_or_default();
        let repo_name = student_repo_name(name_prefix, login);
        self.provisioned.lock().unwrap().push(repo_name.clone());

        let outcome = match self.behaviors.get(login) {
            None => ProvisionOutcome::Provisioned {
                repo_name,
                creation: Creation::Created,
                grant: GrantResult::Granted,
            },
            Some(ProvisionBehavior::Exists) => ProvisionOutcome::Provisioned {
                repo_name,
                creation: Creation::AlreadyExisted,
                grant: GrantResult::Granted,
            },
            Some(ProvisionBehavior::GrantFails) => ProvisionOutcome::Provisioned {
                repo_name,
                creation: Creation::Created,
                grant: GrantResult::Failed("422 Unprocessable Entity".into()),
            },
            Some(ProvisionBehavior::Skip(status)) => ProvisionOutcome::Skipped {
                repo_name,
                reason: SkipReason::UnexpectedStatus(*status),
            },
            Some(ProvisionBehavior::Fail(message)) => {
                return Err(CoursehubError::Credential(message.clone()))
            }
        };
        Ok(outcome)
    }

    async fn list_repositories_by_prefix(
        &self,
        _course: &Course,
        prefix: &str,
    ) -> Result<Vec<String>> {
        self.listed.lock().unwrap().push(prefix.to_string());
        if let Some(message) = &self.list_error {
            return Err(CoursehubError::GitHub(message.clone()));
        }
        let needle = format!("{prefix}-");
        Ok(self
            .repos
            .iter()
            .filter(|r| r.starts_with(&needle))
            .cloned()
            .collect())
    }

    async fn delete_repository(&self, _course: &Course, repo_name: &str) -> Result<()> {
        self.deleted.lock().unwrap().push(repo_name.to_string());
        match self.delete_errors.get(repo_name) {
            Some(message) => Err(CoursehubError::GitHub(message.clone())),
            None => Ok(()),
        }
    }
}
