//! Per-course GitHub credentials.
//!
//! Minting installation tokens is the job of whatever sits behind
//! [`CredentialProvider`]. Services ask for a credential on every call and
//! never cache one themselves.

use std::fmt;

use async_trait::async_trait;

use crate::error::{CoursehubError, Result};
use crate::models::course::Course;

/// A short-lived bearer token scoped to one course's organization.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Returns the bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"[redacted]")
            .finish()
    }
}

/// Source of course-scoped credentials.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn credential(&self, course: &Course) -> Result<Credential>;
}

/// Hands out the same fixed token for every course.
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    pub fn single(token: &str) -> Self {
        Self {
            credential: Credential::new(token),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn credential(&self, _course: &Course) -> Result<Credential> {
        Ok(self.credential.clone())
    }
}

/// Reads the token from an environment variable on every request.
pub struct EnvCredentialProvider {
    var: String,
}

impl EnvCredentialProvider {
    pub fn new(var: &str) -> Self {
        Self {
            var: var.to_string(),
        }
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn credential(&self, course: &Course) -> Result<Credential> {
        match std::env::var(&self.var) {
            Ok(token) if !token.trim().is_empty() => Ok(Credential::new(token.trim())),
            _ => Err(CoursehubError::Credential(format!(
                "environment variable {} is not set; cannot authenticate for org {}",
                self.var, course.org_name
            ))),
        }
    }
}
