//! Typed reqwest wrapper for the GitHub repositories API.

use std::time::Duration;

use coursehub_core::config::GitHubConfig;
use coursehub_core::credentials::Credential;
use coursehub_core::error::{CoursehubError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, LINK};
use reqwest::{StatusCode, Url};

use crate::models::{CollaboratorRequest, CreateRepoRequest, GitHubRepo};
use crate::pagination::{parse_next_link, RepoPages};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";

/// Result of probing `GET /repos/{org}/{repo}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoExistence {
    Found,
    NotFound,
    UnexpectedStatus(StatusCode),
}

/// Result of `POST /orgs/{org}/repos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// GitHub rejected the create because the name is already taken,
    /// typically because another caller created it first.
    AlreadyExists,
}

/// One page of an organization repository listing.
#[derive(Debug, Clone)]
pub struct RepoPage {
    pub repos: Vec<GitHubRepo>,
    /// URL of the following page, from the `Link: rel="next"` header.
    pub next: Option<String>,
}

/// HTTP client for GitHub repository operations.
///
/// Every request carries the GitHub media type and API version headers; the
/// bearer token is supplied per call so one client can serve many courses.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
}

impl GitHubClient {
    /// Create a client from the `[github]` configuration section.
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            API_VERSION_HEADER,
            HeaderValue::from_str(&config.api_version).map_err(|e| {
                CoursehubError::Config(format!("invalid github.api_version header value: {e}"))
            })?,
        );

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        let client = Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        };
        client.endpoint(&[])?;
        Ok(client)
    }

    /// Override the base URL (for testing with wiremock).
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// `base_url` with `segments` appended as percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            CoursehubError::Config(format!("invalid github.api_url {}: {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                CoursehubError::Config(format!(
                    "github.api_url cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn repo_url(&self, org: &str, repo: &str) -> Result<Url> {
        self.endpoint(&["repos", org, repo])
    }

    fn org_repos_url(&self, org: &str) -> Result<Url> {
        self.endpoint(&["orgs", org, "repos"])
    }

    fn collaborator_url(&self, org: &str, repo: &str, login: &str) -> Result<Url> {
        self.endpoint(&["repos", org, repo, "collaborators", login])
    }

    /// True if `url` has the same scheme, host and port as the API base URL.
    ///
    /// Pagination links are only followed when this holds, so the bearer
    /// token never leaves the configured API origin.
    pub(crate) fn is_api_origin(&self, url: &str) -> bool {
        match (Url::parse(&self.base_url), Url::parse(url)) {
            (Ok(base), Ok(other)) => {
                base.scheme() == other.scheme()
                    && base.host_str() == other.host_str()
                    && base.port_or_known_default() == other.port_or_known_default()
            }
            _ => false,
        }
    }

    /// Check whether `org/repo` exists.
    ///
    /// Only transport failures are errors; every HTTP status maps to a
    /// [`RepoExistence`] variant.
    pub async fn check_repository(
        &self,
        credential: &Credential,
        org: &str,
        repo: &str,
    ) -> Result<RepoExistence> {
        let resp = self
            .http
            .get(self.repo_url(org, repo)?)
            .bearer_auth(credential.token())
            .send()
            .await
            .map_err(|e| CoursehubError::GitHub(format!("get repository request failed: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            Ok(RepoExistence::Found)
        } else if status == StatusCode::NOT_FOUND {
            Ok(RepoExistence::NotFound)
        } else {
            Ok(RepoExistence::UnexpectedStatus(status))
        }
    }

    /// Create a repository in `org`.
    ///
    /// A 409, or a 422 reporting that the name already exists, is returned as
    /// [`CreateOutcome::AlreadyExists`] rather than an error.
    pub async fn create_repository(
        &self,
        credential: &Credential,
        org: &str,
        request: &CreateRepoRequest,
    ) -> Result<CreateOutcome> {
        let resp = self
            .http
            .post(self.org_repos_url(org)?)
            .bearer_auth(credential.token())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                CoursehubError::GitHub(format!("create repository request failed: {e}"))
            })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(CreateOutcome::Created);
        }

        let body = resp.text().await.unwrap_or_default();
        if status == StatusCode::CONFLICT
            || (status == StatusCode::UNPROCESSABLE_ENTITY && body.contains("already exists"))
        {
            return Ok(CreateOutcome::AlreadyExists);
        }

        Err(CoursehubError::GitHub(format!(
            "create repository {org}/{} failed ({status}): {body}",
            request.name
        )))
    }

    /// Invite `login` as a collaborator on `org/repo` with the given API
    /// permission name, or update an existing invitation.
    pub async fn add_collaborator(
        &self,
        credential: &Credential,
        org: &str,
        repo: &str,
        login: &str,
        permission: &str,
    ) -> Result<()> {
        let body = CollaboratorRequest {
            permission: permission.to_string(),
        };
        let resp = self
            .http
            .put(self.collaborator_url(org, repo, login)?)
            .bearer_auth(credential.token())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                CoursehubError::GitHub(format!("add collaborator request failed: {e}"))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CoursehubError::GitHub(format!(
                "add collaborator {login} to {org}/{repo} failed ({status}): {body}"
            )));
        }

        Ok(())
    }

    /// Fetch one page of an organization repository listing by absolute URL.
    pub async fn list_repositories_page(
        &self,
        credential: &Credential,
        url: &str,
    ) -> Result<RepoPage> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(credential.token())
            .send()
            .await
            .map_err(|e| {
                CoursehubError::GitHub(format!("list repositories request failed: {e}"))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CoursehubError::GitHub(format!(
                "list repositories failed ({status}): {body}"
            )));
        }

        let next = resp
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_next_link);

        let repos = resp.json::<Vec<GitHubRepo>>().await.map_err(|e| {
            CoursehubError::Serialization(format!("list repositories parse failed: {e}"))
        })?;

        Ok(RepoPage { repos, next })
    }

    /// Lazily page through the repositories of `org`.
    ///
    /// `max_pages` bounds how many pages are fetched; `None` follows every
    /// `next` link.
    pub fn org_repositories(
        &self,
        credential: &Credential,
        org: &str,
        per_page: u32,
        max_pages: Option<u32>,
    ) -> Result<RepoPages<'_>> {
        let mut first_url = self.org_repos_url(org)?;
        first_url
            .query_pairs_mut()
            .append_pair("per_page", &per_page.to_string());
        Ok(RepoPages::new(
            self,
            credential.clone(),
            first_url.into(),
            max_pages,
        ))
    }

    /// Delete `org/repo`.
    pub async fn delete_repository(
        &self,
        credential: &Credential,
        org: &str,
        repo: &str,
    ) -> Result<()> {
        let resp = self
            .http
            .delete(self.repo_url(org, repo)?)
            .bearer_auth(credential.token())
            .send()
            .await
            .map_err(|e| {
                CoursehubError::GitHub(format!("delete repository request failed: {e}"))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CoursehubError::GitHub(format!(
                "delete repository {org}/{repo} failed ({status}): {body}"
            )));
        }

        Ok(())
    }
}
