//! Link-header pagination over organization repository listings.

use std::collections::HashSet;

use coursehub_core::credentials::Credential;
use coursehub_core::error::{CoursehubError, Result};
use tracing::{debug, warn};

use crate::client::GitHubClient;
use crate::models::GitHubRepo;

/// Extract the `rel="next"` target from a GitHub `Link` header.
///
/// e.g. `<https://api.github.com/organizations/1/repos?page=2>; rel="next", <...>; rel="last"`
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let url = target.strip_prefix('<')?.strip_suffix('>')?;
        let is_next = parts.any(|param| {
            let param = param.trim();
            param
                .strip_prefix("rel=")
                .map(|rel| rel.trim_matches('"').split_whitespace().any(|r| r == "next"))
                .unwrap_or(false)
        });
        is_next.then(|| url.to_string())
    })
}

/// A lazy, restartable walk over the pages of a repository listing.
///
/// Each call to [`RepoPages::next_page`] issues at most one request. The walk
/// ends when GitHub stops sending a `next` link, when the link points at a
/// page already read, or when `max_pages` pages have been fetched. A `next`
/// link outside the API origin is refused with an error.
pub struct RepoPages<'a> {
    client: &'a GitHubClient,
    credential: Credential,
    first_url: String,
    next_url: Option<String>,
    max_pages: Option<u32>,
    fetched: u32,
    visited: HashSet<String>,
}

impl<'a> RepoPages<'a> {
    pub(crate) fn new(
        client: &'a GitHubClient,
        credential: Credential,
        first_url: String,
        max_pages: Option<u32>,
    ) -> Self {
        Self {
            client,
            credential,
            next_url: Some(first_url.clone()),
            first_url,
            max_pages,
            fetched: 0,
            visited: HashSet::new(),
        }
    }

    /// Fetch the next page, or `None` once the listing is exhausted.
    ///
    /// A failed request leaves the cursor where it was, so calling again
    /// retries the same page.
    pub async fn next_page(&mut self) -> Result<Option<Vec<GitHubRepo>>> {
        if self.max_pages.is_some_and(|max| self.fetched >= max) {
            return Ok(None);
        }
        let Some(url) = self.next_url.clone() else {
            return Ok(None);
        };
        if !self.client.is_api_origin(&url) {
            warn!(url = %url, "pagination link leaves the API origin");
            return Err(CoursehubError::GitHub(format!(
                "refusing to follow pagination link outside the API origin: {url}"
            )));
        }

        debug!(url = %url, page = self.fetched + 1, "fetching repository page");
        let page = self
            .client
            .list_repositories_page(&self.credential, &url)
            .await?;

        self.fetched += 1;
        self.visited.insert(url);
        self.next_url = page.next.filter(|next| !self.visited.contains(next));
        Ok(Some(page.repos))
    }

    /// Rewind to the first page.
    pub fn restart(&mut self) {
        self.next_url = Some(self.first_url.clone());
        self.fetched = 0;
        self.visited.clear();
    }

    /// Number of pages fetched since the walk started or was restarted.
    pub fn pages_fetched(&self) -> u32 {
        self.fetched
    }

    /// Drain the remaining pages into one list, in API order.
    pub async fn collect_all(&mut self) -> Result<Vec<GitHubRepo>> {
        let mut repos = Vec::new();
        while let Some(page) = self.next_page().await? {
            repos.extend(page);
        }
        Ok(repos)
    }
}
