//! GitHub REST API request/response structs.

use serde::{Deserialize, Serialize};

/// A repository as returned by the organization repository listing.
///
/// Only the fields Coursehub reads are modelled; the rest are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubRepo {
    pub name: String,
}

/// Body of `POST /orgs/{org}/repos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateRepoRequest {
    pub name: String,
    pub private: bool,
}

/// Body of `PUT /repos/{owner}/{repo}/collaborators/{username}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollaboratorRequest {
    pub permission: String,
}
