use serde::{Deserialize, Serialize};

/// A course backed by a GitHub organization.
///
/// `installation_id` identifies the GitHub App installation whose token
/// scopes every call made on behalf of the course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub org_name: String,
    pub installation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
}

impl Course {
    pub fn new(org_name: &str, installation_id: &str) -> Self {
        Self {
            org_name: org_name.to_string(),
            installation_id: installation_id.to_string(),
            course_name: None,
        }
    }
}
