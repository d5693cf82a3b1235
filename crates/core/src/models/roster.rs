use serde::{Deserialize, Serialize};

/// A student on a course roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RosterStudent {
    pub student_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// GitHub login, present once the student has linked an account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_login: Option<String>,
}

impl RosterStudent {
    /// Build a roster entry that only carries an id and a GitHub login.
    pub fn with_login(student_id: &str, github_login: &str) -> Self {
        Self {
            student_id: student_id.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: None,
            github_login: Some(github_login.to_string()),
        }
    }

    /// The student's GitHub login, ignoring blank values.
    pub fn login(&self) -> Option<&str> {
        self.github_login
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_present() {
        let student = RosterStudent::with_login("A123", "octocat");
        assert_eq!(student.login(), Some("octocat"));
    }

    #[test]
    fn blank_login_is_none() {
        let mut student = RosterStudent::with_login("A123", "  ");
        assert_eq!(student.login(), None);
        student.github_login = None;
        assert_eq!(student.login(), None);
    }

    #[test]
    fn roster_student_deserializes_minimal() {
        let json = r#"{"studentId":"A1","githubLogin":"cgaucho"}"#;
        let student: RosterStudent = serde_json::from_str(json).unwrap();
        assert_eq!(student.student_id, "A1");
        assert_eq!(student.login(), Some("cgaucho"));
        assert!(student.email.is_none());
    }
}
