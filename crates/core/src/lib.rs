//! Coursehub Core: course, roster, credential, and job-context types shared by
//! the GitHub lifecycle service and the CLI.

pub mod config;
pub mod credentials;
pub mod error;
pub mod jobs;
pub mod models;
