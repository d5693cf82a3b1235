//! Coursehub GitHub: student repository lifecycle against the GitHub REST API.
//!
//! This crate provisions per-student repositories (check, create, grant),
//! lists and deletes repositories by assignment prefix, and runs the bulk
//! assignment jobs on top of those operations.

pub mod client;
pub mod jobs;
pub mod models;
pub mod pagination;
pub mod service;
