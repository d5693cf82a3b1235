//! Bulk jobs that report progress through a [`JobContext`](coursehub_core::jobs::JobContext).

pub mod delete_assignment;
pub mod provision_assignment;

pub use delete_assignment::{DeleteAssignmentRepositoriesJob, DeletionSummary};
pub use provision_assignment::{ProvisionAssignmentRepositoriesJob, ProvisioningSummary};

#[cfg(test)]
pub(crate) mod testing;
