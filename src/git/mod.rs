//! Git data access
//!
//! Revision trees, recent commits with their changed paths, and per-path
//! modification times, all through libgit2.

mod history;

#[cfg(test)]
pub(crate) mod test_repo;

pub use history::{CommitInfo, GitHistory, HeadInfo, RevisionTree};
