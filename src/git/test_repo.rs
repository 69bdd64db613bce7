//! Throwaway git repositories for tests

use anyhow::{Context, Result};
use git2::{Repository, Signature, Time};
use std::path::Path;

/// Write `files` into the work tree and commit them on top of HEAD (or as the
/// root commit) with a fixed author time of `seconds` since the epoch.
pub(crate) fn commit_files(
    repo: &Repository,
    files: &[(&str, &str)],
    message: &str,
    seconds: i64,
) -> Result<git2::Oid> {
    let workdir = repo.workdir().context("no workdir")?.to_path_buf();
    let mut index = repo.index()?;
    for (path, content) in files {
        let full = workdir.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full, content)?;
        index.add_path(Path::new(path))?;
    }
    index.write()?;
    let tree = repo.find_tree(index.write_tree()?)?;
    let sig = Signature::new("Test User", "test@example.com", &Time::new(seconds, 0))?;
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    Ok(repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?)
}

/// Commit a merge of `other` into HEAD. `files` are the merged contents of
/// the paths that differ from HEAD.
pub(crate) fn merge_commit(
    repo: &Repository,
    other: git2::Oid,
    files: &[(&str, &str)],
    message: &str,
    seconds: i64,
) -> Result<git2::Oid> {
    let workdir = repo.workdir().context("no workdir")?.to_path_buf();
    let mut index = repo.index()?;
    for (path, content) in files {
        let full = workdir.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full, content)?;
        index.add_path(Path::new(path))?;
    }
    index.write()?;
    let tree = repo.find_tree(index.write_tree()?)?;
    let sig = Signature::new("Test User", "test@example.com", &Time::new(seconds, 0))?;
    let head = repo.head()?.peel_to_commit()?;
    let other = repo.find_commit(other)?;
    Ok(repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[&head, &other])?)
}

/// Move the current branch (and work tree) back to `oid`
pub(crate) fn reset_to(repo: &Repository, oid: git2::Oid) -> Result<()> {
    let object = repo.find_object(oid, None)?;
    repo.reset(&object, git2::ResetType::Hard, None)?;
    Ok(())
}

/// Commit a rename of `from` to `to`, content unchanged
pub(crate) fn rename_file(
    repo: &Repository,
    from: &str,
    to: &str,
    message: &str,
    seconds: i64,
) -> Result<git2::Oid> {
    let workdir = repo.workdir().context("no workdir")?.to_path_buf();
    let target = workdir.join(to);
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::rename(workdir.join(from), &target)?;

    let mut index = repo.index()?;
    index.remove_path(Path::new(from))?;
    index.add_path(Path::new(to))?;
    index.write()?;
    let tree = repo.find_tree(index.write_tree()?)?;
    let sig = Signature::new("Test User", "test@example.com", &Time::new(seconds, 0))?;
    let parent = repo.head()?.peel_to_commit()?;
    Ok(repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])?)
}
