//! Git history extraction using libgit2
//!
//! Lists and reads files at a revision, walks recent commits with their
//! changed paths, and finds the latest commit that modified a path, using the
//! git2 crate (Rust bindings to libgit2).

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use git2::{DiffFindOptions, ObjectType, Oid, Repository, Sort, Tree, TreeWalkMode, TreeWalkResult};
use std::collections::{BinaryHeap, HashSet};
use std::path::Path;
use tracing::debug;

/// Paths a commit changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitInfo {
    /// Paths changed relative to the first parent, renames listed under
    /// their new path. Empty for merge commits.
    pub files_changed: Vec<String>,
}

/// Branch and commit HEAD points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadInfo {
    pub branch: String,
    pub short_commit: String,
}

/// Git history analyzer using libgit2.
pub struct GitHistory {
    repo: Repository,
}

impl std::fmt::Debug for GitHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHistory")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl GitHistory {
    /// Open a git repository.
    ///
    /// # Arguments
    /// * `path` - Path to the repository (or any subdirectory)
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("Failed to open git repository at {:?}", path))?;
        debug!("Opened git repository at {:?}", repo.path());
        Ok(Self { repo })
    }

    /// Check if a path is inside a git repository.
    pub fn is_git_repo(path: &Path) -> bool {
        Repository::discover(path).is_ok()
    }

    /// Get the repository root path.
    pub fn repo_root(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .context("Repository has no working directory (bare repo?)")
    }

    /// Branch name and short commit of HEAD, if HEAD resolves.
    pub fn head_info(&self) -> Option<HeadInfo> {
        let head = self.repo.head().ok()?;
        let commit = head.peel_to_commit().ok()?;
        let branch = if head.is_branch() {
            head.shorthand().unwrap_or("HEAD").to_string()
        } else {
            "HEAD".to_string()
        };
        let short_commit = commit
            .as_object()
            .short_id()
            .ok()
            .and_then(|buf| buf.as_str().map(str::to_string))
            .unwrap_or_else(|| commit.id().to_string()[..7].to_string());
        Some(HeadInfo {
            branch,
            short_commit,
        })
    }

    /// Resolve a revision (`HEAD~1`, a branch, a sha) to a readable tree.
    ///
    /// Returns `None` when the revision does not resolve, e.g. `HEAD~1` on a
    /// repository with a single commit.
    pub fn revision(&self, spec: &str) -> Option<RevisionTree<'_>> {
        let object = match self.repo.revparse_single(spec) {
            Ok(object) => object,
            Err(e) => {
                debug!("Revision {} does not resolve: {}", spec, e);
                return None;
            }
        };
        let tree = object.peel_to_tree().ok()?;
        Some(RevisionTree {
            repo: &self.repo,
            tree,
        })
    }

    /// Get recent commits across the entire repository, newest first.
    ///
    /// # Arguments
    /// * `max_commits` - Maximum number of commits to retrieve
    pub fn get_recent_commits(&self, max_commits: usize) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push_head()?;

        let mut commits = Vec::new();

        for oid_result in revwalk {
            if commits.len() >= max_commits {
                break;
            }

            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(self.extract_commit_info(&commit)?);
        }

        Ok(commits)
    }

    /// Time of the most recent commit that touched `file_path`.
    ///
    /// History is simplified the way `git log -- <path>` does it: a merge
    /// whose version of the path matches one of its parents is skipped and
    /// only that parent is followed, so a doc brought in by a merge is dated
    /// by the commit that actually edited it.
    ///
    /// Returns `Ok(None)` when no commit in HEAD's history touched the path.
    pub fn last_modified(&self, file_path: &str) -> Result<Option<DateTime<Utc>>> {
        let path = Path::new(file_path);
        let Some(head) = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok()) else {
            return Ok(None);
        };

        // Newest commit first
        let mut queue: BinaryHeap<(i64, Oid)> = BinaryHeap::new();
        let mut seen: HashSet<Oid> = HashSet::new();
        seen.insert(head.id());
        queue.push((head.time().seconds(), head.id()));

        while let Some((_, oid)) = queue.pop() {
            let commit = self.repo.find_commit(oid)?;
            let entry = entry_id(&commit.tree()?, path);

            let mut same_parent = None;
            for parent in commit.parents() {
                if entry_id(&parent.tree()?, path) == entry {
                    same_parent = Some(parent);
                    break;
                }
            }

            match same_parent {
                Some(parent) => {
                    if seen.insert(parent.id()) {
                        queue.push((parent.time().seconds(), parent.id()));
                    }
                }
                // Root commit: it touched the path only if it added it
                None if commit.parent_count() == 0 => {
                    if entry.is_some() {
                        return Ok(git_time(&commit.time()));
                    }
                }
                None => return Ok(git_time(&commit.time())),
            }
        }

        Ok(None)
    }

    /// Extract the changed paths of a git2 Commit object.
    fn extract_commit_info(&self, commit: &git2::Commit) -> Result<CommitInfo> {
        // Merge commits list no files, matching `git log --name-only`
        let mut files_changed = Vec::new();
        if commit.parent_count() <= 1 {
            let parent = commit.parent(0).ok();
            let tree = commit.tree()?;
            let parent_tree = parent.as_ref().map(|p| p.tree()).transpose()?;

            let mut diff = self
                .repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
            diff.find_similar(Some(DiffFindOptions::new().renames(true)))?;

            diff.foreach(
                &mut |delta, _| {
                    if let Some(path) = delta.new_file().path().or(delta.old_file().path()) {
                        files_changed.push(path.to_string_lossy().replace('\\', "/"));
                    }
                    true
                },
                None,
                None,
                None,
            )?;
        }

        Ok(CommitInfo { files_changed })
    }
}

/// Object id of `path` in `tree`, `None` when absent
fn entry_id(tree: &Tree<'_>, path: &Path) -> Option<Oid> {
    tree.get_path(path).ok().map(|entry| entry.id())
}

/// A resolved revision whose files can be listed and read.
pub struct RevisionTree<'repo> {
    repo: &'repo Repository,
    tree: Tree<'repo>,
}

impl std::fmt::Debug for RevisionTree<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevisionTree")
            .field("tree", &self.tree.id())
            .finish()
    }
}

impl RevisionTree<'_> {
    /// Blob paths equal to, or nested under, any of `pathspecs`.
    pub fn list_paths(&self, pathspecs: &[String]) -> Result<Vec<String>> {
        let specs: Vec<&str> = pathspecs.iter().map(|s| s.trim_end_matches('/')).collect();
        let mut files = Vec::new();

        self.tree.walk(TreeWalkMode::PreOrder, |dir, entry| {
            if entry.kind() != Some(ObjectType::Blob) {
                return TreeWalkResult::Ok;
            }
            let Some(name) = entry.name() else {
                return TreeWalkResult::Ok;
            };
            let path = format!("{}{}", dir, name);
            if specs.iter().any(|spec| under_pathspec(&path, spec)) {
                files.push(path);
            }
            TreeWalkResult::Ok
        })?;

        Ok(files)
    }

    /// Content of `path` at this revision, decoded lossily.
    ///
    /// Returns `None` when the path is missing or is not a blob.
    pub fn read(&self, path: &str) -> Option<String> {
        let entry = self.tree.get_path(Path::new(path)).ok()?;
        let object = entry.to_object(self.repo).ok()?;
        let blob = object.as_blob()?;
        Some(String::from_utf8_lossy(blob.content()).into_owned())
    }
}

fn under_pathspec(path: &str, spec: &str) -> bool {
    if spec.is_empty() {
        return true;
    }
    path == spec
        || (path.len() > spec.len() && path.starts_with(spec) && path.as_bytes()[spec.len()] == b'/')
}

fn git_time(time: &git2::Time) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(time.seconds(), 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::test_repo::{commit_files, merge_commit, rename_file, reset_to};
    use tempfile::tempdir;

    fn create_test_repo() -> Result<(tempfile::TempDir, Repository)> {
        let dir = tempdir()?;
        let repo = Repository::init(dir.path())?;
        commit_files(
            &repo,
            &[("README.md", "# readme"), ("app/src/main.ts", "export {}\n")],
            "Initial commit",
            1_700_000_000,
        )?;
        Ok((dir, repo))
    }

    #[test]
    fn test_open_repo() -> Result<()> {
        let (dir, _repo) = create_test_repo()?;
        let history = GitHistory::open(dir.path())?;
        assert!(history.repo_root()?.exists());
        Ok(())
    }

    #[test]
    fn test_is_git_repo() -> Result<()> {
        let (dir, _repo) = create_test_repo()?;
        assert!(GitHistory::is_git_repo(dir.path()));

        let non_repo = tempdir()?;
        assert!(!GitHistory::is_git_repo(non_repo.path()));
        Ok(())
    }

    #[test]
    fn test_get_recent_commits() -> Result<()> {
        let (dir, repo) = create_test_repo()?;
        commit_files(&repo, &[("docs/Architecture.md", "arch")], "Add docs", 1_700_000_100)?;
        let history = GitHistory::open(dir.path())?;

        let commits = history.get_recent_commits(10)?;
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].files_changed, vec!["docs/Architecture.md"]);
        assert_eq!(commits[1].files_changed.len(), 2);

        let bounded = history.get_recent_commits(1)?;
        assert_eq!(bounded.len(), 1);
        Ok(())
    }

    #[test]
    fn test_previous_revision_missing_on_single_commit() -> Result<()> {
        let (dir, _repo) = create_test_repo()?;
        let history = GitHistory::open(dir.path())?;
        assert!(history.revision("HEAD").is_some());
        assert!(history.revision("HEAD~1").is_none());
        Ok(())
    }

    #[test]
    fn test_revision_list_and_read() -> Result<()> {
        let (dir, repo) = create_test_repo()?;
        commit_files(&repo, &[("app/src/main.ts", "export const x = 1;\n")], "Edit", 1_700_000_100)?;
        let history = GitHistory::open(dir.path())?;

        let previous = history.revision("HEAD~1").expect("HEAD~1 resolves");
        let paths = previous.list_paths(&["app/src".to_string()])?;
        assert_eq!(paths, vec!["app/src/main.ts"]);
        assert_eq!(previous.read("app/src/main.ts").as_deref(), Some("export {}\n"));
        assert!(previous.read("app/src/missing.ts").is_none());
        // A directory is not a blob
        assert!(previous.read("app/src").is_none());
        Ok(())
    }

    #[test]
    fn test_pathspec_does_not_match_sibling_prefix() {
        assert!(under_pathspec("app/src/a.ts", "app/src"));
        assert!(under_pathspec("README.md", "README.md"));
        assert!(!under_pathspec("app/srcfoo/a.ts", "app/src"));
        assert!(!under_pathspec("app/README.md", "README.md"));
    }

    #[test]
    fn test_last_modified() -> Result<()> {
        let (dir, repo) = create_test_repo()?;
        commit_files(&repo, &[("app/src/main.ts", "changed")], "Edit code", 1_700_500_000)?;
        let history = GitHistory::open(dir.path())?;

        let readme = history.last_modified("README.md")?.expect("README has history");
        assert_eq!(readme.timestamp(), 1_700_000_000);
        let code = history.last_modified("app/src/main.ts")?.expect("code has history");
        assert_eq!(code.timestamp(), 1_700_500_000);
        assert!(history.last_modified("docs/none.md")?.is_none());
        Ok(())
    }

    #[test]
    fn test_last_modified_looks_through_merges() -> Result<()> {
        let (dir, repo) = create_test_repo()?;
        let base = repo.head()?.peel_to_commit()?.id();
        let feature = commit_files(
            &repo,
            &[("README.md", "# readme\nfeature notes\n")],
            "Edit readme on a branch",
            1_700_100_000,
        )?;
        reset_to(&repo, base)?;
        commit_files(&repo, &[("app/src/main.ts", "changed")], "Edit code", 1_700_200_000)?;
        merge_commit(
            &repo,
            feature,
            &[("README.md", "# readme\nfeature notes\n")],
            "Merge feature",
            1_700_900_000,
        )?;
        let history = GitHistory::open(dir.path())?;

        let readme = history.last_modified("README.md")?.expect("README has history");
        assert_eq!(readme.timestamp(), 1_700_100_000);
        let code = history.last_modified("app/src/main.ts")?.expect("code has history");
        assert_eq!(code.timestamp(), 1_700_200_000);
        Ok(())
    }

    #[test]
    fn test_merge_commit_lists_no_files() -> Result<()> {
        let (dir, repo) = create_test_repo()?;
        let base = repo.head()?.peel_to_commit()?.id();
        let feature = commit_files(&repo, &[("docs/a.md", "a")], "Docs", 1_700_100_000)?;
        reset_to(&repo, base)?;
        commit_files(&repo, &[("app/src/b.ts", "b")], "Code", 1_700_200_000)?;
        merge_commit(&repo, feature, &[("docs/a.md", "a")], "Merge", 1_700_300_000)?;
        let history = GitHistory::open(dir.path())?;

        let commits = history.get_recent_commits(10)?;
        assert_eq!(commits.len(), 4);
        assert!(commits[0].files_changed.is_empty());
        Ok(())
    }

    #[test]
    fn test_rename_lists_new_path_only() -> Result<()> {
        let (dir, repo) = create_test_repo()?;
        rename_file(&repo, "app/src/main.ts", "lib/main.ts", "Move out", 1_700_100_000)?;
        let history = GitHistory::open(dir.path())?;

        let commits = history.get_recent_commits(1)?;
        assert_eq!(commits[0].files_changed, vec!["lib/main.ts"]);
        Ok(())
    }

    #[test]
    fn test_head_info() -> Result<()> {
        let (dir, _repo) = create_test_repo()?;
        let history = GitHistory::open(dir.path())?;
        let head = history.head_info().expect("HEAD resolves");
        assert!(!head.branch.is_empty());
        assert!(head.short_commit.len() >= 7);
        Ok(())
    }
}
