use std::path::{Path, PathBuf};

use git2::{Cred, FetchOptions, PushOptions, RemoteCallbacks, Repository, Signature};
use secrecy::{ExposeSecret, SecretString};

use crate::domain::DomainError;

fn wrap(error: git2::Error) -> DomainError {
    DomainError::RemoteFailure(error.message().to_owned())
}

/// A checked-out clone of a tenant's policy repository, living under a
/// scratch directory. Opened fresh (clone) the first time a tenant
/// syncs, reused (open) afterward.
pub struct WorkingCopy {
    repo: Repository,
    path: PathBuf,
}

impl WorkingCopy {
    pub fn open_or_clone(path: &Path, remote_url: &str, branch: &str, token: &SecretString) -> Result<Self, DomainError> {
        let repo = if path.join(".git").is_dir() {
            Repository::open(path).map_err(wrap)?
        } else {
            let mut builder = git2::build::RepoBuilder::new();
            builder.fetch_options(fetch_options(token));
            builder.branch(branch);
            builder.clone(remote_url, path).map_err(wrap)?
        };
        Ok(Self { repo, path: path.to_owned() })
    }

    pub fn write_file(&self, relative_path: &str, contents: &str) -> Result<(), DomainError> {
        let full = self.path.join(relative_path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DomainError::RemoteFailure(e.to_string()))?;
        }
        std::fs::write(&full, contents).map_err(|e| DomainError::RemoteFailure(e.to_string()))
    }

    pub fn remove_file(&self, relative_path: &str) -> Result<(), DomainError> {
        let full = self.path.join(relative_path);
        if full.exists() {
            std::fs::remove_file(&full).map_err(|e| DomainError::RemoteFailure(e.to_string()))?;
        }
        Ok(())
    }

    #[must_use]
    pub fn read_file(&self, relative_path: &str) -> Option<String> {
        std::fs::read_to_string(self.path.join(relative_path)).ok()
    }

    /// Every regular file under `subdirectory`, as paths relative to
    /// the working copy root, using `/` separators regardless of host
    /// platform (the layout helpers parse these the same way either
    /// way).
    #[must_use]
    pub fn walk_relative_files(&self, subdirectory: &str) -> Vec<String> {
        let mut out = Vec::new();
        walk(&self.path, &self.path.join(subdirectory), &mut out);
        out
    }

    pub fn commit_all(&self, actor: &str, message: &str) -> Result<(), DomainError> {
        let mut index = self.repo.index().map_err(wrap)?;
        index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None).map_err(wrap)?;
        index.write().map_err(wrap)?;
        let tree_id = index.write_tree().map_err(wrap)?;
        let tree = self.repo.find_tree(tree_id).map_err(wrap)?;
        let signature = Signature::now(actor, "control-core@local").map_err(wrap)?;
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        self.repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents).map_err(wrap)?;
        Ok(())
    }

    pub fn push(&self, branch: &str, token: &SecretString) -> Result<(), DomainError> {
        let mut remote = self.repo.find_remote("origin").map_err(wrap)?;
        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        let mut options = PushOptions::new();
        options.remote_callbacks(auth_callbacks(token));
        remote.push(&[refspec.as_str()], Some(&mut options)).map_err(wrap)
    }

    pub fn fetch_and_reset_hard(&self, branch: &str, token: &SecretString) -> Result<(), DomainError> {
        let mut remote = self.repo.find_remote("origin").map_err(wrap)?;
        remote.fetch(&[branch], Some(&mut fetch_options(token)), None).map_err(wrap)?;
        let reference = self.repo.find_reference(&format!("refs/remotes/origin/{branch}")).map_err(wrap)?;
        let commit = reference.peel_to_commit().map_err(wrap)?;
        self.repo.reset(commit.as_object(), git2::ResetType::Hard, None).map_err(wrap)
    }
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(root, &path, out);
        } else if let Ok(relative) = path.strip_prefix(root) {
            out.push(relative.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/"));
        }
    }
}

fn auth_callbacks(token: &SecretString) -> RemoteCallbacks<'_> {
    let token = token.expose_secret().to_owned();
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |_url, username_from_url, _allowed| Cred::userpass_plaintext(username_from_url.unwrap_or("x-access-token"), &token));
    callbacks
}

fn fetch_options(token: &SecretString) -> FetchOptions<'_> {
    let mut options = FetchOptions::new();
    options.remote_callbacks(auth_callbacks(token));
    options
}
