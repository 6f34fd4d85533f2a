//! Git finalization steps driven through the bounded runner.
//!
//! Both tools end every successful repository pipeline the same way: stage,
//! create a GPG-signed commit, and force-move a signed tag so it always
//! points at the newest commit. The message/tag/signoff details differ per
//! tool and are carried in a [`SignedRefStyle`].

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::exec::CommandRunner;

/// Commit and tag conventions for one tool variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignedRefStyle {
    /// Commit (and merge-commit) message.
    pub message: &'static str,
    /// Name of the movable signed tag.
    pub tag: &'static str,
    /// Whether commits carry a Signed-off-by trailer.
    pub signoff: bool,
}

/// A located `git` binary bound to a runner.
#[derive(Debug, Clone)]
pub struct Git {
    runner: CommandRunner,
    program: PathBuf,
}

impl Git {
    pub fn new(runner: CommandRunner, program: PathBuf) -> Self {
        Self { runner, program }
    }

    /// Stage `files` in `repo`.
    pub async fn add(&self, repo: &Path, files: &[&str]) -> Result<()> {
        let mut args = vec!["add"];
        args.extend_from_slice(files);
        self.runner.run_in(&self.program, &args, repo).await
    }

    /// Create a signed commit per `style`. With `no_edit`, a pre-staged
    /// merge message is reused instead of opening an editor.
    pub async fn commit_signed(
        &self,
        repo: &Path,
        style: SignedRefStyle,
        no_edit: bool,
    ) -> Result<()> {
        let mut args = vec!["commit", "--gpg-sign", "--message", style.message];
        if style.signoff {
            args.push("--signoff");
        }
        if no_edit {
            args.push("--no-edit");
        }
        self.runner.run_in(&self.program, &args, repo).await
    }

    /// Force-move the signed tag named by `style` to the current HEAD.
    pub async fn tag_signed(&self, repo: &Path, style: SignedRefStyle) -> Result<()> {
        let args = [
            "tag",
            "--force",
            "--message",
            style.tag,
            "--sign",
            style.tag,
        ];
        self.runner.run_in(&self.program, &args, repo).await
    }

    /// Fetch `branch` from `remote` into FETCH_HEAD.
    pub async fn fetch(&self, repo: &Path, remote: &str, branch: &str) -> Result<()> {
        self.runner
            .run_in(&self.program, &["fetch", remote, branch], repo)
            .await
    }

    /// Merge FETCH_HEAD with a signed merge commit per `style`.
    pub async fn merge_signed_fetch_head(&self, repo: &Path, style: SignedRefStyle) -> Result<()> {
        let args = [
            "merge",
            "--gpg-sign",
            "--message",
            style.message,
            "FETCH_HEAD",
        ];
        self.runner.run_in(&self.program, &args, repo).await
    }
}
