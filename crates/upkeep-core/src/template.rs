//! The `update-template` pipeline: merge upstream template changes into
//! downstream forks, or finish a previously staged merge after manual
//! conflict resolution, then refresh the signed `rolling` tag.

use std::path::Path;

use crate::batch::run_each;
use crate::error::{Result, RunError};
use crate::exec::CommandRunner;
use crate::git::{Git, SignedRefStyle};
use crate::locate::locate;
use crate::request::{SyncAction, SyncRequest};

/// Upstream template repository.
pub const TEMPLATE_REMOTE: &str =
    "https://github.com/polyipseity/obsidian-plugin-template.git";

/// Upstream branch carrying the template line merged into forks.
pub const TEMPLATE_BRANCH: &str = "forks/polyipseity";

/// Commit and tag conventions for template merges.
pub const TEMPLATE_STYLE: SignedRefStyle = SignedRefStyle {
    message: "chore(template): merge updates from template",
    tag: "rolling",
    signoff: false,
};

/// Apply the chosen action to a single repository.
///
/// `Continue` commits whatever merge is already staged (no message
/// editing); `Update` fetches and merges the upstream template branch.
/// Both finish by force-moving the signed rolling tag to the new commit.
pub async fn sync_repository(git: &Git, action: SyncAction, repo: &Path) -> Result<()> {
    match action {
        SyncAction::Continue => {
            git.commit_signed(repo, TEMPLATE_STYLE, true).await?;
        }
        SyncAction::Update => {
            git.fetch(repo, TEMPLATE_REMOTE, TEMPLATE_BRANCH).await?;
            git.merge_signed_fetch_head(repo, TEMPLATE_STYLE).await?;
        }
    }
    git.tag_signed(repo, TEMPLATE_STYLE).await
}

/// Entry point for one `update-template` invocation: resolve git once,
/// then fan the pipeline out over every repository and aggregate failures.
pub async fn run_sync(request: &SyncRequest) -> std::result::Result<(), RunError> {
    let runner = CommandRunner::with_host_parallelism();
    let git = Git::new(runner, locate("git")?);

    let outcome = run_each(request.repos(), |repo| {
        let git = &git;
        async move { sync_repository(git, request.action(), &repo).await }
    })
    .await;

    outcome.into_result().map_err(RunError::from)
}
