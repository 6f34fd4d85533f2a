//! The `update-deps` pipeline: bump manifests, dedupe lockfiles, normalize
//! lockfile whitespace, and finalize with a signed commit and the movable
//! `latest` tag.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::batch::run_each;
use crate::error::{Result, RunError, UpkeepError};
use crate::exec::CommandRunner;
use crate::git::{Git, SignedRefStyle};
use crate::locate::locate_optional;
use crate::lockfile;
use crate::request::UpdateRequest;

/// Files staged after a successful dependency bump.
pub const STAGED_FILES: [&str; 3] = ["package-lock.json", "package.json", "pnpm-lock.yaml"];

/// Commit and tag conventions for dependency updates.
pub const DEPS_STYLE: SignedRefStyle = SignedRefStyle {
    message: "Update dependencies",
    tag: "latest",
    signoff: true,
};

const NCU: &str = "ncu";

/// External tools required by the dependency-update pipeline, resolved
/// once per batch and shared by every repository.
#[derive(Debug, Clone)]
pub struct DepsToolset {
    pub git: PathBuf,
    pub ncu: PathBuf,
    pub npm: PathBuf,
    pub pnpm: PathBuf,
}

impl DepsToolset {
    /// Resolve all required tools up front.
    ///
    /// A missing `ncu` is bootstrapped exactly once via a global npm
    /// install and then re-resolved; if it is still absent afterwards the
    /// [`ToolNotFound`](crate::UpkeepError::ToolNotFound) failure
    /// propagates and the batch never starts.
    pub async fn resolve(runner: &CommandRunner) -> Result<Self> {
        Self::resolve_with(runner, locate_optional).await
    }

    // The lookup is injected so the bootstrap path can be driven against a
    // controlled toolset in tests.
    async fn resolve_with<F>(runner: &CommandRunner, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        let required = |tool: &str| {
            lookup(tool).ok_or_else(|| UpkeepError::ToolNotFound {
                tool: tool.to_string(),
            })
        };

        let git = required("git")?;
        let npm = required("npm")?;
        let pnpm = required("pnpm")?;

        let ncu = match lookup(NCU) {
            Some(path) => path,
            None => {
                info!("{NCU} not found, installing npm-check-updates globally");
                runner
                    .run(&npm, &["install", "--global", "npm-check-updates"])
                    .await?;
                required(NCU)?
            }
        };

        Ok(Self {
            git,
            ncu,
            npm,
            pnpm,
        })
    }
}

/// Run the full dependency-update pipeline for a single repository.
pub async fn update_repository(
    runner: &CommandRunner,
    tools: &DepsToolset,
    filter: Option<&str>,
    repo: &Path,
) -> Result<()> {
    // ncu rewrites package.json, which both dedupe passes read.
    let mut ncu_args = Vec::new();
    if let Some(filter) = filter {
        ncu_args.extend(["--filter", filter]);
    }
    ncu_args.push("--upgrade");
    runner.run_in(&tools.ncu, &ncu_args, repo).await?;

    tokio::try_join!(
        runner.run_in(&tools.npm, &["dedupe", "--package-lock-only"], repo),
        runner.run_in(&tools.pnpm, &["dedupe"], repo),
    )?;

    lockfile::normalize(repo).await?;

    let git = Git::new(runner.clone(), tools.git.clone());
    git.add(repo, &STAGED_FILES).await?;
    git.commit_signed(repo, DEPS_STYLE, false).await?;
    git.tag_signed(repo, DEPS_STYLE).await?;

    Ok(())
}

/// Entry point for one `update-deps` invocation: resolve tools once, then
/// fan the pipeline out over every repository and aggregate failures.
pub async fn run_update(request: &UpdateRequest) -> std::result::Result<(), RunError> {
    let runner = CommandRunner::with_host_parallelism();
    let tools = DepsToolset::resolve(&runner).await?;

    let outcome = run_each(request.repos(), |repo| {
        let runner = &runner;
        let tools = &tools;
        async move { update_repository(runner, tools, request.filter(), &repo).await }
    })
    .await;

    outcome.into_result().map_err(RunError::from)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    use super::*;

    fn fake_tool(dir: &Path, name: &str, script: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn install_invocations(log: &Path) -> usize {
        fs::read_to_string(log)
            .map(|recorded| recorded.lines().count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn missing_ncu_is_bootstrapped_with_exactly_one_install() {
        let bin = tempfile::tempdir().unwrap();
        let log = bin.path().join("install.log");
        let ncu = bin.path().join(NCU);
        // The fake npm records every invocation, then drops the ncu shim
        // into place so re-resolution finds it.
        let npm = fake_tool(
            bin.path(),
            "npm",
            &format!("echo \"$@\" >> {} && touch {}", log.display(), ncu.display()),
        );
        let git = bin.path().join("git");
        let pnpm = bin.path().join("pnpm");

        let lookup = |tool: &str| match tool {
            "git" => Some(git.clone()),
            "npm" => Some(npm.clone()),
            "pnpm" => Some(pnpm.clone()),
            _ => ncu.exists().then(|| ncu.clone()),
        };

        let runner = CommandRunner::new(2);
        let tools = DepsToolset::resolve_with(&runner, lookup).await.unwrap();

        assert_eq!(tools.ncu, ncu);
        assert_eq!(install_invocations(&log), 1);
        let recorded = fs::read_to_string(&log).unwrap();
        assert!(recorded.contains("install --global npm-check-updates"));
    }

    #[tokio::test]
    async fn unbootstrappable_ncu_yields_tool_not_found() {
        let bin = tempfile::tempdir().unwrap();
        let log = bin.path().join("install.log");
        // This npm records the install but never produces an ncu.
        let npm = fake_tool(
            bin.path(),
            "npm",
            &format!("echo \"$@\" >> {}", log.display()),
        );
        let git = bin.path().join("git");
        let pnpm = bin.path().join("pnpm");

        let lookup = |tool: &str| match tool {
            "git" => Some(git.clone()),
            "npm" => Some(npm.clone()),
            "pnpm" => Some(pnpm.clone()),
            _ => None,
        };

        let runner = CommandRunner::new(2);
        let err = DepsToolset::resolve_with(&runner, lookup)
            .await
            .unwrap_err();

        assert!(matches!(err, UpkeepError::ToolNotFound { ref tool } if tool == NCU));
        assert_eq!(install_invocations(&log), 1);
    }

    #[tokio::test]
    async fn missing_required_tool_fails_before_any_bootstrap() {
        let bin = tempfile::tempdir().unwrap();
        let log = bin.path().join("install.log");
        let npm = fake_tool(
            bin.path(),
            "npm",
            &format!("echo \"$@\" >> {}", log.display()),
        );
        let git = bin.path().join("git");

        let lookup = |tool: &str| match tool {
            "git" => Some(git.clone()),
            "npm" => Some(npm.clone()),
            _ => None,
        };

        let runner = CommandRunner::new(2);
        let err = DepsToolset::resolve_with(&runner, lookup)
            .await
            .unwrap_err();

        assert!(matches!(err, UpkeepError::ToolNotFound { ref tool } if tool == "pnpm"));
        assert_eq!(install_invocations(&log), 0);
    }

    #[test]
    fn deps_style_matches_tool_conventions() {
        assert_eq!(DEPS_STYLE.message, "Update dependencies");
        assert_eq!(DEPS_STYLE.tag, "latest");
        assert!(DEPS_STYLE.signoff);
    }

    #[test]
    fn staged_file_set_covers_both_lockfiles_and_the_manifest() {
        assert!(STAGED_FILES.contains(&"package-lock.json"));
        assert!(STAGED_FILES.contains(&"package.json"));
        assert!(STAGED_FILES.contains(&"pnpm-lock.yaml"));
    }
}
