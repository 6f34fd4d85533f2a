//! End-to-end batch behavior with real child processes: one repository's
//! failure must neither cancel a sibling's pipeline nor leak into its
//! outcome.

use std::path::{Path, PathBuf};

use upkeep_core::{run_each, CommandRunner, UpkeepError};

async fn run_script(
    runner: &CommandRunner,
    cwd: &Path,
    script: &str,
) -> Result<(), UpkeepError> {
    runner.run_in(Path::new("sh"), &["-c", script], cwd).await
}

#[tokio::test]
async fn all_green_batch_succeeds() {
    let runner = CommandRunner::new(4);
    let repos: Vec<_> = (0..3)
        .map(|_| tempfile::tempdir().unwrap())
        .collect();
    let paths: Vec<PathBuf> = repos.iter().map(|d| d.path().to_path_buf()).collect();

    let outcome = run_each(&paths, |repo| {
        let runner = &runner;
        async move { run_script(runner, &repo, "touch done").await }
    })
    .await;

    assert!(outcome.is_success());
    for dir in &repos {
        assert!(dir.path().join("done").exists());
    }
    assert!(outcome.into_result().is_ok());
}

#[tokio::test]
async fn failing_repo_does_not_block_sibling_pipeline() {
    let runner = CommandRunner::new(4);
    let good = tempfile::tempdir().unwrap();
    let bad = tempfile::tempdir().unwrap();
    // The marker makes the first pipeline step exit 2 in this repo only.
    std::fs::write(bad.path().join("fail"), b"").unwrap();

    let paths = vec![good.path().to_path_buf(), bad.path().to_path_buf()];
    let outcome = run_each(&paths, |repo| {
        let runner = &runner;
        async move {
            run_script(runner, &repo, "test ! -f fail || exit 2").await?;
            run_script(runner, &repo, "touch finished").await?;
            Ok(())
        }
    })
    .await;

    // The healthy repo ran its whole pipeline; the failing one stopped at
    // its first failing step.
    assert!(good.path().join("finished").exists());
    assert!(!bad.path().join("finished").exists());

    let err = outcome.into_result().unwrap_err();
    assert_eq!(err.total(), 2);
    assert_eq!(err.failures().len(), 1);

    let (repo, cause) = &err.failures()[0];
    assert_eq!(repo, &bad.path().to_path_buf());
    assert!(matches!(
        cause,
        UpkeepError::ProcessFailed { status: 2, .. }
    ));
}

#[tokio::test]
async fn every_failing_repo_is_reported_exactly_once() {
    let runner = CommandRunner::new(4);
    let dirs: Vec<_> = (0..4)
        .map(|_| tempfile::tempdir().unwrap())
        .collect();
    // Repos 1 and 3 fail with distinct exit codes.
    std::fs::write(dirs[1].path().join("code"), b"5").unwrap();
    std::fs::write(dirs[3].path().join("code"), b"7").unwrap();

    let paths: Vec<PathBuf> = dirs.iter().map(|d| d.path().to_path_buf()).collect();
    let outcome = run_each(&paths, |repo| {
        let runner = &runner;
        async move {
            run_script(runner, &repo, "test ! -f code || exit $(cat code)").await
        }
    })
    .await;

    let err = outcome.into_result().unwrap_err();
    assert_eq!(err.failures().len(), 2);

    let statuses: Vec<i32> = err
        .failures()
        .iter()
        .map(|(_, cause)| match cause {
            UpkeepError::ProcessFailed { status, .. } => *status,
            other => panic!("expected ProcessFailed, got: {other:?}"),
        })
        .collect();
    assert_eq!(statuses, vec![5, 7]);
}
