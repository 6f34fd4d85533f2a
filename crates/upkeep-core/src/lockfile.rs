//! In-place whitespace normalization of `package-lock.json`.

use std::io::SeekFrom;
use std::path::Path;

use tokio::fs::OpenOptions;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use crate::error::{Result, UpkeepError};

/// File name of the npm lockfile rewritten in place.
pub const PACKAGE_LOCK: &str = "package-lock.json";

/// Trim surrounding whitespace from the repository's `package-lock.json`.
///
/// The file is opened once for read/write access, decoded strictly as
/// UTF-8, and rewritten from the start with the tail truncated only when
/// trimming changed anything. Returns `true` when a write occurred; the
/// no-change path touches nothing, making the operation idempotent.
pub async fn normalize(repo: &Path) -> Result<bool> {
    let path = repo.join(PACKAGE_LOCK);

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(&path)
        .await
        .map_err(|source| UpkeepError::Lockfile {
            path: path.clone(),
            source,
        })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .await
        .map_err(|source| UpkeepError::Lockfile {
            path: path.clone(),
            source,
        })?;

    let trimmed = contents.trim();
    if trimmed.len() == contents.len() {
        return Ok(false);
    }

    let rewrite = async {
        file.seek(SeekFrom::Start(0)).await?;
        file.write_all(trimmed.as_bytes()).await?;
        file.set_len(trimmed.len() as u64).await?;
        file.flush().await
    };
    rewrite.await.map_err(|source| UpkeepError::Lockfile {
        path: path.clone(),
        source,
    })?;

    Ok(true)
}
