//! Atomic JSON file operations.
//!
//! Writes go to a temporary sibling file, are flushed to disk, then
//! renamed over the target. A reader concurrent with a write observes
//! either the old or the new document, never a torn one.

use anketa_core::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Loads and deserializes a JSON file.
///
/// Returns `Ok(None)` if the file does not exist.
pub async fn read_json<T>(path: &Path) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Serializes `data` and writes it atomically to `path`.
pub async fn write_json<T>(path: &Path, data: &T) -> Result<()>
where
    T: Serialize,
{
    let bytes = serde_json::to_vec_pretty(data)?;

    let tmp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&tmp_path).await?;
    file.write_all(&bytes).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&tmp_path, path).await?;
    Ok(())
}
