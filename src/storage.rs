use std::path::{Path, PathBuf};

use crate::DynError;

/// Deterministic location of an upload's raw bytes:
/// `<storage_dir>/uploads/<upload_id>/file`
pub fn upload_file_path(storage_dir: &Path, upload_id: &str) -> PathBuf {
    storage_dir.join("uploads").join(upload_id).join("file")
}

/// Write upload bytes to their canonical storage path, creating parents.
/// The engine itself only ever reads this path; writing is the producer's
/// side of the contract (the enqueue command here, the upload API in full
/// deployments).
pub async fn stage_upload_file(
    storage_dir: &Path,
    upload_id: &str,
    bytes: &[u8],
) -> Result<PathBuf, DynError> {
    let path = upload_file_path(storage_dir, upload_id);
    let parent = path
        .parent()
        .ok_or_else(|| format!("upload path {} has no parent", path.display()))?;
    tokio::fs::create_dir_all(parent).await?;
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
