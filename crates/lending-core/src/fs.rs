//! Filesystem helpers for writing store files into place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique scratch path next to `destination`, on the same filesystem so a
/// later rename stays atomic.
pub fn temp_sibling(destination: &Path) -> io::Result<PathBuf> {
    let parent = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let filename = destination
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid destination filename: {}", destination.display()),
            )
        })?;
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
        .as_nanos();

    Ok(parent.join(format!(".{}.{}.{}.tmp", filename, std::process::id(), nanos)))
}

/// Move `temp_path` over `destination`.
///
/// Some platforms refuse to rename onto an existing file, so on failure the
/// destination is removed and the rename retried once. The temp file is
/// removed if the retry fails too.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(first) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry.kind(),
                format!("Rename into place failed (first: {}, retry: {})", first, retry),
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_temp_sibling_stays_in_parent() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("lending.db");

        let temp = temp_sibling(&dest).unwrap();
        assert_eq!(temp.parent(), Some(dir.path()));
        assert_ne!(temp, dest);
    }

    #[test]
    fn test_temp_sibling_rejects_bare_root() {
        assert!(temp_sibling(Path::new("/")).is_err());
    }

    #[test]
    fn test_rename_replaces_existing_backup() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("snapshot.tmp");
        let dest = dir.path().join("backup.db");

        fs::write(&dest, b"stale").unwrap();
        fs::write(&temp, b"fresh").unwrap();

        rename_with_fallback(&temp, &dest).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"fresh");
    }

    #[test]
    fn test_rename_missing_source_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.tmp");
        let dest = dir.path().join("backup.db");

        assert!(rename_with_fallback(&missing, &dest).is_err());
        assert!(!dest.exists());
    }
}
