//! Atomic file replacement.
//!
//! The new content goes to a temporary file in the target's directory, is
//! flushed to disk, takes over the target's permission bits and is then
//! renamed over the target. Readers see either the old file or the new one.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Replace `path` with `contents`.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    write_atomic_with(path, |file| file.write_all(contents))
}

/// Replace `path` with whatever `write` produces.
///
/// If `write` fails the temporary file is removed and `path` is untouched.
pub fn write_atomic_with<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir)?;
    write(temp.as_file_mut())?;
    temp.as_file().sync_all()?;

    // Ownership is not carried over; the caller runs as the file's owner.
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }

    temp.persist(path).map_err(|e| e.error)?;

    #[cfg(unix)]
    File::open(dir)?.sync_all()?;

    tracing::debug!(path = %path.display(), "File replaced atomically");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.yaml");
        fs::write(&path, "old: 1\n").unwrap();

        write_atomic(&path, b"new: 2\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new: 2\n");
        assert_eq!(entries(dir.path()), 1);
    }

    #[test]
    fn test_creates_missing_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh");

        write_atomic(&path, b"hello").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn test_failed_write_leaves_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.yaml");
        fs::write(&path, "introducers: {}\n").unwrap();

        let result = write_atomic_with(&path, |file| {
            file.write_all(b"introdu")?;
            Err(io::Error::other("disk pulled"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "introducers: {}\n");
        assert_eq!(entries(dir.path()), 1, "temporary file must be cleaned up");
    }

    #[cfg(unix)]
    #[test]
    fn test_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret");
        fs::write(&path, "a").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        write_atomic(&path, b"b").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
