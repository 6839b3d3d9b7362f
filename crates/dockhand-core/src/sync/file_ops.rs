//! Filesystem primitives behind the sync calls

use crate::{CoreError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Decode standard base64 content
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(encoded)?)
}

/// Whether anything exists at `path`
pub async fn file_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Byte-for-byte comparison of `content` with the file at `path`
///
/// Always reads the file: pseudo-filesystems report sizes that do not
/// match their content.
pub async fn is_same_file(path: &Path, content: &[u8]) -> Result<bool> {
    let existing = tokio::fs::read(path)
        .await
        .map_err(|e| CoreError::io(path, e))?;
    Ok(existing == content)
}

/// Create or truncate `path` and write `content`, using `mode` for new files
pub async fn replace_file(path: &Path, content: &[u8], mode: u32) -> Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(mode);
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = options
        .open(path)
        .await
        .map_err(|e| CoreError::io(path, e))?;
    file.write_all(content)
        .await
        .map_err(|e| CoreError::io(path, e))?;
    file.flush().await.map_err(|e| CoreError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_decode() {
        assert_eq!(decode("VGhpcyBpcyBhIHRlc3Q=").unwrap(), b"This is a test");
        assert_eq!(decode("").unwrap(), b"");
        assert!(matches!(
            decode("Non base64 string"),
            Err(CoreError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_same_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, b"abc").await.unwrap();

        assert!(is_same_file(&path, b"abc").await.unwrap());
        assert!(!is_same_file(&path, b"abd").await.unwrap());
        assert!(!is_same_file(&path, b"abc\n").await.unwrap());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_same_file_ignores_reported_size() {
        let path = Path::new("/proc/sys/kernel/ostype");
        let actual = std::fs::read(path).unwrap();

        assert!(is_same_file(path, &actual).await.unwrap());
        assert!(!is_same_file(path, b"Plan9\n").await.unwrap());
    }

    #[tokio::test]
    async fn test_same_file_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing");

        assert!(!file_exists(&path).await);
        let err = is_same_file(&path, b"abc").await.unwrap_err();
        assert!(matches!(err, CoreError::FileNotFound(ref p) if p == &path));
    }

    #[tokio::test]
    async fn test_replace_file_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, b"a much longer original").await.unwrap();

        replace_file(&path, b"short", 0o600).await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"short");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_replace_file_mode_for_new_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secrets.yaml");
        replace_file(&path, b"x", 0o600).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_replace_file_missing_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no-such-dir").join("file");
        assert!(replace_file(&path, b"x", 0o600).await.is_err());
    }
}
