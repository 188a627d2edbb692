use log::info;
use std::io;
use std::path::{Path, PathBuf};

const CACHE_DIR_NAME: &str = "meteodash";
const SNAPSHOT_DIR_NAME: &str = "snapshots";
const RESPONSE_DIR_NAME: &str = "responses";

pub fn get_cache_dir() -> io::Result<PathBuf> {
    dirs::cache_dir()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine system cache directory",
            )
        })
        .map(|p| p.join(CACHE_DIR_NAME))
}

pub fn default_storage_dir(cache_dir: &Path) -> PathBuf {
    cache_dir.join(SNAPSHOT_DIR_NAME)
}

pub fn default_response_dir(cache_dir: &Path) -> PathBuf {
    cache_dir.join(RESPONSE_DIR_NAME)
}

pub async fn ensure_cache_dir_exists(path: &Path) -> io::Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("Cache path exists but is not a directory: {}", path.display()),
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating cache directory: {}", path.display());
            tokio::fs::create_dir_all(path).await
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_ensure_cache_dir_exists_creates_nested() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_cache_dir_exists(&nested).await.unwrap();
        assert!(nested.is_dir());
        // Second call is a no-op.
        ensure_cache_dir_exists(&nested).await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_cache_dir_rejects_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        assert!(ensure_cache_dir_exists(&file).await.is_err());
    }

    #[test]
    fn test_default_dirs() {
        let root = Path::new("/tmp/meteodash");
        assert_eq!(default_storage_dir(root), Path::new("/tmp/meteodash/snapshots"));
        assert_eq!(default_response_dir(root), Path::new("/tmp/meteodash/responses"));
    }
}
