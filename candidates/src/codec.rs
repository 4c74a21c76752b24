//! On-disk representation of the candidate store.
//!
//! The file is a gzip stream wrapping a UTF-8 JSON array of `[key, score]`
//! pairs. Saving always rewrites the whole file.

use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{CandidateError, Result};
use crate::rank::rank;
use crate::store::CandidateStore;

/// Encode a store as gzip-compressed JSON pairs, in ranked order.
pub fn encode(store: &CandidateStore) -> Result<Vec<u8>> {
    let pairs: Vec<(String, u64)> = rank(store)
        .into_iter()
        .map(|candidate| (candidate.key, candidate.score))
        .collect();
    let json = serde_json::to_vec(&pairs)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    Ok(encoder.finish()?)
}

/// Decode gzip-compressed JSON pairs into a store.
///
/// When a key appears more than once the last pair wins.
pub fn decode(bytes: &[u8]) -> Result<CandidateStore> {
    let mut json = String::new();
    GzDecoder::new(bytes).read_to_string(&mut json)?;

    let pairs: Vec<(String, u64)> = serde_json::from_str(&json)?;
    let mut store = CandidateStore::new();
    for (index, (key, score)) in pairs.into_iter().enumerate() {
        if key.is_empty() {
            return Err(CandidateError::InvalidFormat(format!(
                "empty candidate key at index {index}"
            )));
        }
        store.insert(key, score);
    }
    Ok(store)
}

/// Load the store from `path`.
///
/// A missing file is an empty store. A file that exists but cannot be read or
/// decoded is an error; it is never replaced by an empty store.
pub async fn load(path: &Path) -> Result<CandidateStore> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(
                "No candidate store at {}, starting empty",
                path.display()
            );
            return Ok(CandidateStore::new());
        }
        Err(e) => return Err(CandidateError::load(path, e.into())),
    };

    let store = decode(&bytes).map_err(|e| CandidateError::load(path, e))?;
    debug!("Loaded {} candidates from {}", store.len(), path.display());
    Ok(store)
}

/// Replace the store file at `path` with the contents of `store`.
///
/// The bytes go to a sibling temporary file that is renamed over `path`, so
/// readers never observe a partially written store.
pub async fn save(path: &Path, store: &CandidateStore) -> Result<()> {
    let bytes = encode(store).map_err(|e| CandidateError::persist(path, e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| CandidateError::persist(path, e.into()))?;
    }

    let temp_path = temp_path_for(path).map_err(|e| CandidateError::persist(path, e))?;
    fs::write(&temp_path, &bytes)
        .await
        .map_err(|e| CandidateError::persist(path, e.into()))?;
    if let Err(e) = fs::rename(&temp_path, path).await {
        if let Err(cleanup) = fs::remove_file(&temp_path).await {
            debug!("Failed to remove {}: {cleanup}", temp_path.display());
        }
        return Err(CandidateError::persist(path, e.into()));
    }

    debug!("Saved {} candidates to {}", store.len(), path.display());
    Ok(())
}

fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        CandidateError::InvalidFormat(format!("not a file path: {}", path.display()))
    })?;
    let mut temp_name = OsString::from(file_name);
    temp_name.push(".tmp");
    Ok(path.with_file_name(temp_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn gzip(text: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_encode_writes_ranked_json_pairs() {
        let store: CandidateStore = [("firefox", 1), ("/home/u/proj", 4)]
            .into_iter()
            .collect();

        let bytes = encode(&store).unwrap();
        let mut json = String::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_string(&mut json)
            .unwrap();

        assert_eq!(json, r#"[["/home/u/proj",4],["firefox",1]]"#);
    }

    #[test]
    fn test_decode_reads_existing_format() {
        let store = decode(&gzip(r#"[["/home/u/proj",3],["xterm",0]]"#)).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("/home/u/proj"), Some(3));
        assert_eq!(store.get("xterm"), Some(0));
    }

    #[test]
    fn test_decode_duplicate_key_last_wins() {
        let store = decode(&gzip(r#"[["vim",1],["vim",9]]"#)).unwrap();
        assert_eq!(store.get("vim"), Some(9));
    }

    #[test]
    fn test_decode_rejects_negative_score() {
        assert!(decode(&gzip(r#"[["vim",-1]]"#)).is_err());
    }

    #[test]
    fn test_decode_rejects_empty_key() {
        let err = decode(&gzip(r#"[["",1]]"#)).unwrap_err();
        assert!(matches!(err, CandidateError::InvalidFormat(_)));
    }

    #[test]
    fn test_decode_rejects_plain_json() {
        assert!(decode(br#"[["vim",1]]"#).is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = load(&temp_dir.path().join("candidates.json.gz"))
            .await
            .unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".extended-dmenu/candidates.json.gz");
        let store: CandidateStore = [("/usr/bin/foo", 0), ("/home/u/proj", 3), ("vim", 12)]
            .into_iter()
            .collect();

        save(&path, &store).await.unwrap();
        let loaded = load(&path).await.unwrap();

        assert_eq!(loaded, store);
        assert!(!temp_dir.path().join(".extended-dmenu/candidates.json.gz.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_replaces_previous_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("candidates.json.gz");

        let first: CandidateStore = [("a", 1), ("b", 2)].into_iter().collect();
        save(&path, &first).await.unwrap();
        let second: CandidateStore = [("c", 3)].into_iter().collect();
        save(&path, &second).await.unwrap();

        assert_eq!(load(&path).await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_save_over_directory_fails_naming_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("candidates.json.gz");
        std::fs::create_dir(&path).unwrap();
        let store: CandidateStore = [("vim", 1)].into_iter().collect();

        let err = save(&path, &store).await.unwrap_err();

        assert!(matches!(err, CandidateError::Persist { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
        assert!(path.is_dir());
        assert!(!temp_dir.path().join("candidates.json.gz.tmp").exists());
    }

    #[tokio::test]
    async fn test_load_corrupt_file_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("candidates.json.gz");
        std::fs::write(&path, b"definitely not gzip").unwrap();

        let err = load(&path).await.unwrap_err();

        assert!(matches!(err, CandidateError::Load { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
    }
}
