//! File-based storage implementation for native platforms.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::document::{SceneDocument, export_file_name};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores exported scenes as `<id>.json` files in a directory.
pub struct FileStorage {
    /// Base directory for document storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {e}"))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Default export directory, if the user's data directory is known.
    ///
    /// On Unix: `~/.local/share/glsketch/drawings/`
    /// On Windows: `%LOCALAPPDATA%\glsketch\drawings\`
    pub fn default_dir() -> Option<PathBuf> {
        let base = dirs::data_local_dir().or_else(dirs::home_dir)?;
        Some(base.join("glsketch").join("drawings"))
    }

    /// Get the file path for a document ID.
    pub fn document_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(export_file_name(&safe_id))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, document: &SceneDocument) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.document_path(id);
        let json = match document.to_json() {
            Ok(j) => j,
            Err(e) => {
                return Box::pin(async move { Err(StorageError::Serialization(e.to_string())) });
            }
        };

        Box::pin(async move {
            fs::write(&path, json).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {e}", path.display()))
            })?;
            log::info!("Saved {}", path.display());
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<SceneDocument>> {
        let path = self.document_path(id);
        let id_owned = id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id_owned));
            }

            let json = fs::read_to_string(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {e}", path.display()))
            })?;

            Ok(SceneDocument::from_json(&json)?)
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();

        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }

            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {e}")))?;

            let mut ids: Vec<String> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|e| e == "json"))
                .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
                .collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.document_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentError;
    use crate::storage::block_on;
    use crate::tools::DrawingSession;
    use kurbo::Point;
    use tempfile::tempdir;

    fn line_document() -> SceneDocument {
        let mut session = DrawingSession::new();
        session.pointer_down(Point::new(0.0, 0.0));
        session.pointer_move(Point::new(10.0, 10.0));
        session.pointer_up(Point::new(10.0, 10.0));
        session.export_document()
    }

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let doc = line_document();

        block_on(storage.save("drawing", &doc)).unwrap();
        assert!(dir.path().join("drawing.json").exists());

        let loaded = block_on(storage.load("drawing")).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_blank_name_saves_as_data() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.save("", &line_document())).unwrap();
        assert!(dir.path().join("data.json").exists());
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_malformed_file_is_document_error() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        fs::write(
            dir.path().join("bad.json"),
            r#"{ "arrayOfObjects": [], "idxNow": "3" }"#,
        )
        .unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();

        assert!(matches!(
            block_on(storage.load("bad")),
            Err(StorageError::Document(DocumentError::Malformed(_)))
        ));
        assert!(matches!(
            block_on(storage.load("broken")),
            Err(StorageError::Document(DocumentError::Parse(_)))
        ));
    }

    #[test]
    fn test_default_dir_is_under_data_dir() {
        if let Some(dir) = FileStorage::default_dir() {
            assert!(dir.ends_with(Path::new("glsketch").join("drawings")));
        }
    }

    #[test]
    fn test_file_storage_list_and_exists() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let doc = line_document();

        block_on(storage.save("doc1", &doc)).unwrap();
        block_on(storage.save("doc2", &doc)).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let list = block_on(storage.list()).unwrap();
        assert_eq!(list, vec!["doc1".to_string(), "doc2".to_string()]);

        assert!(block_on(storage.exists("doc1")).unwrap());
        assert!(!block_on(storage.exists("notes")).unwrap());
    }

    #[test]
    fn test_file_storage_sanitizes_id() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let doc = line_document();

        block_on(storage.save("test/doc:with*special", &doc)).unwrap();
        let loaded = block_on(storage.load("test/doc:with*special")).unwrap();
        assert_eq!(loaded, doc);
    }
}
