use rusqlite::{Connection, Result as SqlResult};
use std::path::{Path, PathBuf};
use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use super::data::Photo;

/// The Library manages the SQLite catalog database.
/// It stores photo metadata (date taken, tags) and references to the
/// image files on disk.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
}

/// Failures while exporting the catalog to a JSON file
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),
}

impl Library {
    /// Create a Library at the default location and initialize the database.
    ///
    /// The database file is created in the user's data directory:
    /// - Linux: ~/.local/share/photo-portal/photo_portal.db
    /// - macOS: ~/Library/Application Support/photo-portal/photo_portal.db
    /// - Windows: %APPDATA%\photo-portal\photo_portal.db
    pub fn new() -> SqlResult<Self> {
        Self::open(Self::default_db_path())
    }

    /// Open (or create) the catalog at an explicit path.
    ///
    /// Separate from `new` so the bootstrap decides where the database
    /// lives and tests can point it at a scratch directory.
    pub fn open(db_path: PathBuf) -> SqlResult<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .expect("Failed to create application data directory");
        }

        let conn = Connection::open(&db_path)?;

        info!("Database initialized at: {}", db_path.display());

        let mut library = Library { conn, db_path };
        library.init_schema()?;

        Ok(library)
    }

    /// Get the path where the database is stored by default
    fn default_db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(|| dirs::home_dir())
            .expect("Could not determine user data directory");

        path.push("photo-portal");
        path.push("photo_portal.db");
        path
    }

    /// Initialize the database schema.
    /// Creates all necessary tables and indexes if they don't exist.
    fn init_schema(&mut self) -> SqlResult<()> {
        // Create photos table
        // This stores metadata about imported image files
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS photos (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                path            TEXT NOT NULL UNIQUE,
                filename        TEXT NOT NULL,
                date_taken      TEXT NOT NULL DEFAULT '',
                tags            TEXT NOT NULL DEFAULT '',
                imported_at     INTEGER NOT NULL,
                thumbnail_path  TEXT,
                cache_status    TEXT DEFAULT 'pending',
                file_status     TEXT DEFAULT 'exists'
            )",
            [],
        )?;

        // Create indexes for fast queries
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_photos_imported_at
             ON photos(imported_at DESC)",
            [],
        )?;

        // Index for cache_status to quickly find pending thumbnails
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_photos_cache_status
             ON photos(cache_status)",
            [],
        )?;

        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Get a count of photos in the catalog
    pub fn photo_count(&self) -> SqlResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM photos",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Add a new photo to the catalog
    /// Returns the new photo ID; a duplicate path fails the UNIQUE
    /// constraint
    pub fn add_photo(
        &self,
        path: &str,
        filename: &str,
        date_taken: &str,
        tags: &str,
    ) -> SqlResult<i64> {
        self.conn.execute(
            "INSERT INTO photos (path, filename, date_taken, tags, imported_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![path, filename, date_taken, tags, Utc::now().timestamp()],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Get all photos from the catalog
    /// Returns a vector of Photo structs ordered by import date (newest first)
    pub fn get_all_photos(&self) -> SqlResult<Vec<Photo>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, filename, path, date_taken, tags, thumbnail_path,
                    COALESCE(file_status, 'exists')
             FROM photos ORDER BY imported_at DESC, id DESC",
        )?;

        let photo_iter = stmt.query_map([], |row| {
            Ok(Photo {
                id: row.get(0)?,
                filename: row.get(1)?,
                path: row.get(2)?,
                date_taken: row.get(3)?,
                tags: row.get(4)?,
                thumbnail_path: row.get(5)?,
                file_status: row.get(6)?,
            })
        })?;

        let mut photos = Vec::new();
        for photo in photo_iter {
            photos.push(photo?);
        }

        Ok(photos)
    }

    /// Verify that photo files still exist on disk
    /// Mark as 'deleted' if the file is missing
    pub fn verify_files(&self) -> SqlResult<usize> {
        let mut stmt = self.conn.prepare(
            "SELECT id, path FROM photos WHERE file_status = 'exists'",
        )?;

        let existing_photos: Vec<(i64, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .filter_map(|r| r.ok())
            .collect();

        let mut deleted_count = 0;
        for (id, file_path) in existing_photos {
            if !Path::new(&file_path).exists() {
                self.conn.execute(
                    "UPDATE photos SET file_status = 'deleted' WHERE id = ?1",
                    rusqlite::params![id],
                )?;
                deleted_count += 1;
            }
        }

        if deleted_count > 0 {
            warn!("Marked {} missing files as deleted", deleted_count);
        }

        Ok(deleted_count)
    }

    /// Export every catalog row to a pretty-printed JSON file.
    /// Returns the number of photos written.
    pub fn export_json(&self, target: &Path) -> Result<usize, ExportError> {
        let photos = self.get_all_photos()?;
        let json = serde_json::to_string_pretty(&photos)?;
        std::fs::write(target, json)?;

        info!("Exported {} photos to {}", photos.len(), target.display());

        Ok(photos.len())
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::ErrorCode;

    fn temp_library() -> (tempfile::TempDir, Library) {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::open(dir.path().join("test.db")).unwrap();
        (dir, library)
    }

    #[test]
    fn test_empty_catalog_counts_zero() {
        let (_dir, library) = temp_library();
        assert_eq!(library.photo_count().unwrap(), 0);
        assert!(library.get_all_photos().unwrap().is_empty());
    }

    #[test]
    fn test_add_and_list_photos_newest_first() {
        let (_dir, library) = temp_library();
        library
            .add_photo("/photos/a.jpg", "a.jpg", "1/5/2024", "beach")
            .unwrap();
        library
            .add_photo("/photos/b.jpg", "b.jpg", "2/6/2024", "")
            .unwrap();

        assert_eq!(library.photo_count().unwrap(), 2);

        let photos = library.get_all_photos().unwrap();
        assert_eq!(photos.len(), 2);
        // Most recently added row comes first
        assert_eq!(photos[0].filename, "b.jpg");
        assert_eq!(photos[1].filename, "a.jpg");
        assert_eq!(photos[1].date_taken, "1/5/2024");
        assert_eq!(photos[1].tags, "beach");
        assert!(photos[0].thumbnail_path.is_none());
    }

    #[test]
    fn test_duplicate_path_is_rejected() {
        let (_dir, library) = temp_library();
        library
            .add_photo("/photos/a.jpg", "a.jpg", "", "")
            .unwrap();

        let err = library
            .add_photo("/photos/a.jpg", "a.jpg", "", "")
            .unwrap_err();

        match err {
            rusqlite::Error::SqliteFailure(e, _) => {
                assert_eq!(e.code, ErrorCode::ConstraintViolation);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_verify_files_marks_missing_photos() {
        let (dir, library) = temp_library();

        // One file that really exists, one that never did
        let real = dir.path().join("real.jpg");
        std::fs::write(&real, b"not actually a jpeg").unwrap();
        library
            .add_photo(&real.to_string_lossy(), "real.jpg", "", "")
            .unwrap();
        library
            .add_photo("/nonexistent/gone.jpg", "gone.jpg", "", "")
            .unwrap();

        assert_eq!(library.verify_files().unwrap(), 1);

        let photos = library.get_all_photos().unwrap();
        let gone = photos.iter().find(|p| p.filename == "gone.jpg").unwrap();
        let real = photos.iter().find(|p| p.filename == "real.jpg").unwrap();
        assert_eq!(gone.file_status, "deleted");
        assert_eq!(real.file_status, "exists");
    }

    #[test]
    fn test_export_json_round_trips() {
        let (dir, library) = temp_library();
        library
            .add_photo("/photos/a.jpg", "a.jpg", "1/5/2024", "beach,sunset")
            .unwrap();
        library
            .add_photo("/photos/b.jpg", "b.jpg", "", "")
            .unwrap();

        let target = dir.path().join("photos.json");
        assert_eq!(library.export_json(&target).unwrap(), 2);

        let json = std::fs::read_to_string(&target).unwrap();
        let photos: Vec<Photo> = serde_json::from_str(&json).unwrap();
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[1].tags, "beach,sunset");
    }
}
