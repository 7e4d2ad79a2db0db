use image::{imageops::FilterType, DynamicImage};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{error, info, warn};

/// Size of generated thumbnails (square bounding box)
const THUMBNAIL_SIZE: u32 = 256;

/// Get the thumbnail cache directory
/// Returns ~/.cache/photo-portal/thumbnails on Linux
pub fn get_thumbnail_cache_dir() -> PathBuf {
    let mut path = dirs_next::cache_dir()
        .or_else(|| dirs_next::home_dir())
        .expect("Could not determine cache directory");

    path.push("photo-portal");
    path.push("thumbnails");

    // Ensure the directory exists
    fs::create_dir_all(&path).expect("Failed to create thumbnail cache directory");

    path
}

/// Generate a thumbnail for an image file
/// Returns the path to the saved thumbnail, or None if generation failed
pub fn generate_thumbnail(image_path: &Path, photo_id: i64) -> Option<PathBuf> {
    let img = match image::open(image_path) {
        Ok(img) => img,
        Err(e) => {
            warn!("Could not decode {}: {}", image_path.display(), e);
            return None;
        }
    };

    let thumbnail = img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3);

    let cache_dir = get_thumbnail_cache_dir();
    let thumbnail_path = cache_dir.join(format!("{}.jpg", photo_id));

    // JPEG has no alpha channel, so flatten before saving
    let flattened = DynamicImage::ImageRgb8(thumbnail.to_rgb8());
    if let Err(e) = flattened.save(&thumbnail_path) {
        warn!("Could not save thumbnail for {}: {}", image_path.display(), e);
        return None;
    }

    Some(thumbnail_path)
}

/// Generate thumbnails for every catalog row still marked pending.
/// Runs on a blocking task with its own database connection; returns
/// how many thumbnails were produced.
pub async fn generate_pending(db_path: PathBuf) -> usize {
    task::spawn_blocking(move || generate_pending_blocking(&db_path))
        .await
        .unwrap_or(0)
}

/// Blocking implementation of pending-thumbnail generation
fn generate_pending_blocking(db_path: &Path) -> usize {
    // Open a new database connection for this background task
    // rusqlite::Connection is not Send, so we can't share the main connection
    let conn = match Connection::open(db_path) {
        Ok(conn) => conn,
        Err(e) => {
            error!("Failed to open database for thumbnail generation: {}", e);
            return 0;
        }
    };

    let pending = match collect_pending(&conn) {
        Ok(pending) => pending,
        Err(e) => {
            error!("Failed to query pending thumbnails: {}", e);
            return 0;
        }
    };

    let mut generated = 0;
    for (photo_id, path) in pending {
        let update = match generate_thumbnail(Path::new(&path), photo_id) {
            Some(thumbnail_path) => {
                generated += 1;
                conn.execute(
                    "UPDATE photos SET thumbnail_path = ?1, cache_status = 'cached'
                     WHERE id = ?2",
                    rusqlite::params![thumbnail_path.to_string_lossy(), photo_id],
                )
            }
            None => conn.execute(
                "UPDATE photos SET cache_status = 'failed' WHERE id = ?1",
                rusqlite::params![photo_id],
            ),
        };

        if let Err(e) = update {
            warn!("Failed to record thumbnail state for {}: {}", path, e);
        }
    }

    if generated > 0 {
        info!("Generated {} thumbnails", generated);
    }

    generated
}

fn collect_pending(conn: &Connection) -> rusqlite::Result<Vec<(i64, String)>> {
    let mut stmt = conn.prepare(
        "SELECT id, path FROM photos WHERE cache_status = 'pending'",
    )?;

    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect()
}
