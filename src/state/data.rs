/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the catalog layer and the UI layer.

use serde::{Deserialize, Serialize};

/// A single photo in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Unique database ID
    pub id: i64,
    /// Filename only (e.g., "IMG_0412.jpg")
    pub filename: String,
    /// Full path to the image file
    pub path: String,
    /// Date the photo was taken, M/D/YYYY (empty when unknown)
    pub date_taken: String,
    /// Comma-separated tags (may be empty)
    pub tags: String,
    /// Path to the cached thumbnail (None until generated)
    pub thumbnail_path: Option<String>,
    /// File status: 'exists' or 'deleted'
    pub file_status: String,
}
