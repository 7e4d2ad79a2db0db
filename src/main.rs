use iced::{Element, Task, Theme};
use iced::widget::{button, column, container, horizontal_space, row, text};
use iced::{Alignment, Length};
use rfd::FileDialog;
use rusqlite::ErrorCode;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use chrono::{DateTime, Local};
use tracing::{error, info, warn};

// Declare the application modules
mod logging;
mod media;
mod search;
mod state;
mod ui;

use search::{filter_photos, SearchForm, SearchMode};
use state::data::Photo;

/// Result of a folder import operation
#[derive(Debug, Clone)]
struct ImportResult {
    imported_count: usize,
    skipped_count: usize,
}

/// Main application state
struct PhotoPortal {
    /// The catalog database
    library: state::library::Library,
    /// Every catalog photo, newest first
    photos: Vec<Photo>,
    /// Photos matching the last search, while one is active
    results: Option<Vec<Photo>>,
    /// The search form guard
    form: SearchForm,
    /// The modal preview pane
    preview: ui::preview::PreviewPane,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Import Folder" button
    ImportFolder,
    /// Background import completed with results
    ImportComplete(ImportResult),
    /// Background thumbnail generation finished
    ThumbnailsDone(usize),
    /// User picked a different search mode
    ModeSelected(SearchMode),
    /// Text edits to the three search inputs
    NameChanged(String),
    DateChanged(String),
    TagsChanged(String),
    /// User submitted the search form
    SearchSubmitted,
    /// User asked for the full gallery again
    ClearSearch,
    /// A thumbnail was clicked; open the photo in the preview overlay
    OpenPreview(String),
    /// User clicked the backdrop behind the preview
    ClosePreview,
    /// User clicked the "Export Catalog" button
    ExportCatalog,
}

impl PhotoPortal {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        // Initialize the database
        // If this fails, we panic because the app cannot function without its database
        let library = state::library::Library::new()
            .expect("Failed to initialize database. Check permissions and disk space.");

        if let Err(e) = library.verify_files() {
            warn!("File verification failed: {}", e);
        }

        let photo_count = library.photo_count().unwrap_or(0);
        let photos = library.get_all_photos().unwrap_or_default();
        info!("Photo Portal initialized with {} photos", photo_count);

        let status = format!("Ready. {} photos in library.", photo_count);

        (
            PhotoPortal {
                library,
                photos,
                results: None,
                form: SearchForm::new(),
                preview: ui::preview::PreviewPane::new(),
                status,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ImportFolder => {
                // Show the native folder picker dialog
                let folder = FileDialog::new()
                    .set_title("Select Folder with Photos")
                    .pick_folder();

                if let Some(folder_path) = folder {
                    self.status = format!("Importing from {}...", folder_path.display());

                    // Get the database path for the background task
                    let db_path = self.library.path().clone();

                    return Task::perform(
                        import_folder_async(folder_path, db_path),
                        Message::ImportComplete,
                    );
                }

                Task::none()
            }
            Message::ImportComplete(result) => {
                self.status = format!(
                    "Import complete. Added {} photos, skipped {} duplicates.",
                    result.imported_count, result.skipped_count
                );

                info!(
                    "Import summary: {} new, {} skipped",
                    result.imported_count, result.skipped_count
                );

                // Fill in thumbnails for whatever just arrived
                Task::perform(
                    media::thumbnail::generate_pending(self.library.path().clone()),
                    Message::ThumbnailsDone,
                )
            }
            Message::ThumbnailsDone(count) => {
                if count > 0 {
                    info!("Thumbnail pass produced {} thumbnails", count);
                }
                self.reload();
                Task::none()
            }
            Message::ModeSelected(mode) => {
                // Visibility of the three inputs follows the mode
                self.form.set_mode(mode);
                Task::none()
            }
            Message::NameChanged(value) => {
                self.form.name = value;
                Task::none()
            }
            Message::DateChanged(value) => {
                self.form.date = value;
                Task::none()
            }
            Message::TagsChanged(value) => {
                self.form.tags = value;
                Task::none()
            }
            Message::SearchSubmitted => {
                match self.form.validate() {
                    Err(e) => {
                        // Block the search and tell the user what's wrong
                        warn!("Search rejected: {}", e);
                        ui::alert(&e.to_string());
                    }
                    Ok(()) => {
                        let query = self.form.query().trim().to_string();
                        let matched = filter_photos(&self.photos, self.form.mode, &query);

                        self.status = if matched.is_empty() {
                            "No matching photos found".to_string()
                        } else {
                            "Matching photos found".to_string()
                        };
                        self.results = Some(matched);
                    }
                }
                Task::none()
            }
            Message::ClearSearch => {
                self.results = None;
                self.status = format!("Ready. {} photos in library.", self.photos.len());
                Task::none()
            }
            Message::OpenPreview(path) => {
                self.preview.show(path);
                Task::none()
            }
            Message::ClosePreview => {
                self.preview.clear();
                Task::none()
            }
            Message::ExportCatalog => {
                let target = FileDialog::new()
                    .set_title("Export Catalog")
                    .set_file_name("photos.json")
                    .save_file();

                if let Some(target) = target {
                    match self.library.export_json(&target) {
                        Ok(count) => {
                            self.status =
                                format!("Exported {} photos to {}.", count, target.display());
                        }
                        Err(e) => {
                            error!("Export failed: {}", e);
                            self.status = format!("Export failed: {}", e);
                        }
                    }
                }

                Task::none()
            }
        }
    }

    /// Re-read the catalog after background work finished
    fn reload(&mut self) {
        match self.library.get_all_photos() {
            Ok(photos) => {
                self.photos = photos;
                self.status = format!("Ready. {} photos in library.", self.photos.len());
            }
            Err(e) => {
                error!("Failed to reload catalog: {}", e);
                self.status = format!("Failed to reload catalog: {}", e);
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let header = row![
            text("Photo Portal").size(28),
            horizontal_space(),
            button("Import Folder")
                .on_press(Message::ImportFolder)
                .padding(10),
            button("Export Catalog")
                .on_press(Message::ExportCatalog)
                .padding(10),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        // Show search results while a search is active, the whole
        // catalog otherwise
        let shown = self.results.as_ref().unwrap_or(&self.photos);

        let content = column![
            header,
            ui::search_bar::search_bar(&self.form),
            text(&self.status).size(14),
            ui::gallery::gallery(shown),
        ]
        .spacing(16)
        .padding(20);

        let base = container(content)
            .width(Length::Fill)
            .height(Length::Fill);

        if self.preview.is_open() {
            ui::preview::modal(base, self.preview.view(), Message::ClosePreview)
        } else {
            base.into()
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    let _guard = logging::init();

    iced::application(
        "Photo Portal",
        PhotoPortal::update,
        PhotoPortal::view,
    )
    .theme(PhotoPortal::theme)
    .centered()
    .run_with(PhotoPortal::new)
}

/// Import all image files from a folder
/// Runs on a blocking task to avoid stalling the UI
async fn import_folder_async(folder_path: PathBuf, db_path: PathBuf) -> ImportResult {
    tokio::task::spawn_blocking(move || import_folder_blocking(&folder_path, &db_path))
        .await
        .unwrap_or(ImportResult {
            imported_count: 0,
            skipped_count: 0,
        })
}

/// Blocking implementation of the folder import
fn import_folder_blocking(folder_path: &Path, db_path: &Path) -> ImportResult {
    let mut imported_count = 0;
    let mut skipped_count = 0;

    // Open a separate catalog handle for this background task
    // rusqlite::Connection is not Send, so we can't share the main one
    let library = match state::library::Library::open(db_path.to_path_buf()) {
        Ok(library) => library,
        Err(e) => {
            error!("Failed to open catalog for import: {}", e);
            return ImportResult {
                imported_count: 0,
                skipped_count: 0,
            };
        }
    };

    info!("Scanning folder: {}", folder_path.display());

    // Formats the gallery can decode and thumbnail
    let image_extensions = [
        "jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff",
    ];

    // Walk the directory tree recursively
    for entry in WalkDir::new(folder_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        // Only process files (not directories)
        if !path.is_file() {
            continue;
        }

        // Check if this is an image file by extension
        if let Some(extension) = path.extension() {
            let ext = extension.to_string_lossy().to_lowercase();
            if !image_extensions.contains(&ext.as_str()) {
                continue;
            }
        } else {
            continue;
        }

        // Extract path and filename
        let path_str = path.to_string_lossy().to_string();
        let filename = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let date_taken = date_taken_from_mtime(path);

        match library.add_photo(&path_str, &filename, &date_taken, "") {
            Ok(_) => {
                imported_count += 1;
                if imported_count % 100 == 0 {
                    info!("Imported {} files...", imported_count);
                }
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                // Already in the catalog
                skipped_count += 1;
            }
            Err(e) => {
                warn!("Error importing {}: {:?}", filename, e);
            }
        }
    }

    info!(
        "Import complete: {} new, {} skipped",
        imported_count, skipped_count
    );

    ImportResult {
        imported_count,
        skipped_count,
    }
}

/// Default "date taken" for an imported file: its modification time as
/// M/D/YYYY, the same shape the date search validates against
fn date_taken_from_mtime(path: &Path) -> String {
    path.metadata()
        .and_then(|metadata| metadata.modified())
        .ok()
        .map(|modified| {
            let local: DateTime<Local> = modified.into();
            local.format("%-m/%-d/%Y").to_string()
        })
        .unwrap_or_default()
}
