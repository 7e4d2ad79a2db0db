/// UI building blocks
///
/// This module handles:
/// - The thumbnail grid (gallery.rs)
/// - The modal preview pane (preview.rs)
/// - The search bar with its single visible input (search_bar.rs)

pub mod gallery;
pub mod preview;
pub mod search_bar;

use rfd::{MessageButtons, MessageDialog, MessageLevel};

/// Blocking user-facing alert. The search guard uses this to report
/// validation failures before a search is allowed to run.
pub fn alert(message: &str) {
    let _ = MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("Photo Portal")
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}
