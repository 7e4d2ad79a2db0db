use iced::widget::{button, column, container, image, scrollable, text};
use iced::{Element, Length};
use iced_aw::Wrap;
use std::path::PathBuf;

use crate::state::data::Photo;
use crate::Message;

/// Edge of a gallery cell in logical pixels
const CELL_SIZE: f32 = 180.0;

/// The thumbnail grid. Clicking a cell opens that photo in the preview
/// overlay.
pub fn gallery(photos: &[Photo]) -> Element<'_, Message> {
    let mut cells: Vec<Element<'_, Message>> = Vec::new();
    for photo in photos {
        // Photos whose backing file disappeared stay in the catalog but
        // are not rendered
        if photo.file_status == "deleted" {
            continue;
        }
        cells.push(cell(photo));
    }

    if cells.is_empty() {
        return container(text("No photos to show. Import a folder to get started."))
            .padding(24)
            .into();
    }

    let grid: Element<'_, Message> = Wrap::with_elements(cells)
        .spacing(12.0)
        .line_spacing(12.0)
        .into();

    scrollable(container(grid).width(Length::Fill).padding(16))
        .height(Length::Fill)
        .into()
}

fn cell(photo: &Photo) -> Element<'_, Message> {
    let thumb: Element<'_, Message> = match &photo.thumbnail_path {
        Some(path) => image(image::Handle::from_path(PathBuf::from(path)))
            .width(Length::Fixed(CELL_SIZE))
            .height(Length::Fixed(CELL_SIZE))
            .into(),
        None => container(text("no preview").size(12))
            .center_x(Length::Fixed(CELL_SIZE))
            .center_y(Length::Fixed(CELL_SIZE))
            .into(),
    };

    button(
        column![thumb, text(&photo.filename).size(12)].spacing(6),
    )
    .on_press(Message::OpenPreview(photo.path.clone()))
    .padding(6)
    .into()
}
