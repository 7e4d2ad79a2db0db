use iced::widget::{center, column, container, image, mouse_area, opaque, text, Stack};
use iced::{Alignment, ContentFit, Element, Length};
use std::path::PathBuf;

use crate::Message;

/// Largest edge of the preview image in logical pixels
const PREVIEW_SIZE: f32 = 720.0;

/// The modal preview pane. Holds at most one image; showing a new photo
/// replaces the previous content wholesale.
#[derive(Debug, Default)]
pub struct PreviewPane {
    /// Path of the image currently shown
    source: Option<String>,
    /// Handle for the image widget
    handle: Option<image::Handle>,
}

impl PreviewPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pane's content with a single image element for `url`.
    /// Any previous content is discarded first. The path is assumed
    /// well-formed; no validation is performed.
    pub fn show(&mut self, url: impl Into<String>) {
        let url = url.into();
        self.handle = Some(image::Handle::from_path(PathBuf::from(&url)));
        self.source = Some(url);
    }

    /// Drop the current content, closing the overlay
    pub fn clear(&mut self) {
        self.handle = None;
        self.source = None;
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Path of the image currently shown, if any
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// The pane's sole child: the current image with its fixed label
    pub fn view(&self) -> Element<'_, Message> {
        let body: Element<'_, Message> = match &self.handle {
            Some(handle) => image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fixed(PREVIEW_SIZE))
                .height(Length::Fixed(PREVIEW_SIZE))
                .into(),
            None => text("No photo selected").into(),
        };

        container(
            column![body, text("preview").size(12)]
                .spacing(8)
                .align_x(Alignment::Center),
        )
        .padding(12)
        .style(container::rounded_box)
        .into()
    }
}

/// Stack `content` over `base` as a modal overlay.
/// Clicking the backdrop emits `on_blur`.
pub fn modal<'a>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_blur: Message,
) -> Element<'a, Message> {
    Stack::with_children(vec![
        base.into(),
        opaque(mouse_area(center(opaque(content))).on_press(on_blur)),
    ])
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_replaces_previous_content() {
        let mut pane = PreviewPane::new();
        pane.show("/photos/a.jpg");
        pane.show("/photos/b.jpg");

        // One image only, pointing at the most recent source
        assert!(pane.is_open());
        assert_eq!(pane.source(), Some("/photos/b.jpg"));
    }

    #[test]
    fn test_clear_closes_the_pane() {
        let mut pane = PreviewPane::new();
        pane.show("/photos/a.jpg");
        pane.clear();

        assert!(!pane.is_open());
        assert_eq!(pane.source(), None);
    }

    #[test]
    fn test_show_after_clear_reopens() {
        let mut pane = PreviewPane::new();
        pane.show("/photos/a.jpg");
        pane.clear();
        pane.show("/photos/c.jpg");

        assert!(pane.is_open());
        assert_eq!(pane.source(), Some("/photos/c.jpg"));
    }
}
