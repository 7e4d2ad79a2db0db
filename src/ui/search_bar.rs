use iced::widget::{button, pick_list, row, text_input};
use iced::{Alignment, Element, Length};

use crate::search::{SearchForm, SearchMode};
use crate::Message;

/// Width of the single visible search input
const INPUT_WIDTH: f32 = 280.0;

/// The search bar: mode selector plus exactly one visible input.
///
/// Which input gets rendered follows the form's active mode; the other
/// two are absent from the widget tree entirely.
pub fn search_bar(form: &SearchForm) -> Element<'_, Message> {
    let input: Element<'_, Message> = match form.mode {
        SearchMode::Name => text_input("Search by name", &form.name)
            .on_input(Message::NameChanged)
            .on_submit(Message::SearchSubmitted)
            .width(Length::Fixed(INPUT_WIDTH))
            .into(),
        SearchMode::Date => text_input("M/D/YYYY", &form.date)
            .on_input(Message::DateChanged)
            .on_submit(Message::SearchSubmitted)
            .width(Length::Fixed(INPUT_WIDTH))
            .into(),
        SearchMode::Tags => text_input("tag1,tag2", &form.tags)
            .on_input(Message::TagsChanged)
            .on_submit(Message::SearchSubmitted)
            .width(Length::Fixed(INPUT_WIDTH))
            .into(),
    };

    row![
        pick_list(SearchMode::ALL, Some(form.mode), Message::ModeSelected),
        input,
        button("Search").on_press(Message::SearchSubmitted).padding(10),
        button("Show All").on_press(Message::ClearSearch).padding(10),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .into()
}
