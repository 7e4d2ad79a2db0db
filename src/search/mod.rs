/// Search form guard and query execution
///
/// This module handles:
/// - Validating the three mutually exclusive search modes before a
///   search is allowed to run
/// - Keeping exactly one search input visible at a time
/// - Filtering the photo list once validation passes

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

use crate::state::data::Photo;

/// Date shape accepted by the guard: month 1-12 (optionally zero-padded),
/// a 1-2 digit day, exactly 4 digit year. Format only; no day-range or
/// calendar check.
static DATE_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0?[1-9]|1[0-2])/([0-9]{1,2})/\d{4}$").expect("date pattern compiles")
});

/// The selected search dimension. Governs which input is active and
/// which validation rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Name,
    Date,
    Tags,
}

impl SearchMode {
    pub const ALL: [SearchMode; 3] = [SearchMode::Name, SearchMode::Date, SearchMode::Tags];
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Name => write!(f, "Name"),
            SearchMode::Date => write!(f, "Date"),
            SearchMode::Tags => write!(f, "Tags"),
        }
    }
}

/// Validation failures, surfaced to the user via a blocking alert
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text input was left empty
    #[error("{0} should not be empty")]
    EmptyField(SearchMode),
    /// The date text does not match the expected shape
    #[error("Date format should be MM/DD/YYYY")]
    BadFormat,
}

/// State of the search form: the active mode plus the text of all three
/// inputs. Only the input matching the mode is visible at any time.
#[derive(Debug, Clone)]
pub struct SearchForm {
    pub mode: SearchMode,
    pub name: String,
    pub date: String,
    pub tags: String,
}

impl Default for SearchForm {
    fn default() -> Self {
        SearchForm {
            mode: SearchMode::Name,
            name: String::new(),
            date: String::new(),
            tags: String::new(),
        }
    }
}

impl SearchForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the active mode. Input visibility follows the mode.
    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    /// Whether the input for `input` is currently shown.
    /// Exactly one input is visible: the one matching the active mode.
    pub fn is_visible(&self, input: SearchMode) -> bool {
        input == self.mode
    }

    /// Text of the currently visible input, as typed (untrimmed)
    pub fn query(&self) -> &str {
        match self.mode {
            SearchMode::Name => &self.name,
            SearchMode::Date => &self.date,
            SearchMode::Tags => &self.tags,
        }
    }

    /// Presence/format validation for the active mode.
    ///
    /// Name and tags must be non-empty once trimmed. The date must match
    /// M/D/YYYY exactly as typed, so surrounding whitespace fails the
    /// anchored pattern.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.mode {
            SearchMode::Name => {
                if self.name.trim().is_empty() {
                    return Err(ValidationError::EmptyField(SearchMode::Name));
                }
            }
            SearchMode::Date => {
                if !is_valid_date_format(&self.date) {
                    return Err(ValidationError::BadFormat);
                }
            }
            SearchMode::Tags => {
                if self.tags.trim().is_empty() {
                    return Err(ValidationError::EmptyField(SearchMode::Tags));
                }
            }
        }
        Ok(())
    }
}

/// Format-only date check. "02/30/2024" passes; "13/1/2024" does not.
pub fn is_valid_date_format(date: &str) -> bool {
    DATE_FORMAT.is_match(date)
}

/// Filter `photos` down to those matching `query` under `mode`.
/// Callers trim the query first; validation has already passed.
pub fn filter_photos(photos: &[Photo], mode: SearchMode, query: &str) -> Vec<Photo> {
    photos
        .iter()
        .filter(|photo| photo_matches(photo, mode, query))
        .cloned()
        .collect()
}

fn photo_matches(photo: &Photo, mode: SearchMode, query: &str) -> bool {
    match mode {
        SearchMode::Name => {
            !query.is_empty()
                && photo
                    .filename
                    .to_lowercase()
                    .contains(&query.to_lowercase())
        }
        // Exact match required for dates
        SearchMode::Date => !query.is_empty() && photo.date_taken == query,
        SearchMode::Tags => matches_tags(&photo.tags, query),
    }
}

/// ANY query tag appearing among the photo's tags counts as a hit
/// (case-insensitive). An empty query tag list matches nothing.
pub fn matches_tags(photo_tags: &str, query: &str) -> bool {
    let photo_tags = split_tags(photo_tags);
    let query_tags = split_tags(query);
    query_tags.iter().any(|tag| photo_tags.contains(tag))
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(filename: &str, date_taken: &str, tags: &str) -> Photo {
        Photo {
            id: 1,
            filename: filename.to_string(),
            path: format!("/photos/{}", filename),
            date_taken: date_taken.to_string(),
            tags: tags.to_string(),
            thumbnail_path: None,
            file_status: "exists".to_string(),
        }
    }

    #[test]
    fn test_name_mode_rejects_empty_and_whitespace() {
        let mut form = SearchForm::new();
        assert_eq!(
            form.validate(),
            Err(ValidationError::EmptyField(SearchMode::Name))
        );

        form.name = "   ".to_string();
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "Name should not be empty");
    }

    #[test]
    fn test_name_mode_accepts_padded_text() {
        let mut form = SearchForm::new();
        form.name = " a ".to_string();
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn test_date_mode_accepts_format_only() {
        let mut form = SearchForm::new();
        form.set_mode(SearchMode::Date);

        form.date = "1/1/2024".to_string();
        assert_eq!(form.validate(), Ok(()));

        // Day range is not checked against the calendar
        form.date = "02/30/2024".to_string();
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn test_date_mode_rejects_bad_shapes() {
        let mut form = SearchForm::new();
        form.set_mode(SearchMode::Date);

        for bad in ["", "13/1/2024", "1/1/24", "1/1/2024 ", "0/5/2024", "1-1-2024"] {
            form.date = bad.to_string();
            let err = form.validate().unwrap_err();
            assert_eq!(err, ValidationError::BadFormat, "should reject {:?}", bad);
            assert_eq!(err.to_string(), "Date format should be MM/DD/YYYY");
        }
    }

    #[test]
    fn test_date_mode_ignores_other_inputs() {
        // Empty name and tags are irrelevant when the mode is Date
        let mut form = SearchForm::new();
        form.set_mode(SearchMode::Date);
        form.date = "1/1/2024".to_string();
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn test_tags_mode_requires_content() {
        let mut form = SearchForm::new();
        form.set_mode(SearchMode::Tags);

        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "Tags should not be empty");

        form.tags = "  ".to_string();
        assert!(form.validate().is_err());

        form.tags = "vacation,beach".to_string();
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn test_exactly_one_input_visible() {
        let mut form = SearchForm::new();

        form.set_mode(SearchMode::Date);
        let visible: Vec<SearchMode> = SearchMode::ALL
            .into_iter()
            .filter(|mode| form.is_visible(*mode))
            .collect();
        assert_eq!(visible, vec![SearchMode::Date]);

        form.set_mode(SearchMode::Tags);
        let visible: Vec<SearchMode> = SearchMode::ALL
            .into_iter()
            .filter(|mode| form.is_visible(*mode))
            .collect();
        assert_eq!(visible, vec![SearchMode::Tags]);
    }

    #[test]
    fn test_query_follows_active_mode() {
        let mut form = SearchForm::new();
        form.name = "sunset".to_string();
        form.date = "1/1/2024".to_string();
        assert_eq!(form.query(), "sunset");

        form.set_mode(SearchMode::Date);
        assert_eq!(form.query(), "1/1/2024");
    }

    #[test]
    fn test_filter_by_name_is_case_insensitive_substring() {
        let photos = vec![
            photo("Beach_Day.JPG", "", ""),
            photo("mountains.png", "", ""),
        ];

        let matched = filter_photos(&photos, SearchMode::Name, "beach");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].filename, "Beach_Day.JPG");

        assert!(filter_photos(&photos, SearchMode::Name, "river").is_empty());
    }

    #[test]
    fn test_filter_by_date_requires_exact_match() {
        let photos = vec![
            photo("a.jpg", "1/5/2024", ""),
            photo("b.jpg", "01/05/2024", ""),
        ];

        let matched = filter_photos(&photos, SearchMode::Date, "1/5/2024");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].filename, "a.jpg");
    }

    #[test]
    fn test_filter_by_tags_matches_any_tag() {
        let photos = vec![
            photo("a.jpg", "", "Vacation, Beach"),
            photo("b.jpg", "", "work"),
            photo("c.jpg", "", ""),
        ];

        let matched = filter_photos(&photos, SearchMode::Tags, "beach,city");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].filename, "a.jpg");
    }

    #[test]
    fn test_tag_matching_ignores_blank_entries() {
        assert!(matches_tags("beach, sunset", " SUNSET "));
        assert!(!matches_tags("beach", ""));
        assert!(!matches_tags("beach", " , ,"));
        assert!(!matches_tags("", "beach"));
    }
}
