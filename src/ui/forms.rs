use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::catalog::SearchQuery;
use crate::models::{parse_rating, parse_read_status, parse_year, NewBook};

/// Fields of the add-book form, in tab order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Year,
    Genre,
    Read,
    Rating,
}

impl BookField {
    pub(crate) const ALL: [BookField; 6] = [
        BookField::Title,
        BookField::Author,
        BookField::Year,
        BookField::Genre,
        BookField::Read,
        BookField::Rating,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Year => "Year",
            BookField::Genre => "Genre",
            BookField::Read => "Read (yes/no)",
            BookField::Rating => "Rating (1-5)",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            BookField::Title | BookField::Year | BookField::Read => "<required>",
            BookField::Author | BookField::Genre => "<optional>",
            BookField::Rating => "<blank for unrated>",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// Form state for creating a book.
#[derive(Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: String,
    pub(crate) genre: String,
    pub(crate) read: String,
    pub(crate) rating: String,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

impl BookForm {
    pub(crate) fn next_field(&mut self) {
        let idx = (self.active.index() + 1) % BookField::ALL.len();
        self.active = BookField::ALL[idx];
    }

    pub(crate) fn previous_field(&mut self) {
        let len = BookField::ALL.len();
        let idx = (self.active.index() + len - 1) % len;
        self.active = BookField::ALL[idx];
    }

    fn value(&self, field: BookField) -> &String {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Year => &self.year,
            BookField::Genre => &self.genre,
            BookField::Read => &self.read,
            BookField::Rating => &self.rating,
        }
    }

    fn value_mut(&mut self, field: BookField) -> &mut String {
        match field {
            BookField::Title => &mut self.title,
            BookField::Author => &mut self.author,
            BookField::Year => &mut self.year,
            BookField::Genre => &mut self.genre,
            BookField::Read => &mut self.read,
            BookField::Rating => &mut self.rating,
        }
    }

    /// Append a character to the active field, rejecting input that can never
    /// be valid there (letters in the year, for instance).
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        let accepted = match self.active {
            BookField::Year => ch.is_ascii_digit() || (ch == '-' && self.year.is_empty()),
            BookField::Rating => ch.is_ascii_digit() || ch == '.',
            BookField::Read => ch.is_ascii_alphabetic(),
            _ => !ch.is_control(),
        };
        if accepted {
            self.value_mut(self.active).push(ch);
        }
        accepted
    }

    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        self.value_mut(field).pop();
    }

    /// Validate the inputs and return the typed field set.
    pub(crate) fn parse_inputs(&self) -> Result<NewBook> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(anyhow!("Book title is required."));
        }
        if self.year.trim().is_empty() {
            return Err(anyhow!("Publication year is required."));
        }
        let publication_year = parse_year(&self.year)?;
        let read_status = parse_read_status(&self.read)?;
        let rating = parse_rating(&self.rating)?;

        Ok(NewBook {
            title: title.to_string(),
            author: self.author.trim().to_string(),
            publication_year,
            genre: self.genre.trim().to_string(),
            read_status,
            rating,
        })
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: BookField) -> Line<'static> {
        field_line(
            field.label(),
            self.value(field),
            field.placeholder(),
            self.active == field,
        )
    }

    pub(crate) fn value_len(&self, field: BookField) -> usize {
        self.value(field).chars().count()
    }
}

/// Single-line text input, used for titles and file paths.
#[derive(Clone)]
pub(crate) struct TextPrompt {
    pub(crate) label: &'static str,
    pub(crate) value: String,
    pub(crate) error: Option<String>,
}

impl TextPrompt {
    pub(crate) fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            error: None,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value.pop();
    }

    /// The trimmed input, or an error naming the missing field.
    pub(crate) fn required(&self) -> Result<&str> {
        let value = self.value.trim();
        if value.is_empty() {
            Err(anyhow!("{} is required.", self.label))
        } else {
            Ok(value)
        }
    }

    pub(crate) fn build_line(&self) -> Line<'static> {
        field_line(self.label, &self.value, "<required>", true)
    }

    pub(crate) fn value_len(&self) -> usize {
        self.value.chars().count()
    }
}

/// Which field a search looks at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum SearchMode {
    #[default]
    Title,
    Author,
    Keyword,
}

impl SearchMode {
    pub(crate) fn label(self) -> &'static str {
        match self {
            SearchMode::Title => "Title (exact)",
            SearchMode::Author => "Author (exact)",
            SearchMode::Keyword => "Title or author contains",
        }
    }

    fn next(self) -> Self {
        match self {
            SearchMode::Title => SearchMode::Author,
            SearchMode::Author => SearchMode::Keyword,
            SearchMode::Keyword => SearchMode::Title,
        }
    }
}

/// Search dialog: a mode selector plus the search term.
#[derive(Default, Clone)]
pub(crate) struct SearchForm {
    pub(crate) mode: SearchMode,
    pub(crate) term: String,
    pub(crate) error: Option<String>,
}

impl SearchForm {
    pub(crate) fn cycle_mode(&mut self) {
        self.mode = self.mode.next();
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.term.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.term.pop();
    }

    pub(crate) fn query(&self) -> Result<SearchQuery> {
        let term = self.term.trim();
        if term.is_empty() {
            return Err(anyhow!("Enter a search term."));
        }
        let term = term.to_string();
        Ok(match self.mode {
            SearchMode::Title => SearchQuery::Title(term),
            SearchMode::Author => SearchQuery::Author(term),
            SearchMode::Keyword => SearchQuery::Keyword(term),
        })
    }

    pub(crate) fn term_line(&self) -> Line<'static> {
        field_line("Term", &self.term, "<required>", true)
    }

    pub(crate) fn term_len(&self) -> usize {
        self.term.chars().count()
    }
}

/// Pending removal of one selected book.
#[derive(Clone)]
pub(crate) struct ConfirmBookDelete {
    pub(crate) id: uuid::Uuid,
    pub(crate) title: String,
}

/// `Label: value` with the active field highlighted and a dim placeholder
/// for empty values.
fn field_line(label: &str, value: &str, placeholder: &str, is_active: bool) -> Line<'static> {
    let display = if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(display, style),
    ])
}
