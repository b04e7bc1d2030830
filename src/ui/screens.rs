use std::cmp::min;

use crate::catalog::{Library, SearchQuery};
use crate::models::Book;

/// Entries of the main menu, in display order. The number shown next to each
/// entry is its position plus one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum MenuOption {
    AddBook,
    RemoveBook,
    Search,
    DisplayAll,
    Sort,
    Statistics,
    Import,
    Export,
    SaveAndExit,
}

impl MenuOption {
    pub(crate) const ALL: [MenuOption; 9] = [
        MenuOption::AddBook,
        MenuOption::RemoveBook,
        MenuOption::Search,
        MenuOption::DisplayAll,
        MenuOption::Sort,
        MenuOption::Statistics,
        MenuOption::Import,
        MenuOption::Export,
        MenuOption::SaveAndExit,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            MenuOption::AddBook => "Add a book",
            MenuOption::RemoveBook => "Remove a book",
            MenuOption::Search => "Search for a book",
            MenuOption::DisplayAll => "Display all books",
            MenuOption::Sort => "Sort books",
            MenuOption::Statistics => "Display statistics",
            MenuOption::Import => "Import books (CSV or JSON)",
            MenuOption::Export => "Export books (CSV or JSON)",
            MenuOption::SaveAndExit => "Save and exit",
        }
    }

    /// Map a typed digit (`'1'..='9'`) to its option.
    pub(crate) fn from_digit(ch: char) -> Option<Self> {
        let n = ch.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|idx| Self::ALL.get(idx).copied())
    }
}

/// Where the rows of a book list come from, so the list can be rebuilt after
/// the library changes underneath it.
#[derive(Clone, Debug)]
pub(crate) enum ListSource {
    All,
    Search(SearchQuery),
}

/// Scrollable list of books with a selection cursor.
pub(crate) struct BookListScreen {
    pub(crate) heading: String,
    pub(crate) source: ListSource,
    pub(crate) books: Vec<Book>,
    pub(crate) selected: usize,
}

impl BookListScreen {
    pub(crate) fn new(heading: impl Into<String>, source: ListSource, library: &Library) -> Self {
        let mut screen = Self {
            heading: heading.into(),
            source,
            books: Vec::new(),
            selected: 0,
        };
        screen.refresh(library);
        screen
    }

    /// Re-run the source against `library`, keeping the cursor in range.
    pub(crate) fn refresh(&mut self, library: &Library) {
        self.books = match &self.source {
            ListSource::All => library.books().to_vec(),
            ListSource::Search(query) => library.search(query).into_iter().cloned().collect(),
        };
        if self.selected >= self.books.len() {
            self.selected = self.books.len().saturating_sub(1);
        }
    }

    pub(crate) fn current_book(&self) -> Option<&Book> {
        self.books.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.books.is_empty() {
            return;
        }
        let max = self.books.len() - 1;
        let next = self.selected as isize + offset;
        self.selected = min(next.max(0) as usize, max);
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.books.len().saturating_sub(1);
    }

    pub(crate) fn empty_message(&self) -> &'static str {
        match self.source {
            ListSource::All => "Your library is empty.",
            ListSource::Search(_) => "No matching books found.",
        }
    }
}
