//! In-memory record store. The `Library` owns the ordered list of books for the
//! whole session; persistence only ever sees snapshots of it. Every query here
//! is a linear scan because personal collections stay small.

use std::collections::{BTreeMap, HashSet};

use uuid::Uuid;

use crate::models::{Book, NewBook};

/// Label used in the genre breakdown for books with a blank genre.
const UNSPECIFIED_GENRE: &str = "Unspecified";

/// What to look for and how strictly to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Exact, case-insensitive match on the title.
    Title(String),
    /// Exact, case-insensitive match on the author.
    Author(String),
    /// Case-insensitive substring match against title or author.
    Keyword(String),
}

impl SearchQuery {
    fn matches(&self, book: &Book) -> bool {
        match self {
            SearchQuery::Title(term) => book.title.to_lowercase() == term.to_lowercase(),
            SearchQuery::Author(term) => book.author.to_lowercase() == term.to_lowercase(),
            SearchQuery::Keyword(term) => {
                let needle = term.to_lowercase();
                book.title.to_lowercase().contains(&needle)
                    || book.author.to_lowercase().contains(&needle)
            }
        }
    }

    /// Short human description, e.g. `author "Le Guin"`.
    pub fn describe(&self) -> String {
        match self {
            SearchQuery::Title(term) => format!("title \"{term}\""),
            SearchQuery::Author(term) => format!("author \"{term}\""),
            SearchQuery::Keyword(term) => format!("keyword \"{term}\""),
        }
    }
}

/// Supported sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Ascending, ignoring case.
    Title,
    /// Ascending, ignoring case.
    Author,
    /// Newest publication first.
    YearDescending,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Author => "author",
            SortKey::YearDescending => "year (newest first)",
        }
    }
}

/// Aggregates shown on the statistics screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub read: usize,
    pub rated: usize,
    /// Mean over rated books only; `None` when nothing is rated.
    pub average_rating: Option<f64>,
    /// Book count per genre, busiest first.
    pub genres: Vec<(String, usize)>,
}

impl Statistics {
    /// Share of read books in percent. Zero for an empty library.
    pub fn read_percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.read as f64 / self.total as f64 * 100.0
        }
    }

    pub fn unread(&self) -> usize {
        self.total - self.read
    }
}

/// Ordered collection of books held for the session. Ids are unique within a
/// library: records arriving with an id that is already taken get a new one.
#[derive(Debug, Default, Clone)]
pub struct Library {
    books: Vec<Book>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_books(books: Vec<Book>) -> Self {
        let mut library = Self::new();
        library.extend(books);
        library
    }

    /// All books in their current order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Append a new book at the end. Duplicate titles are allowed.
    pub fn add(&mut self, fields: NewBook) -> &Book {
        self.books.push(Book::new(fields));
        &self.books[self.books.len() - 1]
    }

    /// Append already-built records, keeping their order. Returns how many
    /// of them had to be given a fresh id.
    pub fn extend(&mut self, books: Vec<Book>) -> usize {
        let mut taken: HashSet<Uuid> = self.books.iter().map(|book| book.id).collect();
        let mut reassigned = 0;
        for mut book in books {
            if !taken.insert(book.id) {
                reassigned += 1;
                book.id = Uuid::new_v4();
                taken.insert(book.id);
            }
            self.books.push(book);
        }
        reassigned
    }

    /// Remove every book whose title matches `title` case-insensitively and
    /// return how many were dropped. Zero leaves the library untouched.
    pub fn remove_by_title(&mut self, title: &str) -> usize {
        let needle = title.to_lowercase();
        let before = self.books.len();
        self.books.retain(|book| book.title.to_lowercase() != needle);
        before - self.books.len()
    }

    /// Remove the single book carrying `id`.
    pub fn remove(&mut self, id: Uuid) -> Option<Book> {
        let pos = self.books.iter().position(|book| book.id == id)?;
        Some(self.books.remove(pos))
    }

    /// Flip the read flag on one book, returning the new value.
    pub fn toggle_read(&mut self, id: Uuid) -> Option<bool> {
        let book = self.books.iter_mut().find(|book| book.id == id)?;
        book.read_status = !book.read_status;
        Some(book.read_status)
    }

    /// Matching books in library order.
    pub fn search(&self, query: &SearchQuery) -> Vec<&Book> {
        self.books.iter().filter(|book| query.matches(book)).collect()
    }

    /// Stable in-place sort.
    pub fn sort(&mut self, key: SortKey) {
        match key {
            SortKey::Title => self.books.sort_by_cached_key(|book| book.title.to_lowercase()),
            SortKey::Author => self
                .books
                .sort_by_cached_key(|book| book.author.to_lowercase()),
            SortKey::YearDescending => self
                .books
                .sort_by(|a, b| b.publication_year.cmp(&a.publication_year)),
        }
    }

    pub fn statistics(&self) -> Statistics {
        let total = self.books.len();
        let read = self.books.iter().filter(|book| book.read_status).count();
        let ratings: Vec<f64> = self.books.iter().filter_map(|book| book.rating).collect();
        let average_rating = if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
        };

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for book in &self.books {
            let genre = book.genre.trim();
            let genre = if genre.is_empty() {
                UNSPECIFIED_GENRE
            } else {
                genre
            };
            *counts.entry(genre.to_string()).or_default() += 1;
        }
        let mut genres: Vec<(String, usize)> = counts.into_iter().collect();
        // BTreeMap already yields names alphabetically; the stable sort keeps
        // that as the tie-breaker.
        genres.sort_by(|a, b| b.1.cmp(&a.1));

        Statistics {
            total,
            read,
            rated: ratings.len(),
            average_rating,
            genres,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_book(title: &str, author: &str, year: i32, read: bool, rating: Option<f64>) -> NewBook {
        NewBook {
            title: title.into(),
            author: author.into(),
            publication_year: year,
            genre: "Fiction".into(),
            read_status: read,
            rating,
        }
    }

    fn sample() -> Library {
        let mut library = Library::new();
        library.add(new_book("Dune", "Frank Herbert", 1965, true, Some(5.0)));
        library.add(new_book("Foo", "Jane Roe", 1999, false, Some(3.0)));
        library
    }

    fn titles(library: &Library) -> Vec<&str> {
        library.books().iter().map(|b| b.title.as_str()).collect()
    }

    #[test]
    fn add_then_search_exact_title() {
        let mut library = sample();
        let id = library
            .add(new_book("The Dispossessed", "Ursula K. Le Guin", 1974, true, None))
            .id;

        let hits = library.search(&SearchQuery::Title("the dispossessed".into()));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, id);
        assert_eq!(library.books().last().map(|b| b.id), Some(id));
    }

    #[test]
    fn remove_missing_title_is_noop() {
        let mut library = sample();
        let before = library.books().to_vec();
        assert_eq!(library.remove_by_title("Neuromancer"), 0);
        assert_eq!(library.books(), before.as_slice());
    }

    #[test]
    fn remove_drops_all_case_insensitive_matches() {
        let mut library = sample();
        library.add(new_book("DUNE", "Someone Else", 2021, false, None));
        assert_eq!(library.remove_by_title("dune"), 2);
        assert_eq!(titles(&library), vec!["Foo"]);

        assert_eq!(library.remove_by_title("foo"), 1);
        assert!(library.is_empty());
    }

    #[test]
    fn remove_and_toggle_by_id() {
        let mut library = sample();
        library.add(new_book("Dune", "Reprint", 2005, false, None));
        let reprint = library.books()[2].id;

        assert_eq!(library.toggle_read(reprint), Some(true));
        assert_eq!(library.toggle_read(reprint), Some(false));

        let removed = library.remove(reprint).unwrap();
        assert_eq!(removed.author, "Reprint");
        assert_eq!(titles(&library), vec!["Dune", "Foo"]);
        assert!(library.remove(reprint).is_none());
        assert!(library.toggle_read(reprint).is_none());
    }

    #[test]
    fn duplicate_ids_are_replaced_on_extend() {
        let mut library = sample();
        let copies: Vec<Book> = library.books().to_vec();
        let original = library.books()[0].id;

        assert_eq!(library.extend(copies), 2);
        assert_eq!(library.len(), 4);
        let ids: HashSet<Uuid> = library.books().iter().map(|b| b.id).collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(library.books()[0].id, original);

        let copy = library.books()[2].id;
        assert_eq!(library.toggle_read(copy), Some(false));
        assert!(library.get(original).unwrap().read_status);
        assert!(!library.get(copy).unwrap().read_status);
        assert_eq!(library.get(copy).unwrap().title, "Dune");
    }

    #[test]
    fn from_books_deduplicates_ids() {
        let book = Book::new(new_book("Dune", "Frank Herbert", 1965, true, None));
        let library = Library::from_books(vec![book.clone(), book.clone()]);
        assert_eq!(library.books()[0], book);
        assert_ne!(library.books()[1].id, book.id);
    }

    #[test]
    fn search_modes() {
        let mut library = sample();
        library.add(new_book("Children of Dune", "Frank Herbert", 1976, false, None));

        let by_author = library.search(&SearchQuery::Author("FRANK HERBERT".into()));
        assert_eq!(by_author.len(), 2);

        let partial_author = library.search(&SearchQuery::Author("Herbert".into()));
        assert!(partial_author.is_empty());

        let keyword = library.search(&SearchQuery::Keyword("dune".into()));
        let found: Vec<&str> = keyword.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(found, vec!["Dune", "Children of Dune"]);

        let keyword_author = library.search(&SearchQuery::Keyword("roe".into()));
        assert_eq!(keyword_author.len(), 1);
        assert_eq!(keyword_author[0].title, "Foo");
    }

    #[test]
    fn sort_orders() {
        let mut library = Library::new();
        library.add(new_book("beta", "Zed", 2000, false, None));
        library.add(new_book("Alpha", "adams", 1990, false, None));
        library.add(new_book("gamma", "Mills", 2010, false, None));

        library.sort(SortKey::Title);
        assert_eq!(titles(&library), vec!["Alpha", "beta", "gamma"]);

        library.sort(SortKey::Author);
        assert_eq!(titles(&library), vec!["Alpha", "gamma", "beta"]);

        library.sort(SortKey::YearDescending);
        assert_eq!(titles(&library), vec!["gamma", "beta", "Alpha"]);
    }

    #[test]
    fn year_sort_is_stable_and_idempotent() {
        let mut library = Library::new();
        library.add(new_book("First", "a", 2000, false, None));
        library.add(new_book("Second", "b", 2000, false, None));
        library.add(new_book("Older", "c", 1980, false, None));
        library.add(new_book("Third", "d", 2000, false, None));

        library.sort(SortKey::YearDescending);
        let once = library.books().to_vec();
        assert_eq!(titles(&library), vec!["First", "Second", "Third", "Older"]);

        library.sort(SortKey::YearDescending);
        assert_eq!(library.books(), once.as_slice());
    }

    #[test]
    fn statistics_example() {
        let stats = sample().statistics();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.read, 1);
        assert_eq!(stats.unread(), 1);
        assert!((stats.read_percentage() - 50.0).abs() < f64::EPSILON);
        assert_eq!(stats.average_rating, Some(4.0));
        assert_eq!(stats.genres, vec![("Fiction".to_string(), 2)]);
    }

    #[test]
    fn statistics_on_empty_library() {
        let stats = Library::new().statistics();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.read_percentage(), 0.0);
        assert_eq!(stats.average_rating, None);
        assert!(stats.genres.is_empty());
    }

    #[test]
    fn average_ignores_unrated_books() {
        let mut library = sample();
        library.add(new_book("Unrated", "x", 2020, false, None));
        let stats = library.statistics();
        assert_eq!(stats.rated, 2);
        assert_eq!(stats.average_rating, Some(4.0));
    }

    #[test]
    fn genre_breakdown_orders_by_count_then_name() {
        let mut library = Library::new();
        for (title, genre) in [("a", "Poetry"), ("b", "History"), ("c", "Poetry"), ("d", " ")] {
            let mut fields = new_book(title, "x", 2000, false, None);
            fields.genre = genre.into();
            library.add(fields);
        }
        let stats = library.statistics();
        assert_eq!(
            stats.genres,
            vec![
                ("Poetry".to_string(), 2),
                ("History".to_string(), 1),
                ("Unspecified".to_string(), 1),
            ]
        );
    }
}
