use std::fs;

use library_manager::{
    Config, Library, LibraryError, LibraryStore, NewBook, SearchQuery, Session, SortKey,
};
use tempfile::TempDir;

fn book(title: &str, author: &str, year: i32, read: bool, rating: Option<f64>) -> NewBook {
    NewBook {
        title: title.into(),
        author: author.into(),
        publication_year: year,
        genre: "Fiction".into(),
        read_status: read,
        rating,
    }
}

fn sample_library() -> Library {
    let mut library = Library::new();
    library.add(book("Dune", "Frank Herbert", 1965, true, Some(5.0)));
    library.add(book("Foo", "Jane Roe", 1999, false, Some(3.0)));
    library.add(book("Unrated", "Nobody", 2010, false, None));
    library
}

#[test]
fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = LibraryStore::new(dir.path().join("library.json"));

    let library = sample_library();
    store.save(library.books()).unwrap();
    let loaded = store.load().unwrap();
    assert_eq!(loaded, library.books());
}

#[test]
fn empty_library_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = LibraryStore::new(dir.path().join("library.json"));

    store.save(&[]).unwrap();
    assert_eq!(fs::read_to_string(store.path()).unwrap().trim(), "[]");
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn missing_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let store = LibraryStore::new(dir.path().join("absent").join("library.json"));
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn malformed_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("library.json");
    fs::write(&path, r#"[{"title": "half a record"}]"#).unwrap();

    let err = LibraryStore::new(&path).load().unwrap_err();
    assert!(matches!(err, LibraryError::Malformed { .. }));
}

#[test]
fn legacy_text_file_with_na_ratings_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("library.txt");
    fs::write(
        &path,
        r#"[
    {
        "title": "Dune",
        "author": "Frank Herbert",
        "publication_year": 1965,
        "genre": "SF",
        "read_status": true,
        "rating": "N/A"
    }
]"#,
    )
    .unwrap();

    let books = LibraryStore::new(&path).load().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].rating, None);
}

#[test]
fn save_copies_previous_file_to_backup() {
    let dir = TempDir::new().unwrap();
    let config = Config::in_dir(dir.path());
    let store = config.store();
    let backup = config.backup_file.clone().unwrap();

    let mut library = sample_library();
    store.save(library.books()).unwrap();
    assert!(!backup.exists());

    let first_save = fs::read_to_string(store.path()).unwrap();
    library.remove_by_title("dune");
    store.save(library.books()).unwrap();

    assert_eq!(fs::read_to_string(&backup).unwrap(), first_save);
    assert_eq!(store.load().unwrap().len(), 2);
}

#[test]
fn csv_export_then_import_preserves_fields() {
    let dir = TempDir::new().unwrap();
    let mut source = Session::open(LibraryStore::new(dir.path().join("a.json"))).0;
    for fields in [
        book("Dune", "Frank Herbert", 1965, true, Some(4.5)),
        book("Untitled, Vol. 2", "Jane \"JR\" Roe", 2001, false, None),
    ] {
        source.add(fields);
    }
    let csv = dir.path().join("export.csv");
    assert_eq!(source.export(&csv).unwrap(), 2);

    let mut target = Session::open(LibraryStore::new(dir.path().join("b.json"))).0;
    assert_eq!(target.import(&csv).unwrap(), 2);

    let originals = source.library().books();
    let imported = target.library().books();
    for (original, copy) in originals.iter().zip(imported) {
        assert_eq!(copy.title, original.title);
        assert_eq!(copy.author, original.author);
        assert_eq!(copy.publication_year, original.publication_year);
        assert_eq!(copy.genre, original.genre);
        assert_eq!(copy.read_status, original.read_status);
        assert_eq!(copy.rating, original.rating);
        assert_ne!(copy.id, original.id);
    }
}

#[test]
fn csv_import_with_bad_year_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::open(LibraryStore::new(dir.path().join("library.json"))).0;
    session.add(book("Before", "Someone", 1980, false, None));
    let before = session.library().books().to_vec();

    let csv = dir.path().join("import.csv");
    fs::write(
        &csv,
        "title,author,publication_year,genre,read_status,rating\n\
         Fine,A,2001,G,yes,4\n\
         Broken,B,2001.5,G,no,2\n\
         Also Fine,C,2003,G,no,\n",
    )
    .unwrap();

    let err = session.import(&csv).unwrap_err();
    assert!(matches!(err, LibraryError::InvalidRow { line: 3, .. }));
    assert_eq!(session.library().books(), before.as_slice());
}

#[test]
fn exporting_to_unwritable_location_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let session = Session::open(LibraryStore::new(dir.path().join("library.json"))).0;
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let target = blocker.join("out.csv");
    assert!(session.export(&target).is_err());
    assert!(!target.exists());
}

#[test]
fn full_session_flow() {
    let dir = TempDir::new().unwrap();
    let config = Config::in_dir(dir.path());

    {
        let (mut session, error) = Session::open(config.store());
        assert!(error.is_none());
        session.add(book("Dune", "Frank Herbert", 1965, true, Some(5.0)));
        session.add(book("Foo", "Jane Roe", 1999, false, Some(3.0)));
        session.sort(SortKey::YearDescending);
        session.save().unwrap();
    }

    let (session, error) = Session::open(config.store());
    assert!(error.is_none());
    let titles: Vec<&str> = session
        .library()
        .books()
        .iter()
        .map(|b| b.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Foo", "Dune"]);

    let hits = session
        .library()
        .search(&SearchQuery::Keyword("herb".into()));
    assert_eq!(hits.len(), 1);

    let stats = session.library().statistics();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.read, 1);
    assert_eq!(format!("{:.1}", stats.read_percentage()), "50.0");
    assert_eq!(stats.average_rating, Some(4.0));
}

#[test]
fn out_of_range_rating_on_load_is_malformed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("library.json");
    fs::write(
        &path,
        r#"[
    {"title": "A", "author": "x", "publication_year": 2001, "genre": "g",
     "read_status": true, "rating": 42},
    {"title": "B", "author": "y", "publication_year": 2002, "genre": "g",
     "read_status": false, "rating": -7}
]"#,
    )
    .unwrap();

    let (session, error) = Session::open(LibraryStore::new(&path));
    assert!(matches!(error, Some(LibraryError::Malformed { .. })));
    assert!(session.library().is_empty());
    assert_eq!(session.library().statistics().average_rating, None);
}

#[test]
fn failed_save_keeps_previous_file_and_backup() {
    let dir = TempDir::new().unwrap();
    let config = Config::in_dir(dir.path());
    let store = config.store();
    let backup = config.backup_file.clone().unwrap();

    let mut library = sample_library();
    store.save(library.books()).unwrap();
    let first_save = fs::read_to_string(store.path()).unwrap();

    // A directory where the backup belongs makes the copy step fail.
    fs::create_dir(&backup).unwrap();
    fs::write(backup.join("keep.txt"), "untouched").unwrap();

    library.remove_by_title("dune");
    let err = store.save(library.books()).unwrap_err();
    assert!(matches!(err, LibraryError::Write { .. }));

    assert_eq!(fs::read_to_string(store.path()).unwrap(), first_save);
    assert_eq!(store.load().unwrap().len(), 3);
    assert_eq!(fs::read_to_string(backup.join("keep.txt")).unwrap(), "untouched");
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .filter(|name| name.to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}
