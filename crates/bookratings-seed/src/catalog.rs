//! Book import: one catalog record per ISBN equivalence class.

use bookratings_core::NewBook;

use crate::error::Result;
use crate::identifiers::{normalize, IsbnCandidates};
use crate::report::{BookImportReport, BookOutcome, BookSkip};
use crate::resolver::EntityResolver;
use crate::source::RawBookRow;
use crate::store::SeedStore;

/// Import book rows in source order.
///
/// A row is skipped when its ISBN normalizes to nothing or when a stored
/// record already matches its candidate set, which makes re-running against
/// a populated store a no-op. Storage errors abort the import.
pub fn import_books<S: SeedStore + ?Sized>(store: &S, rows: &[RawBookRow]) -> Result<BookImportReport> {
    let resolver = EntityResolver::new(store);
    let mut report = BookImportReport::default();

    for row in rows {
        let outcome = import_book(store, &resolver, row)?;
        if let BookOutcome::Skipped(reason) = outcome {
            tracing::debug!("book row {}: skipped ({:?}) isbn={:?}", row.line, reason, row.isbn);
        }
        report.record(outcome);
    }

    tracing::info!("{}", report);
    Ok(report)
}

fn import_book<S: SeedStore + ?Sized>(
    store: &S,
    resolver: &EntityResolver<'_, S>,
    row: &RawBookRow,
) -> Result<BookOutcome> {
    let Some(isbn) = normalize(&row.isbn) else {
        return Ok(BookOutcome::Skipped(BookSkip::BadIsbn));
    };

    let candidates = IsbnCandidates::for_normalized(&isbn);
    if store.find_book_by_isbns(&candidates.as_strs())?.is_some() {
        return Ok(BookOutcome::Skipped(BookSkip::Existing));
    }

    let author = resolver.resolve_author(row.author.trim())?;
    let publisher = resolver.resolve_publisher(row.publisher.trim())?;

    let book = store.create_book(NewBook {
        isbn: isbn.into_string(),
        title: row.title.trim().to_string(),
        year: parse_year(&row.year),
        author_id: author.id,
        publisher_id: publisher.id,
    })?;

    Ok(BookOutcome::Added { book_id: book.id })
}

/// Absent or unparseable years are stored as unknown.
fn parse_year(text: &str) -> Option<i32> {
    text.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookratings_core::Database;

    fn rows() -> Vec<RawBookRow> {
        vec![
            RawBookRow::new("0747532699", "Philosopher's Stone", "J.K. Rowling", "1997", "Bloomsbury"),
            RawBookRow::new("0747538492", "Chamber of Secrets", "J.K. Rowling", "1998", "Bloomsbury"),
            RawBookRow::new("", "No identifier", "Nobody", "2001", "Nowhere"),
            RawBookRow::new("9780306406157", "Same book, other length", "Somebody", "", ""),
            RawBookRow::new("0306406152", "Same book, ten digits", "Somebody", "n/a", ""),
        ]
    }

    #[test]
    fn test_import_counts_each_row_once() {
        let db = Database::open_in_memory().unwrap();
        let report = import_books(&db, &rows()).unwrap();

        assert_eq!(report.total, 5);
        assert_eq!(report.added, 3);
        assert_eq!(report.bad_isbn, 1);
        assert_eq!(report.existing, 1);
        assert_eq!(db.count_books().unwrap(), 3);
    }

    #[test]
    fn test_second_run_adds_nothing() {
        let db = Database::open_in_memory().unwrap();
        import_books(&db, &rows()).unwrap();
        let before = db.stats().unwrap();

        let report = import_books(&db, &rows()).unwrap();
        assert_eq!(report.added, 0);
        assert_eq!(report.existing, 4);
        assert_eq!(db.stats().unwrap(), before);
    }

    #[test]
    fn test_authors_are_shared_across_rows() {
        let db = Database::open_in_memory().unwrap();
        import_books(&db, &rows()).unwrap();

        let stats = db.stats().unwrap();
        // J.K. Rowling, Somebody
        assert_eq!(stats.authors, 2);
        // Bloomsbury, Unknown
        assert_eq!(stats.publishers, 2);
    }

    #[test]
    fn test_record_keeps_normalized_isbn_and_optional_year() {
        let db = Database::open_in_memory().unwrap();
        let rows = vec![
            RawBookRow::new(" 747532699.0 ", "  Philosopher's Stone ", "J.K. Rowling", " 1997 ", "Bloomsbury"),
            RawBookRow::new("0306406152", "Unknown year", "", "circa 1990", ""),
        ];
        import_books(&db, &rows).unwrap();

        let first = db.find_book_by_isbns(&["0747532699"]).unwrap().unwrap();
        assert_eq!(first.title, "Philosopher's Stone");
        assert_eq!(first.year, Some(1997));

        let second = db.find_book_by_isbns(&["0306406152"]).unwrap().unwrap();
        assert_eq!(second.year, None);
        let author = db.get_author(second.author_id).unwrap().unwrap();
        assert_eq!(author.name, "Unknown");
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("1997"), Some(1997));
        assert_eq!(parse_year(" 2003 "), Some(2003));
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("19x7"), None);
    }
}
