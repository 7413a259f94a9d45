use std::fmt;

use serde::Serialize;

/// Why a book row was not imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSkip {
    /// The ISBN cell normalized to nothing.
    BadIsbn,
    /// A stored book already matches one of the row's ISBN candidates.
    Existing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookOutcome {
    Added { book_id: i64 },
    Skipped(BookSkip),
}

/// Why a rating row was not imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingSkip {
    BadUser,
    BadIsbn,
    BadRating,
    NoBook,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingOutcome {
    Added { rating_id: i64 },
    Skipped(RatingSkip),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BookImportReport {
    pub total: usize,
    pub bad_isbn: usize,
    pub existing: usize,
    pub added: usize,
}

impl BookImportReport {
    pub fn record(&mut self, outcome: BookOutcome) {
        self.total += 1;
        match outcome {
            BookOutcome::Added { .. } => self.added += 1,
            BookOutcome::Skipped(BookSkip::BadIsbn) => self.bad_isbn += 1,
            BookOutcome::Skipped(BookSkip::Existing) => self.existing += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.bad_isbn + self.existing
    }
}

impl fmt::Display for BookImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "books: total={} badIsbn={} existing={} added={}",
            self.total, self.bad_isbn, self.existing, self.added
        )
    }
}

/// Counters for one rating import. `total` always equals the sum of the
/// six outcome counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RatingImportReport {
    pub total: usize,
    pub bad_user: usize,
    pub bad_isbn: usize,
    pub bad_rating: usize,
    pub no_book: usize,
    pub dup: usize,
    pub added: usize,
    /// Users provisioned before any rating row was read.
    pub users_created: usize,
}

impl RatingImportReport {
    pub fn record(&mut self, outcome: RatingOutcome) {
        self.total += 1;
        match outcome {
            RatingOutcome::Added { .. } => self.added += 1,
            RatingOutcome::Skipped(RatingSkip::BadUser) => self.bad_user += 1,
            RatingOutcome::Skipped(RatingSkip::BadIsbn) => self.bad_isbn += 1,
            RatingOutcome::Skipped(RatingSkip::BadRating) => self.bad_rating += 1,
            RatingOutcome::Skipped(RatingSkip::NoBook) => self.no_book += 1,
            RatingOutcome::Skipped(RatingSkip::Duplicate) => self.dup += 1,
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.total
            == self.bad_user + self.bad_isbn + self.bad_rating + self.no_book + self.dup + self.added
    }
}

impl fmt::Display for RatingImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ratings: total={} badUser={} badIsbn={} badRating={} noBook={} dup={} added={}",
            self.total, self.bad_user, self.bad_isbn, self.bad_rating, self.no_book, self.dup, self.added
        )
    }
}

/// Result of a full seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub books: BookImportReport,
    pub ratings: RatingImportReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_report_line() {
        let mut report = RatingImportReport::default();
        report.record(RatingOutcome::Added { rating_id: 1 });
        report.record(RatingOutcome::Skipped(RatingSkip::Duplicate));
        report.record(RatingOutcome::Skipped(RatingSkip::BadRating));

        assert!(report.is_balanced());
        assert_eq!(
            report.to_string(),
            "ratings: total=3 badUser=0 badIsbn=0 badRating=1 noBook=0 dup=1 added=1"
        );
    }

    #[test]
    fn test_book_report_skipped() {
        let mut report = BookImportReport::default();
        report.record(BookOutcome::Skipped(BookSkip::BadIsbn));
        report.record(BookOutcome::Skipped(BookSkip::Existing));
        report.record(BookOutcome::Added { book_id: 4 });

        assert_eq!(report.skipped(), 2);
        assert_eq!(report.to_string(), "books: total=3 badIsbn=1 existing=1 added=1");
    }
}
