use super::SourceRow;

/// A book source row: ISBN, title, author, year, publisher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBookRow {
    pub line: usize,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year: String,
    pub publisher: String,
}

impl RawBookRow {
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        year: impl Into<String>,
        publisher: impl Into<String>,
    ) -> Self {
        Self {
            line: 0,
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            year: year.into(),
            publisher: publisher.into(),
        }
    }
}

impl From<SourceRow> for RawBookRow {
    fn from(row: SourceRow) -> Self {
        Self {
            line: row.line,
            isbn: row.cell(0).to_string(),
            title: row.cell(1).to_string(),
            author: row.cell(2).to_string(),
            year: row.cell(3).to_string(),
            publisher: row.cell(4).to_string(),
        }
    }
}

/// A rating source row: user id, ISBN, rating value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRatingRow {
    pub line: usize,
    pub user_id: String,
    pub isbn: String,
    pub rating: String,
}

impl RawRatingRow {
    pub fn new(user_id: impl Into<String>, isbn: impl Into<String>, rating: impl Into<String>) -> Self {
        Self {
            line: 0,
            user_id: user_id.into(),
            isbn: isbn.into(),
            rating: rating.into(),
        }
    }
}

impl From<SourceRow> for RawRatingRow {
    fn from(row: SourceRow) -> Self {
        Self {
            line: row.line,
            user_id: row.cell(0).to_string(),
            isbn: row.cell(1).to_string(),
            rating: row.cell(2).to_string(),
        }
    }
}
