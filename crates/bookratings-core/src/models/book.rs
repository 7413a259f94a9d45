use serde::{Deserialize, Serialize};

/// A catalog record. `isbn` holds the normalized identifier exactly as it
/// was first imported, in either the 10- or 13-character form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub isbn: String,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    pub author_id: i64,
    pub publisher_id: i64,
}

/// Insert payload for [`Book`]; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub year: Option<i32>,
    pub author_id: i64,
    pub publisher_id: i64,
}

impl NewBook {
    pub fn into_book(self, id: i64) -> Book {
        Book {
            id,
            isbn: self.isbn,
            title: self.title,
            year: self.year,
            author_id: self.author_id,
            publisher_id: self.publisher_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_json_skips_missing_year() {
        let book = NewBook {
            isbn: "0747532699".to_string(),
            title: "Philosopher's Stone".to_string(),
            year: None,
            author_id: 1,
            publisher_id: 1,
        }
        .into_book(7);

        let json = serde_json::to_string(&book).unwrap();
        assert!(!json.contains("year"));
        let restored: Book = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, book);
    }
}
