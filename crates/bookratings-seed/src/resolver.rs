use bookratings_core::{name_or_unknown, Author, Publisher};

use crate::error::Result;
use crate::store::SeedStore;

/// Get-or-create for authors and publishers by exact name.
///
/// Names are matched case-sensitively and without whitespace folding, so
/// "J.K. Rowling" and "J. K. Rowling" become two authors. Blank names resolve
/// to "Unknown". A created entity is committed before it is returned.
pub struct EntityResolver<'s, S: SeedStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: SeedStore + ?Sized> EntityResolver<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    pub fn resolve_author(&self, name: &str) -> Result<Author> {
        let name = name_or_unknown(name);
        if let Some(author) = self.store.find_author_by_name(name)? {
            return Ok(author);
        }
        let author = self.store.create_author(name)?;
        tracing::debug!("created author {} ({})", author.name, author.id);
        Ok(author)
    }

    pub fn resolve_publisher(&self, name: &str) -> Result<Publisher> {
        let name = name_or_unknown(name);
        if let Some(publisher) = self.store.find_publisher_by_name(name)? {
            return Ok(publisher);
        }
        let publisher = self.store.create_publisher(name)?;
        tracing::debug!("created publisher {} ({})", publisher.name, publisher.id);
        Ok(publisher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookratings_core::Database;

    #[test]
    fn test_resolve_is_get_or_create() {
        let db = Database::open_in_memory().unwrap();
        let resolver = EntityResolver::new(&db);

        let first = resolver.resolve_author("J.K. Rowling").unwrap();
        let second = resolver.resolve_author("J.K. Rowling").unwrap();
        assert_eq!(first, second);
        assert_eq!(db.stats().unwrap().authors, 1);
    }

    #[test]
    fn test_blank_names_share_unknown() {
        let db = Database::open_in_memory().unwrap();
        let resolver = EntityResolver::new(&db);

        let a = resolver.resolve_publisher("").unwrap();
        let b = resolver.resolve_publisher("   ").unwrap();
        assert_eq!(a.name, "Unknown");
        assert_eq!(a.id, b.id);
        assert_eq!(db.get_publisher(a.id).unwrap(), Some(a));
    }

    #[test]
    fn test_spelling_variants_stay_distinct() {
        let db = Database::open_in_memory().unwrap();
        let resolver = EntityResolver::new(&db);

        let a = resolver.resolve_author("J.K. Rowling").unwrap();
        let b = resolver.resolve_author("J. K. Rowling").unwrap();
        assert_ne!(a.id, b.id);
    }
}
