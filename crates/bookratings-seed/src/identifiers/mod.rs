pub mod isbn;

pub use isbn::{candidates, normalize, to_ten, to_thirteen, CanonicalIsbn, IsbnCandidates};
