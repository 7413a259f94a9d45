pub mod author;
pub mod book;
pub mod publisher;
pub mod rating;
pub mod stats;
pub mod user;

pub use author::*;
pub use book::*;
pub use publisher::*;
pub use rating::*;
pub use stats::*;
pub use user::*;
