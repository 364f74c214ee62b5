pub mod database;
pub mod types;

pub use database::{CardDatabase, CardDatabaseError};
pub use types::{subtype_segment, type_segment, CardRecord, Category, Color};
