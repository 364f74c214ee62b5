pub mod analysis;
pub mod card;
pub mod categorize;
pub mod deck;
pub mod logging;
pub mod probability;
pub mod query;
