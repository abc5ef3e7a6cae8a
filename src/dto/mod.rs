//! Serializable shapes returned by the JSON API.

pub mod api;
pub mod categories;
pub mod products;
pub mod scrape;
