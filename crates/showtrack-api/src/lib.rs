//! Catalog clients for movie and series metadata.

pub mod traits;
pub mod tvdb;

pub use traits::CatalogService;
pub use tvdb::{TvdbClient, TvdbError};
