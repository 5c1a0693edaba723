pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use client::TvdbClient;
pub use error::TvdbError;
