pub mod config;
pub mod digest;
pub mod error;
pub mod models;
pub mod storage;

pub use error::ShowtrackError;
