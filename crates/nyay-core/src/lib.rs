pub mod config;
pub mod corpus;
pub mod error;
pub mod store;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
