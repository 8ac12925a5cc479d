pub mod config;
pub mod error;
pub mod error_utils;
pub mod query;
pub mod types;

pub use config::*;
pub use error::*;
pub use error_utils::*;
pub use query::build_query;
pub use types::*;
