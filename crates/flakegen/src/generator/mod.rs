mod config;
mod error;
mod global;
mod snowflake;

pub use config::*;
pub use error::*;
pub use global::*;
pub use snowflake::*;
