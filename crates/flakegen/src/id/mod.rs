mod parsed;
mod snowflake;
mod string;

pub use parsed::*;
pub use snowflake::*;
pub use string::*;
