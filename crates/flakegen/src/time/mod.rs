mod interface;
mod manual;
mod system;

pub use interface::*;
pub use manual::*;
pub use system::*;
