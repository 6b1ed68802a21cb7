#![doc = include_str!("../README.md")]

mod generator;
mod id;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::generator::*;
pub use crate::id::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
