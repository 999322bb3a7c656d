//! Backport Core - Fundamental types and utilities

mod direction;
mod error;
mod key;

pub use direction::*;
pub use error::*;
pub use key::*;
