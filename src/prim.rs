//! Geometric primitives.

mod triangle;

pub use self::triangle::*;
