//! Attribute streams.
//!
//! A mesh stores each vertex attribute kind in its own stream: a flat array of `f32` rows and an
//! array of corner indices into those rows. Streams are indexed independently, so two corners may
//! share a position row while referencing different texture coordinate rows.

mod kind;
mod stream;

pub use self::kind::*;
pub use self::stream::*;
