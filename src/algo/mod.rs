pub mod tjunction;

pub use self::tjunction::*;
