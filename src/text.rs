//! The primitive character parsers the pipe layer is built over.

pub mod basic;
pub mod number;
