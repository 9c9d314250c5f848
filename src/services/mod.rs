//! Drive API service implementations.

mod files;

pub use files::*;
