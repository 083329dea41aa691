//! CLI command implementations.

pub mod common;
pub mod convert;
pub mod inspect;
pub mod version;
