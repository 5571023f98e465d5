//! requirementz - check a requirements.txt against installed packages and PyPI
//!
//! - [`parser`]: requirements.txt line parser producing [`parser::Requirement`] records
//! - [`version`]: constraint evaluation, installed/remote providers and the comparator
//! - [`manifest`]: manifest file access and text operations (search, sort, duplicates, add)
//! - [`cli`]: mode handlers and terminal presentation used by the binary

pub mod cli;
pub mod config;
pub mod logging;
pub mod manifest;
pub mod parser;
pub mod version;
