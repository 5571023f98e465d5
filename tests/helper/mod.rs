//! Shared test utilities

#![allow(dead_code)]

mod manifest;
mod registry;

pub use manifest::*;
pub use registry::*;
