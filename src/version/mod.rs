//! Version checking layer
//!
//! Compares parsed requirements against installed packages and, optionally,
//! the latest releases published on the package index.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Installed  │────▶│   Checker   │◀────│    Fetch    │
//! │ (pip list)  │     │  (compare)  │     │ (join_all)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │                   │
//!                            ▼                   ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │  Evaluator  │     │  Registry   │
//!                     │ (PEP 440)   │     │   (PyPI)    │
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`checker`]: builds one [`checker::Report`] per requirement
//! - [`evaluator`]: decides whether an installed version meets a constraint list
//! - [`fetch`]: concurrent remote lookups, collected into a [`fetch::RemoteIndex`]
//! - [`installed`]: installed-package provider trait and the pip implementation
//! - [`registry`]: package index trait
//! - [`registries`]: concrete index clients (PyPI)
//! - [`error`]: provider and registry error types
//! - [`types`]: shared records (`InstalledPackage`, `RemotePackageInfo`, `Status`)

pub mod checker;
pub mod error;
pub mod evaluator;
pub mod fetch;
pub mod installed;
pub mod registries;
pub mod registry;
pub mod types;
