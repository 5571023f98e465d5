//! Package index implementations

pub mod pypi;

pub use pypi::PypiRegistry;
