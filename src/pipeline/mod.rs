//! Pipeline module - loading, rating derivation and statistical analysis

pub mod analysis;
pub mod correlation;
pub mod error;
pub mod loader;
pub mod rating;
pub mod regression;
pub mod summary;

pub use analysis::*;
pub use correlation::*;
pub use error::*;
pub use loader::*;
pub use rating::*;
pub use regression::*;
pub use summary::*;
