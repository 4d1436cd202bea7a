//! Core types and error handling for modsync
//!
//! - [`error`] - [`ModsyncError`], [`ErrorContext`] and [`user_friendly_error`]
//! - [`artifact`] - [`ArtifactKind`], the module/enabler distinction

pub mod artifact;
pub mod error;

pub use artifact::ArtifactKind;
pub use error::{ErrorContext, ModsyncError, user_friendly_error};
