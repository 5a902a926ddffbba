//! Domain types and input validation for the Workbench execution service.
//!
//! Defines the workspace identifier, the pure input predicates, and the
//! validation error type shared by every crate in the workspace. Nothing
//! here performs I/O; the rule enforced across the service is
//! reject-before-touch, and these predicates are the rejecting half.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod id;
pub mod validate;

pub use error::ValidationError;
pub use id::WorkspaceId;
