//! Service layer: the operations callers invoke.
//!
//! Reads go through [`crate::repository::PostReader`] and
//! [`crate::repository::TermReader`]; every write runs inside one
//! [`crate::repository::UnitOfWork`] transaction.

pub mod errors;
pub mod media;
pub mod posts;
pub mod queries;
pub mod slug;
pub mod taxonomy;

pub use errors::{ServiceError, ServiceResult};
