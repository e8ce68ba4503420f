//! Persistence-independent domain model of the publishing core.

pub mod media;
pub mod post;
pub mod reference;
pub mod taxonomy;
pub mod types;
pub mod workspace;
