//! Public projections returned to callers.

pub mod media;
pub mod posts;
pub mod taxonomy;
