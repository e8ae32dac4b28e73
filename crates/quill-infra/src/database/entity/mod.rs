//! SeaORM entities for the publishing schema.

pub mod comment;
pub mod post;
pub mod post_tag;
pub mod tag;
