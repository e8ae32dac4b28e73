//! Domain entities - the core business objects.

mod comment;
mod pagination;
mod post;
mod slug;
mod tag;

pub use comment::Comment;
pub use pagination::{POSTS_PER_PAGE, Page, PageToken, Paginator};
pub use post::{Post, PostStatus, PublishDay};
pub use slug::slugify;
pub use tag::{Tag, normalize_labels};
