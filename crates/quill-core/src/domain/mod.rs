//! Domain entities and the rules that belong to them.

mod page;
mod post;
mod share;
mod slug;
mod validation;

pub use page::{POSTS_PER_PAGE, Page, Paginator};
pub use post::{NewPost, Post, PostChanges, PostStatus, SLUG_MAX_CHARS, TITLE_MAX_CHARS};
pub use share::{NAME_MAX_CHARS, ShareForm, ShareState, ValidShare};
pub use slug::slugify;
pub use validation::{FieldErrors, INVALID_EMAIL_MESSAGE, REQUIRED_MESSAGE};
