//! Application services - the operations the HTTP layer exposes.

mod authoring;
mod blog;

pub use authoring::AuthoringService;
pub use blog::{BlogService, ShareOutcome};
