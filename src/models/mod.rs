//! Data models for the blog.
//!
//! Field names serialize as camelCase to match the admin frontend.

mod comment;
mod page;
mod post;
mod site_config;
mod term;
mod user;

pub use comment::*;
pub use page::*;
pub use post::*;
pub use site_config::*;
pub use term::*;
pub use user::*;
