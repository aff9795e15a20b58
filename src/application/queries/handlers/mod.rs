//! Query Handlers 实现

mod chapter_handlers;
mod novel_handlers;
mod user_handlers;

pub use chapter_handlers::*;
pub use novel_handlers::*;
pub use user_handlers::*;
