//! Novel Context - 小说限界上下文
//!
//! 职责:
//! - 标题校验
//! - 连载状态
//! - 冗余统计（总字数、总章节数）

mod value_objects;

pub use value_objects::{NovelStats, NovelStatus, Title};
