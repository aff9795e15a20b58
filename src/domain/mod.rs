//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Novel Context: 小说标题、状态与统计
//! - Chapter Context: 章节状态与排序

pub mod chapter;
pub mod novel;

mod word_count;

pub use word_count::count_words;
