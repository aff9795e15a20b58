//! Chapter Context - 章节限界上下文
//!
//! 职责:
//! - 章节状态机（草稿 / 已完结）
//! - 章节排序规划（order_index 稠密序列）

pub mod ordering;
mod status;

pub use ordering::{OrderError, ReorderPlan, ShiftWindow};
pub use status::{transition, ChapterStatus, StatusTransition};
