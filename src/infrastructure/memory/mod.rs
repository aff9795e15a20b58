//! Memory Layer - In-Memory State Management
//!
//! 实现 NovelLock，按小说串行化章节排序修改

mod novel_lock;

pub use novel_lock::{spawn_lock_pruner, InMemoryNovelLocks};
