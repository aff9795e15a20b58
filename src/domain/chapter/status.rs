//! Chapter Context - 章节状态机

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 章节状态
///
/// 状态转换:
/// - draft -> completed: 首次完结时记录发布时间
/// - completed -> draft: 允许，发布时间保持不变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterStatus {
    /// 草稿
    #[default]
    Draft,
    /// 已完结
    Completed,
}

impl ChapterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChapterStatus::Draft => "draft",
            ChapterStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(ChapterStatus::Draft),
            "completed" => Some(ChapterStatus::Completed),
            _ => None,
        }
    }
}

/// 状态转换结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub status: ChapterStatus,
    pub publish_time: Option<DateTime<Utc>>,
}

/// 计算状态转换后的状态与发布时间
///
/// publish_time 一旦设置就不会被清除
pub fn transition(
    publish_time: Option<DateTime<Utc>>,
    target: ChapterStatus,
    now: DateTime<Utc>,
) -> StatusTransition {
    let publish_time = match (target, publish_time) {
        (ChapterStatus::Completed, None) => Some(now),
        (_, existing) => existing,
    };

    StatusTransition {
        status: target,
        publish_time,
    }
}
