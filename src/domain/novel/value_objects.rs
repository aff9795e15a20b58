//! Novel Context - Value Objects

use serde::{Deserialize, Serialize};

/// 标题（小说与章节共用）
///
/// 不变量:
/// - 去除首尾空白后非空
/// - 不超过 200 个字符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title(String);

impl Title {
    pub const MAX_CHARS: usize = 200;

    pub fn new(title: impl AsRef<str>) -> Result<Self, &'static str> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err("标题不能为空");
        }
        if title.chars().count() > Self::MAX_CHARS {
            return Err("标题长度不能超过200字符");
        }
        Ok(Self(title.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 小说连载状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NovelStatus {
    /// 连载中
    #[default]
    Ongoing,
    /// 已完结
    Completed,
    /// 暂停更新
    Paused,
}

impl NovelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NovelStatus::Ongoing => "ongoing",
            NovelStatus::Completed => "completed",
            NovelStatus::Paused => "paused",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ongoing" => Some(NovelStatus::Ongoing),
            "completed" => Some(NovelStatus::Completed),
            "paused" => Some(NovelStatus::Paused),
            _ => None,
        }
    }
}

/// 小说统计（冗余字段，由章节推导）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NovelStats {
    pub total_words: usize,
    pub total_chapters: usize,
}

impl NovelStats {
    /// 从各章节字数汇总
    pub fn from_word_counts(word_counts: impl IntoIterator<Item = usize>) -> Self {
        word_counts
            .into_iter()
            .fold(Self::default(), |acc, words| Self {
                total_words: acc.total_words + words,
                total_chapters: acc.total_chapters + 1,
            })
    }
}
