//! 字数统计
//!
//! 统计规则:
//! 1. 去除所有 `<...>` 标记（未闭合的 `<` 保留为普通字符）
//! 2. 去除所有空白字符
//! 3. 剩余的字符数即为字数

/// 统计章节内容的字数
///
/// 纯函数，空内容或 `None` 返回 0
pub fn count_words(content: Option<&str>) -> usize {
    let Some(mut rest) = content else {
        return 0;
    };

    let mut count = 0;
    while let Some(open) = rest.find('<') {
        count += visible_chars(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            // 之后再也没有 '>'，剩余部分不可能构成标记
            None => {
                rest = &rest[open..];
                break;
            }
        }
    }

    count + visible_chars(rest)
}

fn visible_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}
