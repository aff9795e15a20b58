//! Chapter Context - 章节排序规划
//!
//! 维护小说内章节 order_index 的稠密序列 1..N：
//! - 追加: 新章节位于 max + 1
//! - 删除: 被删章节之后的章节整体前移一位
//! - 移动: 起止位置之间的章节整体平移一位，再把被移动章节放到目标位置
//!
//! 这里只负责计算平移方案，真正的落库由仓储在同一事务中完成

use thiserror::Error;

/// 排序错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("目标位置 {target} 超出范围 1..={total}")]
    OutOfRange { target: i64, total: u32 },

    #[error("章节当前位置 {current} 不在序列 1..={total} 内")]
    Corrupted { current: u32, total: u32 },
}

/// 平移窗口
///
/// order_index 落在 `[lower, upper]`（upper 为 None 表示无上界）内的章节
/// 统一加上 `delta`（+1 或 -1）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub lower: u32,
    pub upper: Option<u32>,
    pub delta: i32,
}

impl ShiftWindow {
    pub fn contains(&self, index: u32) -> bool {
        index >= self.lower && self.upper.map_or(true, |upper| index <= upper)
    }

    /// 计算单个位置平移后的值
    pub fn apply(&self, index: u32) -> u32 {
        if self.contains(index) {
            index.saturating_add_signed(self.delta)
        } else {
            index
        }
    }
}

/// 移动方案
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderPlan {
    /// 目标位置即当前位置
    Unchanged,
    /// 平移 `shift` 后把章节从 `from` 放到 `to`
    Move { from: u32, to: u32, shift: ShiftWindow },
}

/// 追加章节时分配的位置
pub fn next_index(current_max: Option<u32>) -> u32 {
    current_max.map_or(1, |max| max + 1)
}

/// 删除位于 `removed` 的章节后需要执行的平移
pub fn plan_removal(removed: u32) -> ShiftWindow {
    ShiftWindow {
        lower: removed + 1,
        upper: None,
        delta: -1,
    }
}

/// 计算把章节从 `current` 移动到 `target` 的方案
///
/// `total` 为小说当前章节数，`target` 必须满足 1 <= target <= total
pub fn plan_reorder(current: u32, target: i64, total: u32) -> Result<ReorderPlan, OrderError> {
    if target < 1 || target > i64::from(total) {
        return Err(OrderError::OutOfRange { target, total });
    }
    if current < 1 || current > total {
        return Err(OrderError::Corrupted { current, total });
    }

    let to = target as u32;
    let plan = if to == current {
        ReorderPlan::Unchanged
    } else if to > current {
        // 向后移动，中间章节前移
        ReorderPlan::Move {
            from: current,
            to,
            shift: ShiftWindow {
                lower: current + 1,
                upper: Some(to),
                delta: -1,
            },
        }
    } else {
        // 向前移动，中间章节后移
        ReorderPlan::Move {
            from: current,
            to,
            shift: ShiftWindow {
                lower: to,
                upper: Some(current - 1),
                delta: 1,
            },
        }
    };

    Ok(plan)
}

/// 检查一组 order_index 是否恰好构成 1..N
pub fn is_dense(indices: impl IntoIterator<Item = u32>) -> bool {
    let mut indices: Vec<u32> = indices.into_iter().collect();
    indices.sort_unstable();
    indices
        .iter()
        .enumerate()
        .all(|(position, &index)| index as usize == position + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 内存中的章节序列，按与仓储相同的步骤应用方案
    #[derive(Default)]
    struct Sequence {
        /// (chapter_id, order_index)
        chapters: Vec<(u32, u32)>,
        next_id: u32,
    }

    impl Sequence {
        fn indices(&self) -> Vec<u32> {
            self.chapters.iter().map(|(_, index)| *index).collect()
        }

        fn append(&mut self) -> u32 {
            let index = next_index(self.chapters.iter().map(|(_, index)| *index).max());
            self.next_id += 1;
            self.chapters.push((self.next_id, index));
            index
        }

        fn remove_at(&mut self, position: usize) {
            let (_, removed) = self.chapters.remove(position);
            let shift = plan_removal(removed);
            for (_, index) in &mut self.chapters {
                *index = shift.apply(*index);
            }
        }

        fn reorder(&mut self, position: usize, target: i64) -> Result<ReorderPlan, OrderError> {
            let total = self.chapters.len() as u32;
            let (moved_id, current) = self.chapters[position];
            let plan = plan_reorder(current, target, total)?;
            if let ReorderPlan::Move { to, shift, .. } = plan {
                for (id, index) in &mut self.chapters {
                    if *id == moved_id {
                        *index = to;
                    } else {
                        *index = shift.apply(*index);
                    }
                }
            }
            Ok(plan)
        }

        fn position_of(&self, index: u32) -> usize {
            self.chapters.iter().position(|(_, i)| *i == index).unwrap()
        }
    }

    #[test]
    fn test_next_index() {
        assert_eq!(next_index(None), 1);
        assert_eq!(next_index(Some(7)), 8);
    }

    #[test]
    fn test_reorder_same_position_is_unchanged() {
        assert_eq!(plan_reorder(3, 3, 5), Ok(ReorderPlan::Unchanged));
    }

    #[test]
    fn test_reorder_out_of_range() {
        assert_eq!(
            plan_reorder(1, 6, 5),
            Err(OrderError::OutOfRange { target: 6, total: 5 })
        );
        assert!(plan_reorder(1, 0, 5).is_err());
        assert!(plan_reorder(1, -3, 5).is_err());
    }

    #[test]
    fn test_reorder_backward_shift() {
        // 2 -> 4: 3、4 前移
        let plan = plan_reorder(2, 4, 5).unwrap();
        let ReorderPlan::Move { shift, .. } = plan else {
            panic!("expected move");
        };
        assert_eq!(shift, ShiftWindow { lower: 3, upper: Some(4), delta: -1 });
        assert_eq!(shift.apply(2), 2);
        assert_eq!(shift.apply(3), 2);
        assert_eq!(shift.apply(5), 5);
    }

    #[test]
    fn test_reorder_forward_shift() {
        // 4 -> 1: 1、2、3 后移
        let plan = plan_reorder(4, 1, 5).unwrap();
        let ReorderPlan::Move { shift, .. } = plan else {
            panic!("expected move");
        };
        assert_eq!(shift, ShiftWindow { lower: 1, upper: Some(3), delta: 1 });
        assert_eq!(shift.apply(4), 4);
    }

    #[test]
    fn test_removal_closes_gap() {
        let mut seq = Sequence::default();
        for _ in 0..4 {
            seq.append();
        }
        seq.remove_at(seq.position_of(2));
        assert_eq!(seq.indices(), vec![1, 2, 3]);
    }

    #[test]
    fn test_unchanged_reorder_leaves_others() {
        let mut seq = Sequence::default();
        for _ in 0..3 {
            seq.append();
        }
        let before = seq.chapters.clone();
        let plan = seq.reorder(1, 2).unwrap();
        assert_eq!(plan, ReorderPlan::Unchanged);
        assert_eq!(seq.chapters, before);
    }

    #[test]
    fn test_random_operations_keep_sequence_dense() {
        let mut seq = Sequence::default();
        // 线性同余生成器，保证测试可重复
        let mut state: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = move |bound: u64| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (state >> 33) % bound
        };

        for _ in 0..2_000 {
            let len = seq.chapters.len();
            match next(3) {
                0 => {
                    seq.append();
                }
                1 if len > 0 => seq.remove_at(next(len as u64) as usize),
                _ if len > 0 => {
                    let target = next(len as u64 + 2) as i64;
                    let result = seq.reorder(next(len as u64) as usize, target);
                    if target < 1 || target > len as i64 {
                        assert!(result.is_err());
                    }
                }
                _ => {}
            }
            assert!(is_dense(seq.indices()), "sequence broken: {:?}", seq.indices());
        }
    }

    #[test]
    fn test_is_dense() {
        assert!(is_dense([]));
        assert!(is_dense([2, 1, 3]));
        assert!(!is_dense([1, 1, 2]));
        assert!(!is_dense([1, 3]));
    }
}
