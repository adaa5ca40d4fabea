// ==========================================
// GSE 数据集生成器 - 采样与时间槽工具
// ==========================================
// 时间槽: 一天 288 个 5 分钟槽, 编号 1..=288, 运算按模 288 回绕
// 随机源: 每个阶段显式传入 StdRng, 不使用全局随机状态
// ==========================================

use crate::config::{CountRange, FloatRange};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 每日时间槽数
pub const SLOTS_PER_DAY: u32 = 288;

/// 每个时间槽的分钟数
pub const SLOT_MINUTES: u32 = 5;

/// 时刻 → 时间槽编号 (h*12 + m/5 + 1)
pub fn slot_of(hour: u32, minute: u32) -> u32 {
    hour * (60 / SLOT_MINUTES) + minute / SLOT_MINUTES + 1
}

/// 任意偏移后的槽号回绕到 [1, 288]
pub fn wrap_slot(slot: i64) -> u32 {
    ((slot - 1).rem_euclid(SLOTS_PER_DAY as i64) + 1) as u32
}

/// 时间槽起始时刻 (时, 分), 槽号先回绕到 [1, 288]
pub fn slot_start(slot_id: u32) -> (u32, u32) {
    let offset = (wrap_slot(slot_id as i64) - 1) * SLOT_MINUTES;
    (offset / 60, offset % 60)
}

/// 阶段随机源: 由全局种子与阶段序号派生
///
/// 单独重跑某阶段时得到与完整运行相同的随机序列
pub fn stage_rng(seed: u64, stage_ordinal: u64) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add(stage_ordinal))
}

/// 整数闭区间均匀采样
pub fn uniform_count<R: Rng + ?Sized>(rng: &mut R, range: &CountRange) -> u32 {
    rng.random_range(range.min..=range.max)
}

/// 浮点闭区间均匀采样
pub fn uniform_float<R: Rng + ?Sized>(rng: &mut R, range: &FloatRange) -> f64 {
    if range.min == range.max {
        return range.min;
    }
    rng.random_range(range.min..=range.max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_of_boundaries() {
        assert_eq!(slot_of(0, 0), 1);
        assert_eq!(slot_of(6, 0), 73);
        assert_eq!(slot_of(23, 55), 288);
        assert_eq!(slot_of(23, 58), 288);
    }

    #[test]
    fn test_wrap_slot() {
        assert_eq!(wrap_slot(0), 288);
        assert_eq!(wrap_slot(-2), 286);
        assert_eq!(wrap_slot(288), 288);
        assert_eq!(wrap_slot(289), 1);
        assert_eq!(wrap_slot(297), 9);
    }

    #[test]
    fn test_slot_start_inverse() {
        for slot in 1..=SLOTS_PER_DAY {
            let (h, m) = slot_start(slot);
            assert_eq!(slot_of(h, m), slot);
        }
    }

    #[test]
    fn test_slot_start_wraps_out_of_range() {
        assert_eq!(slot_start(0), (23, 55));
        assert_eq!(slot_start(289), (0, 0));
        assert_eq!(slot_start(SLOTS_PER_DAY + 13), (1, 0));
    }

    #[test]
    fn test_stage_rng_reproducible() {
        let mut a = stage_rng(42, 2);
        let mut b = stage_rng(42, 2);
        let mut c = stage_rng(42, 3);
        let xa: u64 = a.random();
        assert_eq!(xa, b.random::<u64>());
        assert_ne!(xa, c.random::<u64>());
    }

    #[test]
    fn test_uniform_degenerate_range() {
        let mut rng = stage_rng(1, 0);
        let range = FloatRange { min: 0.5, max: 0.5 };
        assert_eq!(uniform_float(&mut rng, &range), 0.5);
        let count = CountRange { min: 9, max: 9 };
        assert_eq!(uniform_count(&mut rng, &count), 9);
    }
}
