// ==========================================
// GSE 数据集生成器 - 调拨匹配引擎
// ==========================================
// 输入: 站位库存表 + 站位坐标 + 调拨配置
// 输出: 富余站位 → 缺口站位 的调拨记录
// 算法: 按 (日期, 时段, 设备) 分组, 缺口由重到轻逐个贪心匹配最近的富余站位
// 红线: qty ≤ |缺口|, qty ≤ 匹配时刻富余量, 站位不向自身调拨
// ==========================================

use crate::config::ReplenishmentConfig;
use crate::domain::serde_fmt::round1;
use crate::domain::types::{Priority, ReplenishmentStatus, TriggerReason};
use crate::domain::{Replenishment, StationStock};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::lookup::Catalog;
use chrono::NaiveDate;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, trace};

/// 分组键 (日期, 时段, 设备)
type GroupKey = (NaiveDate, u32, u32);

// ==========================================
// ReplenishmentMatcher - 调拨匹配引擎
// ==========================================
pub struct ReplenishmentMatcher<'a> {
    config: &'a ReplenishmentConfig,
    locations: BTreeMap<u32, (f64, f64)>,
}

impl<'a> ReplenishmentMatcher<'a> {
    pub fn new(config: &'a ReplenishmentConfig, catalog: &Catalog<'_>) -> Self {
        let locations = catalog
            .stations()
            .map(|s| (s.station_id, (s.location_x, s.location_y)))
            .collect();
        Self { config, locations }
    }

    /// 站位间距离 (公里, 一位小数)
    pub fn distance_km(&self, from_station_id: u32, to_station_id: u32) -> EngineResult<f64> {
        let (x1, y1) = self.location(from_station_id)?;
        let (x2, y2) = self.location(to_station_id)?;
        let layout = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
        Ok(round1(layout / self.config.distance_divisor))
    }

    /// 预计搬运时长 (分钟)
    pub fn transit_minutes(&self, distance_km: f64) -> u32 {
        let raw = (distance_km * self.config.minutes_per_km).ceil() as u32;
        raw.clamp(
            self.config.transit_minutes.min,
            self.config.transit_minutes.max,
        )
    }

    fn location(&self, station_id: u32) -> EngineResult<(f64, f64)> {
        self.locations
            .get(&station_id)
            .copied()
            .ok_or_else(|| EngineError::missing("station", station_id))
    }

    // ==========================================
    // 匹配主流程
    // ==========================================

    /// 对全部库存分组执行贪心匹配
    #[instrument(skip(self, stock, rng), fields(stock_rows = stock.len()))]
    pub fn match_all<R: Rng + ?Sized>(
        &self,
        stock: &[StationStock],
        rng: &mut R,
    ) -> EngineResult<Vec<Replenishment>> {
        let mut groups: BTreeMap<GroupKey, Vec<&StationStock>> = BTreeMap::new();
        for row in stock {
            groups.entry(row.group_key()).or_default().push(row);
        }

        let mut moves = Vec::new();
        let mut skipped_groups = 0usize;
        for (key, cells) in &groups {
            let before = moves.len();
            if !self.match_group(*key, cells, rng, &mut moves)? {
                skipped_groups += 1;
                continue;
            }
            if moves.len() > before {
                debug!(
                    date = %key.0,
                    period_id = key.1,
                    equipment_id = key.2,
                    moves = moves.len() - before,
                    "分组调拨已生成"
                );
            }
        }

        // 稳定排序: (日期, 时段, 优先级)
        moves.sort_by_key(|m| (m.date, m.before_period_id, m.priority.rank()));
        for (row, id) in moves.iter_mut().zip(1u32..) {
            row.replenishment_id = id;
        }

        let high = moves.iter().filter(|m| m.priority == Priority::High).count();
        let completed = moves
            .iter()
            .filter(|m| m.status == ReplenishmentStatus::Completed)
            .count();
        info!(
            groups = groups.len(),
            skipped_groups,
            moves = moves.len(),
            high,
            completed,
            "调拨匹配完成"
        );

        Ok(moves)
    }

    /// 单组匹配
    ///
    /// # 返回
    /// - Ok(false): 组内无缺口或无富余, 跳过
    fn match_group<R: Rng + ?Sized>(
        &self,
        key: GroupKey,
        cells: &[&StationStock],
        rng: &mut R,
        out: &mut Vec<Replenishment>,
    ) -> EngineResult<bool> {
        let (date, period_id, equipment_id) = key;

        let mut shortages: Vec<&StationStock> =
            cells.iter().copied().filter(|c| c.shortage_qty < 0).collect();
        let mut surplus: BTreeMap<u32, i32> = cells
            .iter()
            .filter(|c| c.surplus_qty > 0)
            .map(|c| (c.station_id, c.surplus_qty))
            .collect();

        if shortages.is_empty() || surplus.is_empty() {
            trace!(date = %date, period_id, equipment_id, "分组无可匹配的缺口或富余");
            return Ok(false);
        }

        // 缺口由重到轻, 同缺口按站位 id
        shortages.sort_by_key(|c| (c.shortage_qty, c.station_id));

        for shortage in shortages {
            if rng.random::<f64>() > self.config.match_probability {
                continue;
            }

            let to_station_id = shortage.station_id;
            let Some((from_station_id, distance_km)) =
                self.nearest_supplier(&surplus, to_station_id)?
            else {
                continue;
            };

            let remaining = surplus.get(&from_station_id).copied().unwrap_or(0);
            let qty = shortage.shortage_qty.abs().min(remaining);
            if qty <= 0 {
                continue;
            }
            surplus.insert(from_station_id, remaining - qty);

            let trigger_reason = self.draw_trigger_reason(rng);
            let status = self.draw_status(rng, date);

            out.push(Replenishment {
                replenishment_id: 0,
                from_station_id,
                to_station_id,
                date,
                before_period_id: period_id,
                equipment_id,
                scenario_id: shortage.scenario_id,
                qty_to_move: qty as u32,
                distance_km,
                estimated_time_min: self.transit_minutes(distance_km),
                priority: Priority::from_shortage(shortage.shortage_qty),
                trigger_reason,
                status,
                is_active: true,
            });
        }
        Ok(true)
    }

    /// 最近的富余站位 (距离相同取 id 最小者)
    fn nearest_supplier(
        &self,
        surplus: &BTreeMap<u32, i32>,
        to_station_id: u32,
    ) -> EngineResult<Option<(u32, f64)>> {
        let mut best: Option<(u32, f64)> = None;
        for (&from_station_id, &available) in surplus {
            if available <= 0 || from_station_id == to_station_id {
                continue;
            }
            let distance = self.distance_km(from_station_id, to_station_id)?;
            // 严格小于: 升序遍历下保留 id 最小者
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((from_station_id, distance));
            }
        }
        Ok(best)
    }

    fn draw_trigger_reason<R: Rng + ?Sized>(&self, rng: &mut R) -> TriggerReason {
        let r: f64 = rng.random();
        if r < self.config.shortage_reason_probability {
            TriggerReason::Shortage
        } else if r < self.config.shortage_reason_probability + self.config.balance_reason_probability
        {
            TriggerReason::Balance
        } else {
            TriggerReason::Preventive
        }
    }

    /// 参考日期之前才抽签, 之后一律为系统建议
    fn draw_status<R: Rng + ?Sized>(&self, rng: &mut R, date: NaiveDate) -> ReplenishmentStatus {
        if date >= self.config.reference_date {
            return ReplenishmentStatus::Recommended;
        }
        let r: f64 = rng.random();
        if r < self.config.completed_probability {
            ReplenishmentStatus::Completed
        } else if r < self.config.completed_probability + self.config.approved_probability {
            ReplenishmentStatus::Approved
        } else {
            ReplenishmentStatus::Recommended
        }
    }
}
