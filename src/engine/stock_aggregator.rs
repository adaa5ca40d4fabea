// ==========================================
// GSE 数据集生成器 - 站位库存聚合引擎
// ==========================================
// 输入: 航班需求表 + 参考目录 + 库存配置
// 输出: 日期 × 时段 × 站位 × 设备 的稠密库存表 (基准情景)
// 红线: allocated = min(demand, available)
//       shortage + surplus = available - demand, 至多一个非零
// ==========================================

use crate::config::StockConfig;
use crate::domain::serde_fmt::{round1, to_date_key};
use crate::domain::{FlightDemand, StationStock};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::lookup::Catalog;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument, warn};

/// 需求聚合键 (站位, 日期, 时段, 设备)
type CellKey = (u32, NaiveDate, u32, u32);

// ==========================================
// StockCell - 单元容量计算结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockCell {
    pub reserved_outbound: u32,
    pub available_inbound: u32,
    pub allocated_qty: u32,
    pub shortage_qty: i32,
    pub surplus_qty: i32,
    pub utilization_pct: f64,
    pub bottleneck_flag: bool,
}

/// 单元容量计算
///
/// # 参数
/// - capacity: 站位该设备容量
/// - demand_qty: 聚合需求
/// - reserved_ratio: 出港预留比例
/// - utilization_cap_pct: 利用率上限
///
/// available = 0 时利用率按 0 处理
pub fn compute_cell(
    capacity: u32,
    demand_qty: u32,
    reserved_ratio: f64,
    utilization_cap_pct: f64,
) -> StockCell {
    let reserved_outbound = (capacity as f64 * reserved_ratio).floor() as u32;
    let available_inbound = capacity - reserved_outbound.min(capacity);

    let gap = available_inbound as i64 - demand_qty as i64;
    let utilization = if available_inbound > 0 {
        (demand_qty as f64 / available_inbound as f64 * 100.0).min(utilization_cap_pct)
    } else {
        0.0
    };

    let utilization_pct = round1(utilization);

    StockCell {
        reserved_outbound,
        available_inbound,
        allocated_qty: demand_qty.min(available_inbound),
        shortage_qty: gap.min(0) as i32,
        surplus_qty: gap.max(0) as i32,
        utilization_pct,
        bottleneck_flag: utilization_pct > 100.0,
    }
}

// ==========================================
// StockAggregator - 库存聚合引擎
// ==========================================
pub struct StockAggregator<'a> {
    config: &'a StockConfig,
    catalog: &'a Catalog<'a>,
}

impl<'a> StockAggregator<'a> {
    pub fn new(config: &'a StockConfig, catalog: &'a Catalog<'a>) -> Self {
        Self { config, catalog }
    }

    /// 聚合需求并展开稠密库存表
    ///
    /// 行序即 (日期, 时段, 站位, 设备) 升序, stock_id 按行序编号
    #[instrument(skip(self, demand), fields(demand_rows = demand.len()))]
    pub fn aggregate(&self, demand: &[FlightDemand]) -> EngineResult<Vec<StationStock>> {
        let demand_index = self.index_demand(demand)?;
        let scenario_id = self.catalog.baseline_scenario()?.scenario_id;

        let mut dates: Vec<NaiveDate> = self.catalog.calendar().iter().map(|d| d.date).collect();
        dates.sort();
        dates.dedup();

        let periods: Vec<u32> = self.catalog.peak_periods().map(|p| p.period_id).collect();
        let stations: Vec<_> = self.catalog.stations().collect();
        let equipment: Vec<_> = self
            .catalog
            .equipment_list()
            .filter(|e| !self.config.excluded_equipment.contains(&e.asset_code))
            .collect();

        let mut rows =
            Vec::with_capacity(dates.len() * periods.len() * stations.len() * equipment.len());
        let mut degenerate_cells = 0usize;
        let mut matched_demand = 0u64;

        // ===== 稠密展开 =====
        for &date in &dates {
            for &period_id in &periods {
                for station in &stations {
                    for equip in &equipment {
                        let key = (station.station_id, date, period_id, equip.equipment_id);
                        let demand_qty = demand_index.get(&key).copied().unwrap_or(0);
                        let capacity = station.capacity_for(equip.asset_code);
                        let cell = compute_cell(
                            capacity,
                            demand_qty,
                            self.config.reserved_outbound_ratio,
                            self.config.utilization_cap_pct,
                        );

                        if cell.available_inbound == 0 && demand_qty > 0 {
                            degenerate_cells += 1;
                        }
                        matched_demand += demand_qty as u64;

                        rows.push(StationStock {
                            stock_id: rows.len() as u32 + 1,
                            station_id: station.station_id,
                            date,
                            period_id,
                            equipment_id: equip.equipment_id,
                            scenario_id,
                            capacity,
                            reserved_outbound: cell.reserved_outbound,
                            available_inbound: cell.available_inbound,
                            demand_qty,
                            allocated_qty: cell.allocated_qty,
                            shortage_qty: cell.shortage_qty,
                            surplus_qty: cell.surplus_qty,
                            utilization_pct: cell.utilization_pct,
                            bottleneck_flag: cell.bottleneck_flag,
                            is_active: true,
                        });
                    }
                }
            }
            debug!(date = %date, rows = rows.len(), "单日库存单元已展开");
        }

        let total_demand: u64 = demand_index.values().map(|&q| q as u64).sum();
        if matched_demand < total_demand {
            warn!(
                total_demand,
                matched_demand,
                "部分需求的设备已被排除, 未计入库存表"
            );
        }
        if degenerate_cells > 0 {
            warn!(degenerate_cells, "存在可用容量为 0 但有需求的单元, 利用率按 0 计");
        }

        let bottlenecks = rows.iter().filter(|r| r.bottleneck_flag).count();
        info!(rows = rows.len(), bottlenecks, scenario_id, "站位库存聚合完成");

        Ok(rows)
    }

    /// 需求按 (站位, 日期, 时段, 设备) 汇总 qty_required
    ///
    /// 需求行引用的日期不在日历中视为参考数据缺失
    fn index_demand(&self, demand: &[FlightDemand]) -> EngineResult<BTreeMap<CellKey, u32>> {
        let calendar: BTreeSet<NaiveDate> =
            self.catalog.calendar().iter().map(|d| d.date).collect();

        let mut index = BTreeMap::new();
        for row in demand {
            if !calendar.contains(&row.date) {
                return Err(EngineError::missing("calendar", to_date_key(row.date)));
            }
            self.catalog.station(row.station_id)?;
            self.catalog.equipment(row.equipment_id)?;
            self.catalog.peak_period(row.period_id)?;

            *index
                .entry((row.station_id, row.date, row.period_id, row.equipment_id))
                .or_insert(0) += row.qty_required;
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_overloaded() {
        let cell = compute_cell(20, 25, 0.5, 150.0);
        assert_eq!(cell.reserved_outbound, 10);
        assert_eq!(cell.available_inbound, 10);
        assert_eq!(cell.allocated_qty, 10);
        assert_eq!(cell.shortage_qty, -15);
        assert_eq!(cell.surplus_qty, 0);
        assert_eq!(cell.utilization_pct, 150.0);
        assert!(cell.bottleneck_flag);
    }

    #[test]
    fn test_cell_surplus() {
        let cell = compute_cell(49, 6, 0.5, 150.0);
        assert_eq!(cell.reserved_outbound, 24);
        assert_eq!(cell.available_inbound, 25);
        assert_eq!(cell.surplus_qty, 19);
        assert_eq!(cell.shortage_qty, 0);
        assert_eq!(cell.utilization_pct, 24.0);
        assert!(!cell.bottleneck_flag);
    }

    #[test]
    fn test_cell_zero_capacity() {
        let cell = compute_cell(0, 4, 0.5, 150.0);
        assert_eq!(cell.available_inbound, 0);
        assert_eq!(cell.allocated_qty, 0);
        assert_eq!(cell.shortage_qty, -4);
        assert_eq!(cell.utilization_pct, 0.0);
        assert!(!cell.bottleneck_flag);
    }

    #[test]
    fn test_cell_single_unit() {
        // floor(1 × 0.5) = 0
        let cell = compute_cell(1, 0, 0.5, 150.0);
        assert_eq!(cell.reserved_outbound, 0);
        assert_eq!(cell.available_inbound, 1);
        assert_eq!(cell.surplus_qty, 1);
    }
}
