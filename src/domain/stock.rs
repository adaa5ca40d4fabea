// ==========================================
// GSE 数据集生成器 - 站位库存领域模型
// ==========================================
// 稠密表: 站位 × 日期 × 时段 × 设备 每个组合一行
// ==========================================

use crate::domain::serde_fmt::{bool_flag, date_key, one_decimal};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// StationStock - 站位库存单元
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationStock {
    pub stock_id: u32,

    // ===== 单元键 =====
    pub station_id: u32,
    #[serde(rename = "date_key", with = "date_key")]
    pub date: NaiveDate,
    pub period_id: u32,
    pub equipment_id: u32,
    pub scenario_id: u32,

    // ===== 容量 =====
    pub capacity: u32,
    pub reserved_outbound: u32,               // floor(capacity * 0.5)
    pub available_inbound: u32,               // capacity - reserved_outbound

    // ===== 需求与缺口 =====
    pub demand_qty: u32,
    pub allocated_qty: u32,
    pub shortage_qty: i32,                    // min(0, gap)
    pub surplus_qty: i32,                     // max(0, gap)

    #[serde(with = "one_decimal")]
    pub utilization_pct: f64,
    #[serde(with = "bool_flag")]
    pub bottleneck_flag: bool,
    #[serde(with = "bool_flag")]
    pub is_active: bool,
}

impl StationStock {
    /// 分组键 (日期, 时段, 设备)
    pub fn group_key(&self) -> (NaiveDate, u32, u32) {
        (self.date, self.period_id, self.equipment_id)
    }
}
