// ==========================================
// GSE 数据集生成器 - 设备调拨领域模型
// ==========================================
// 不变量: from_station_id ≠ to_station_id
// ==========================================

use crate::domain::serde_fmt::{bool_flag, date_key, one_decimal};
use crate::domain::types::{Priority, ReplenishmentStatus, TriggerReason};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Replenishment - 站位间调拨
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replenishment {
    pub replenishment_id: u32,
    pub from_station_id: u32,                 // 富余站位
    pub to_station_id: u32,                   // 缺口站位
    #[serde(rename = "date_key", with = "date_key")]
    pub date: NaiveDate,
    pub before_period_id: u32,
    pub equipment_id: u32,
    pub scenario_id: u32,
    pub qty_to_move: u32,
    #[serde(with = "one_decimal")]
    pub distance_km: f64,
    pub estimated_time_min: u32,
    pub priority: Priority,
    pub trigger_reason: TriggerReason,
    pub status: ReplenishmentStatus,
    #[serde(with = "bool_flag")]
    pub is_active: bool,
}
