// ==========================================
// GSE 数据集生成器 - 航班设备需求领域模型
// ==========================================
// 不变量: qty_allocated ≤ qty_required
//         shortage_qty = qty_allocated - qty_required ≤ 0
// ==========================================

use crate::domain::serde_fmt::{bool_flag, date_key, one_decimal};
use crate::domain::types::{DemandCalcMethod, RiskLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// FlightDemand - 单航班单设备需求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightDemand {
    pub demand_id: u32,
    pub flight_id: u32,
    #[serde(rename = "date_key", with = "date_key")]
    pub date: NaiveDate,
    pub arrival_slot_id: u32,
    pub period_id: u32,                       // 到港时间槽所属高峰时段
    pub station_id: u32,
    pub equipment_id: u32,

    // ===== 数量 =====
    pub qty_required: u32,
    pub qty_allocated: u32,
    pub shortage_qty: i32,

    // ===== 取还时间槽 =====
    pub pickup_slot_id: u32,
    pub return_slot_id: u32,

    #[serde(with = "one_decimal")]
    pub allocation_distance_km: f64,
    pub demand_calc_method: DemandCalcMethod,
    pub risk_level: RiskLevel,
    #[serde(with = "bool_flag")]
    pub sla_compliant: bool,                  // shortage_qty ≥ -1
    #[serde(with = "bool_flag")]
    pub is_active: bool,
}
