// ==========================================
// GSE 数据集生成器 - 航班领域模型
// ==========================================
// 不变量: 航班号在 (航司, 日期) 内唯一
// 生成后只读
// ==========================================

use crate::domain::serde_fmt::{bool_flag, clock_time, date_key, one_decimal};
use crate::domain::types::AircraftCategory;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Flight - 到港航班
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub flight_id: u32,
    pub flight_number: String,                // 航司代码 + 数字, 例 EY1234
    pub airline_code: String,
    pub airline_name: String,

    // ===== 机型 =====
    pub aircraft_id: u32,
    pub aircraft_series: String,
    pub aircraft_category: AircraftCategory,

    // ===== 航程与时刻 =====
    pub origin_airport: String,
    #[serde(rename = "date_key", with = "date_key")]
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub arrival_time: NaiveTime,
    pub arrival_slot_id: u32,

    // ===== 业务量估算 =====
    pub estimated_pax: u32,
    pub estimated_bags: u32,
    #[serde(with = "one_decimal")]
    pub cargo_kg: f64,                        // 无货量数据时为 0.0
    #[serde(with = "bool_flag")]
    pub has_cargo_data: bool,

    #[serde(with = "bool_flag")]
    pub is_active: bool,
}
