// ==========================================
// GSE 数据集生成器 - 参考目录领域模型
// ==========================================
// 机型 / 设备 / 站位 / 时间槽 / 高峰时段 / 日历 / 情景
// 静态参考数据,生成阶段只读
// ==========================================

use crate::domain::serde_fmt::{bool_flag, clock_time, date_key, one_decimal};
use crate::domain::types::{
    AircraftCategory, EquipmentCategory, EquipmentCode, ScenarioType, ServedAircraft,
};
use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

// ==========================================
// Aircraft - 机型
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    pub aircraft_id: u32,
    pub aircraft_series: String,              // 机型系列 (A380 / B777 ...)
    pub aircraft_category: AircraftCategory,
    pub fleet_count: u32,                     // 机队数量
    #[serde(with = "one_decimal")]
    pub fleet_pct: f64,                       // 机队占比 (%)
    pub typical_pax: u32,                     // 典型客座数
    pub typical_cargo_kg: u32,                // 典型货量 (kg)
    pub typical_bags: u32,                    // 典型行李件数
    pub uld_positions: u32,                   // 货舱 ULD 位数
    #[serde(with = "bool_flag")]
    pub is_active: bool,
}

// ==========================================
// Equipment - 设备类型
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub equipment_id: u32,
    pub asset_code: EquipmentCode,
    pub asset_type: String,
    pub equipment_category: EquipmentCategory,
    #[serde(with = "one_decimal")]
    pub capacity_ton: f64,                    // 额定载重 (吨)
    pub units_in_operation: u32,
    pub aircraft_category: ServedAircraft,
    pub description: String,
    #[serde(with = "bool_flag")]
    pub is_active: bool,
}

// ==========================================
// Station - 站位 (设备存放点)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station_id: u32,
    pub stand_number: String,
    pub stand_name: String,
    pub description: String,

    // ===== 分设备容量 =====
    pub capacity_13c: u32,
    pub capacity_14p: u32,
    pub capacity_20ft: u32,
    pub capacity_26o: u32,
    pub capacity_40ft: u32,
    pub capacity_26c: u32,
    pub total_capacity: u32,                  // 派生: 分设备容量之和

    // ===== 平面位置 (布局单位) =====
    #[serde(with = "one_decimal")]
    pub location_x: f64,
    #[serde(with = "one_decimal")]
    pub location_y: f64,

    #[serde(with = "bool_flag")]
    pub is_storage_location: bool,
    #[serde(with = "bool_flag")]
    pub is_active: bool,
}

impl Station {
    /// 指定设备的站位容量
    pub fn capacity_for(&self, code: EquipmentCode) -> u32 {
        match code {
            EquipmentCode::C13 => self.capacity_13c,
            EquipmentCode::P14 => self.capacity_14p,
            EquipmentCode::Ft20 => self.capacity_20ft,
            EquipmentCode::O26 => self.capacity_26o,
            EquipmentCode::Ft40 => self.capacity_40ft,
            EquipmentCode::C26 => self.capacity_26c,
        }
    }

    /// 分设备容量之和
    pub fn summed_capacity(&self) -> u32 {
        self.capacity_13c
            + self.capacity_14p
            + self.capacity_20ft
            + self.capacity_26o
            + self.capacity_40ft
            + self.capacity_26c
    }
}

// ==========================================
// TimeSlot - 5 分钟时间槽 (共 288 个)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub slot_id: u32,
    #[serde(with = "clock_time")]
    pub slot_start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub slot_end_time: NaiveTime,
    pub slot_label: String,                   // 例: 06:00-06:05
    pub hour: u32,
    pub minute_start: u32,
    pub period_id: u32,                       // 所属高峰时段
    pub period_name: String,
    #[serde(with = "bool_flag")]
    pub is_peak: bool,
}

// ==========================================
// PeakPeriod - 高峰时段
// ==========================================
// 夜间时段 20:00 → 06:00 跨越午夜
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakPeriod {
    pub period_id: u32,
    pub period_name: String,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub end_time: NaiveTime,
    pub description: String,
    #[serde(with = "bool_flag")]
    pub is_active: bool,
}

impl PeakPeriod {
    pub fn start_hour(&self) -> u32 {
        self.start_time.hour()
    }

    pub fn end_hour(&self) -> u32 {
        self.end_time.hour()
    }

    /// 是否跨越午夜
    pub fn wraps_midnight(&self) -> bool {
        self.end_hour() < self.start_hour()
    }

    /// 小时是否落在 [start, end) 内 (跨午夜时按环形判断)
    pub fn contains_hour(&self, hour: u32) -> bool {
        if self.wraps_midnight() {
            hour >= self.start_hour() || hour < self.end_hour()
        } else {
            hour >= self.start_hour() && hour < self.end_hour()
        }
    }
}

// ==========================================
// CalendarDay - 日历维度
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    #[serde(rename = "date_key", with = "date_key")]
    pub date: NaiveDate,
    pub full_date: NaiveDate,                 // ISO 格式 YYYY-MM-DD
    pub year: i32,
    pub quarter: u32,
    pub month: u32,
    pub month_name: String,
    pub week_of_year: u32,                    // ISO 周
    pub day: u32,
    pub day_of_week: u32,                     // ISO: 周一=1 ... 周日=7
    pub day_name: String,
    #[serde(with = "bool_flag")]
    pub is_weekend: bool,
}

// ==========================================
// Scenario - 模拟情景
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub scenario_id: u32,
    pub scenario_name: String,
    pub scenario_type: ScenarioType,
    pub description: String,
    pub parameter_changed: String,
    pub parameter_value: String,
    #[serde(with = "bool_flag")]
    pub is_baseline: bool,
    #[serde(with = "bool_flag")]
    pub is_active: bool,
}

// ==========================================
// ReferenceTables - 参考目录全集
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub aircraft: Vec<Aircraft>,
    pub equipment: Vec<Equipment>,
    pub stations: Vec<Station>,
    pub time_slots: Vec<TimeSlot>,
    pub peak_periods: Vec<PeakPeriod>,
    pub calendar: Vec<CalendarDay>,
    pub scenarios: Vec<Scenario>,
}

impl ReferenceTables {
    /// 各目录行数 (日志用)
    pub fn row_counts(&self) -> [(&'static str, usize); 7] {
        [
            ("aircraft", self.aircraft.len()),
            ("equipment", self.equipment.len()),
            ("station", self.stations.len()),
            ("time_slot", self.time_slots.len()),
            ("peak_period", self.peak_periods.len()),
            ("calendar", self.calendar.len()),
            ("scenario", self.scenarios.len()),
        ]
    }
}
