// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供小规模配置、参考目录与航班样例
// ==========================================

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use gse_datagen::config::{CountRange, DateWindow, GeneratorConfig};
use gse_datagen::domain::{Aircraft, Flight, ReferenceTables};
use gse_datagen::engine::build_reference_tables;
use std::path::Path;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 小规模配置: 一周日历, 前三天有航班
pub fn small_config(out_dir: &Path) -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.output_dir = out_dir.to_path_buf();
    config.calendar = DateWindow::new(date(2025, 3, 1), date(2025, 3, 7));
    config.flights.window = DateWindow::new(date(2025, 3, 1), date(2025, 3, 3));
    config.flights.flights_per_day = CountRange { min: 30, max: 40 };
    config
}

/// 与小规模配置一致的参考目录
pub fn small_reference() -> ReferenceTables {
    build_reference_tables(&DateWindow::new(date(2025, 3, 1), date(2025, 3, 7)))
}

/// 构造单个航班
pub fn flight_for(aircraft: &Aircraft, bags: u32, cargo_kg: Option<f64>) -> Flight {
    Flight {
        flight_id: 1,
        flight_number: "EY1234".to_string(),
        airline_code: "EY".to_string(),
        airline_name: "Etihad Airways".to_string(),
        aircraft_id: aircraft.aircraft_id,
        aircraft_series: aircraft.aircraft_series.clone(),
        aircraft_category: aircraft.aircraft_category,
        origin_airport: "LHR".to_string(),
        date: date(2025, 3, 1),
        arrival_time: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
        arrival_slot_id: 103,
        estimated_pax: aircraft.typical_pax,
        estimated_bags: bags,
        cargo_kg: cargo_kg.unwrap_or(0.0),
        has_cargo_data: cargo_kg.is_some(),
        is_active: true,
    }
}
