// ==========================================
// GSE 数据集生成器 - 参考目录构建
// ==========================================
// 职责: 产出七张静态参考表 (机型/设备/站位/时间槽/高峰时段/日历/情景)
// 派生: 站位总容量、时间槽所属时段、日历属性
// ==========================================

use crate::config::DateWindow;
use crate::domain::types::{
    AircraftCategory, EquipmentCategory, EquipmentCode, ScenarioType, ServedAircraft,
};
use crate::domain::{
    Aircraft, CalendarDay, Equipment, PeakPeriod, ReferenceTables, Scenario, Station, TimeSlot,
};
use crate::engine::sampling::{slot_of, slot_start, SLOTS_PER_DAY};
use chrono::{Datelike, NaiveTime};
use tracing::{info, instrument};

// ==========================================
// 静态目录数据
// ==========================================

// (系列, 类别, 机队数, 机队占比, 典型客座, 典型货量kg, 典型行李, ULD 位)
const AIRCRAFT: [(&str, AircraftCategory, u32, f64, u32, u32, u32, u32); 10] = [
    ("A380", AircraftCategory::Widebody, 10, 17.5, 496, 15000, 645, 38),
    ("B777", AircraftCategory::Widebody, 3, 5.3, 350, 12000, 455, 32),
    ("B747", AircraftCategory::Widebody, 4, 7.0, 400, 14000, 520, 36),
    ("A350", AircraftCategory::Widebody, 3, 5.3, 300, 10000, 390, 28),
    ("B787", AircraftCategory::Widebody, 3, 5.3, 280, 9000, 364, 24),
    ("A330", AircraftCategory::Widebody, 1, 1.8, 260, 8000, 338, 22),
    ("A321", AircraftCategory::Narrowbody, 11, 19.3, 200, 3500, 260, 10),
    ("A320", AircraftCategory::Narrowbody, 14, 24.6, 180, 2500, 234, 7),
    ("B737", AircraftCategory::Narrowbody, 3, 5.3, 162, 2000, 211, 6),
    ("E190", AircraftCategory::Narrowbody, 5, 8.8, 100, 1000, 130, 3),
];

// (资产代码, 资产类型, 大类, 载重吨, 在用数量, 适用机型, 说明)
const EQUIPMENT: [(EquipmentCode, &str, EquipmentCategory, f64, u32, ServedAircraft, &str); 6] = [
    (
        EquipmentCode::C13,
        "LD3 Container Dolly",
        EquipmentCategory::Dolly,
        1.6,
        810,
        ServedAircraft::Narrowbody,
        "For LD3 containers on narrowbody aircraft",
    ),
    (
        EquipmentCode::P14,
        "10 FT Pallet Dolly",
        EquipmentCategory::Dolly,
        7.0,
        945,
        ServedAircraft::Widebody,
        "Standard pallet dolly for widebody aircraft",
    ),
    (
        EquipmentCode::Ft20,
        "20 FT Pallet Dolly",
        EquipmentCategory::Dolly,
        14.0,
        60,
        ServedAircraft::Widebody,
        "Large pallet dolly for heavy cargo",
    ),
    (
        EquipmentCode::O26,
        "Open Baggage Trolley",
        EquipmentCategory::Trolley,
        2.0,
        542,
        ServedAircraft::All,
        "Open trolley for bulk baggage",
    ),
    (
        EquipmentCode::Ft40,
        "40FT Pallet Dolly",
        EquipmentCategory::Dolly,
        20.0,
        1,
        ServedAircraft::Widebody,
        "Extra-large pallet dolly for oversized cargo",
    ),
    (
        EquipmentCode::C26,
        "Closed Baggage Trolley",
        EquipmentCategory::Trolley,
        3.5,
        252,
        ServedAircraft::All,
        "Enclosed trolley for weather protection",
    ),
];

struct StationSeed {
    stand: &'static str,
    description: &'static str,
    capacity: [u32; 6], // 13C, 14P, 20FT, 26-O, 40FT, 26-C
    location: (f64, f64),
    storage: bool,
}

const STATIONS: [StationSeed; 10] = [
    StationSeed {
        stand: "661",
        description: "Area fully occupied with empty container racks",
        capacity: [50, 0, 0, 0, 0, 0],
        location: (62.0, 18.0),
        storage: true,
    },
    StationSeed {
        stand: "678",
        description: "Area marked for bus staging",
        capacity: [0, 0, 0, 0, 0, 0],
        location: (80.0, 22.0),
        storage: false,
    },
    StationSeed {
        stand: "668",
        description: "Baggage area for small dollies staging",
        capacity: [238, 0, 0, 0, 0, 0],
        location: (70.0, 20.0),
        storage: true,
    },
    StationSeed {
        stand: "699",
        description: "OSS baggage, OAL empty containers, lashing belts, blankets",
        capacity: [80, 0, 0, 100, 0, 50],
        location: (95.0, 30.0),
        storage: true,
    },
    StationSeed {
        stand: "621",
        description: "Space available for 16 pallet dollies",
        capacity: [0, 16, 0, 20, 0, 10],
        location: (20.0, 10.0),
        storage: true,
    },
    StationSeed {
        stand: "625",
        description: "Space shared with cargo",
        capacity: [50, 10, 5, 30, 0, 15],
        location: (25.0, 12.0),
        storage: true,
    },
    StationSeed {
        stand: "632",
        description: "Space available for 39 pallet dollies",
        capacity: [0, 39, 5, 40, 0, 20],
        location: (32.0, 15.0),
        storage: true,
    },
    StationSeed {
        stand: "641",
        description: "Space available for 43 pallet dollies",
        capacity: [0, 43, 5, 45, 1, 25],
        location: (41.0, 14.0),
        storage: true,
    },
    StationSeed {
        stand: "643",
        description: "Space available for 16 pallet dollies",
        capacity: [0, 16, 0, 25, 0, 12],
        location: (44.0, 16.0),
        storage: true,
    },
    StationSeed {
        stand: "647",
        description: "Space available for 49 pallet dollies",
        capacity: [0, 49, 10, 50, 0, 30],
        location: (48.0, 17.0),
        storage: true,
    },
];

// (名称, 起始小时, 结束小时, 说明)
const PEAK_PERIODS: [(&str, u32, u32, &str); 4] = [
    ("Morning Peak", 6, 10, "Morning arrival wave"),
    ("Midday", 10, 14, "Midday operations"),
    ("Evening Peak", 14, 20, "Evening departure/arrival wave"),
    ("Night", 20, 6, "Night operations and preparation"),
];

/// 高峰标记时段 (早高峰 / 晚高峰)
const PEAK_FLAGGED_PERIODS: [u32; 2] = [1, 3];

// (名称, 类型, 说明, 变更参数, 参数值, 是否基准)
const SCENARIOS: [(&str, ScenarioType, &str, &str, &str, bool); 5] = [
    (
        "Baseline",
        ScenarioType::Baseline,
        "Current operations with existing equipment allocation",
        "None",
        "None",
        true,
    ),
    (
        "Add 10 Dollies Stn 621",
        ScenarioType::Capacity,
        "Add 10 pallet dollies to high-traffic Station 621",
        "capacity_pallet_dolly",
        "Station 621: +10 units",
        false,
    ),
    (
        "Add 20 Trolleys Stn 608",
        ScenarioType::Capacity,
        "Add 20 baggage trolleys to baggage handling area",
        "capacity_baggage_trolley",
        "Station 608: +20 units",
        false,
    ),
    (
        "Redistribute from 647",
        ScenarioType::Redistribution,
        "Move surplus equipment from Station 647 to 621 & 632",
        "redistribution_rule",
        "647 to 621: 5, 647 to 632: 5",
        false,
    ),
    (
        "Peak Demand +20%",
        ScenarioType::Demand,
        "Simulate 20% increase in peak period demand",
        "demand_multiplier",
        "Peak periods: 1.2x",
        false,
    ),
];

// ==========================================
// 构建函数
// ==========================================

/// 构建全部参考目录
///
/// # 参数
/// - calendar: 日历维度覆盖的日期窗口
#[instrument(skip_all, fields(start = %calendar.start, end = %calendar.end))]
pub fn build_reference_tables(calendar: &DateWindow) -> ReferenceTables {
    let peak_periods = build_peak_periods();
    let tables = ReferenceTables {
        aircraft: build_aircraft(),
        equipment: build_equipment(),
        stations: build_stations(),
        time_slots: build_time_slots(&peak_periods),
        peak_periods,
        calendar: build_calendar(calendar),
        scenarios: build_scenarios(),
    };

    for (entity, rows) in tables.row_counts() {
        info!(entity, rows, "参考目录已构建");
    }
    tables
}

pub fn build_aircraft() -> Vec<Aircraft> {
    AIRCRAFT
        .iter()
        .zip(1u32..)
        .map(
            |(&(series, category, fleet, pct, pax, cargo, bags, uld), id)| Aircraft {
                aircraft_id: id,
                aircraft_series: series.to_string(),
                aircraft_category: category,
                fleet_count: fleet,
                fleet_pct: pct,
                typical_pax: pax,
                typical_cargo_kg: cargo,
                typical_bags: bags,
                uld_positions: uld,
                is_active: true,
            },
        )
        .collect()
}

pub fn build_equipment() -> Vec<Equipment> {
    EQUIPMENT
        .iter()
        .zip(1u32..)
        .map(
            |(&(code, asset_type, category, ton, units, served, description), id)| Equipment {
                equipment_id: id,
                asset_code: code,
                asset_type: asset_type.to_string(),
                equipment_category: category,
                capacity_ton: ton,
                units_in_operation: units,
                aircraft_category: served,
                description: description.to_string(),
                is_active: true,
            },
        )
        .collect()
}

pub fn build_stations() -> Vec<Station> {
    STATIONS
        .iter()
        .zip(1u32..)
        .map(|(seed, id)| {
            let [c13, p14, ft20, o26, ft40, c26] = seed.capacity;
            let mut station = Station {
                station_id: id,
                stand_number: seed.stand.to_string(),
                stand_name: format!("Stand {}", seed.stand),
                description: seed.description.to_string(),
                capacity_13c: c13,
                capacity_14p: p14,
                capacity_20ft: ft20,
                capacity_26o: o26,
                capacity_40ft: ft40,
                capacity_26c: c26,
                total_capacity: 0,
                location_x: seed.location.0,
                location_y: seed.location.1,
                is_storage_location: seed.storage,
                is_active: true,
            };
            station.total_capacity = station.summed_capacity();
            station
        })
        .collect()
}

pub fn build_peak_periods() -> Vec<PeakPeriod> {
    PEAK_PERIODS
        .iter()
        .zip(1u32..)
        .map(|(&(name, start, end, description), id)| PeakPeriod {
            period_id: id,
            period_name: name.to_string(),
            start_time: NaiveTime::from_hms_opt(start, 0, 0).unwrap_or_default(),
            end_time: NaiveTime::from_hms_opt(end, 0, 0).unwrap_or_default(),
            description: description.to_string(),
            is_active: true,
        })
        .collect()
}

/// 288 个时间槽, 按起始小时归属高峰时段
pub fn build_time_slots(periods: &[PeakPeriod]) -> Vec<TimeSlot> {
    (1..=SLOTS_PER_DAY)
        .map(|slot_id| {
            let (hour, minute) = slot_start(slot_id);
            let (end_hour, end_minute) = slot_start(slot_id + 1);

            let period = periods.iter().find(|p| p.contains_hour(hour));
            let (period_id, period_name) = period
                .map(|p| (p.period_id, p.period_name.clone()))
                .unwrap_or_default();

            debug_assert_eq!(slot_of(hour, minute), slot_id);
            TimeSlot {
                slot_id,
                slot_start_time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default(),
                slot_end_time: NaiveTime::from_hms_opt(end_hour, end_minute, 0)
                    .unwrap_or_default(),
                slot_label: format!(
                    "{:02}:{:02}-{:02}:{:02}",
                    hour, minute, end_hour, end_minute
                ),
                hour,
                minute_start: minute,
                period_id,
                period_name,
                is_peak: PEAK_FLAGGED_PERIODS.contains(&period_id),
            }
        })
        .collect()
}

pub fn build_calendar(window: &DateWindow) -> Vec<CalendarDay> {
    window
        .days()
        .map(|date| {
            let weekday = date.weekday().number_from_monday();
            CalendarDay {
                date,
                full_date: date,
                year: date.year(),
                quarter: (date.month() - 1) / 3 + 1,
                month: date.month(),
                month_name: date.format("%B").to_string(),
                week_of_year: date.iso_week().week(),
                day: date.day(),
                day_of_week: weekday,
                day_name: date.format("%A").to_string(),
                is_weekend: weekday >= 6,
            }
        })
        .collect()
}

pub fn build_scenarios() -> Vec<Scenario> {
    SCENARIOS
        .iter()
        .zip(1u32..)
        .map(
            |(&(name, scenario_type, description, parameter, value, baseline), id)| Scenario {
                scenario_id: id,
                scenario_name: name.to_string(),
                scenario_type,
                description: description.to_string(),
                parameter_changed: parameter.to_string(),
                parameter_value: value.to_string(),
                is_baseline: baseline,
                is_active: true,
            },
        )
        .collect()
}
