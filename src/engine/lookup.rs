// ==========================================
// GSE 数据集生成器 - 参考目录只读索引
// ==========================================
// 每次阶段调用时构建一次, 阶段内只读
// 查找失败统一返回 ReferenceDataMissing
// ==========================================

use crate::domain::types::{AircraftCategory, EquipmentCode};
use crate::domain::{
    Aircraft, CalendarDay, Equipment, PeakPeriod, ReferenceTables, Scenario, Station,
};
use crate::engine::error::{EngineError, EngineResult};
use std::collections::BTreeMap;

// ==========================================
// Catalog - 参考目录索引
// ==========================================
pub struct Catalog<'a> {
    tables: &'a ReferenceTables,
    aircraft: BTreeMap<u32, &'a Aircraft>,
    aircraft_by_series: BTreeMap<&'a str, &'a Aircraft>,
    equipment: BTreeMap<u32, &'a Equipment>,
    equipment_by_code: BTreeMap<EquipmentCode, &'a Equipment>,
    stations: BTreeMap<u32, &'a Station>,
    stations_by_stand: BTreeMap<&'a str, &'a Station>,
    periods: BTreeMap<u32, &'a PeakPeriod>,
    slot_periods: BTreeMap<u32, u32>,
}

impl<'a> Catalog<'a> {
    /// 由参考目录构建索引
    pub fn new(tables: &'a ReferenceTables) -> Self {
        Self {
            tables,
            aircraft: tables.aircraft.iter().map(|a| (a.aircraft_id, a)).collect(),
            aircraft_by_series: tables
                .aircraft
                .iter()
                .map(|a| (a.aircraft_series.as_str(), a))
                .collect(),
            equipment: tables.equipment.iter().map(|e| (e.equipment_id, e)).collect(),
            equipment_by_code: tables.equipment.iter().map(|e| (e.asset_code, e)).collect(),
            stations: tables.stations.iter().map(|s| (s.station_id, s)).collect(),
            stations_by_stand: tables
                .stations
                .iter()
                .map(|s| (s.stand_number.as_str(), s))
                .collect(),
            periods: tables.peak_periods.iter().map(|p| (p.period_id, p)).collect(),
            slot_periods: tables
                .time_slots
                .iter()
                .map(|t| (t.slot_id, t.period_id))
                .collect(),
        }
    }

    // ===== 机型 =====

    pub fn aircraft(&self, aircraft_id: u32) -> EngineResult<&'a Aircraft> {
        self.aircraft
            .get(&aircraft_id)
            .copied()
            .ok_or_else(|| EngineError::missing("aircraft", aircraft_id))
    }

    pub fn aircraft_by_series(&self, series: &str) -> EngineResult<&'a Aircraft> {
        self.aircraft_by_series
            .get(series)
            .copied()
            .ok_or_else(|| EngineError::missing("aircraft", series))
    }

    /// 指定类别的全部机型 (按 id 升序)
    pub fn aircraft_in_category(&self, category: AircraftCategory) -> Vec<&'a Aircraft> {
        self.aircraft
            .values()
            .filter(|a| a.aircraft_category == category)
            .copied()
            .collect()
    }

    // ===== 设备 =====

    pub fn equipment(&self, equipment_id: u32) -> EngineResult<&'a Equipment> {
        self.equipment
            .get(&equipment_id)
            .copied()
            .ok_or_else(|| EngineError::missing("equipment", equipment_id))
    }

    pub fn equipment_by_code(&self, code: EquipmentCode) -> EngineResult<&'a Equipment> {
        self.equipment_by_code
            .get(&code)
            .copied()
            .ok_or_else(|| EngineError::missing("equipment", code))
    }

    /// 全部设备 (按 id 升序)
    pub fn equipment_list(&self) -> impl Iterator<Item = &'a Equipment> + '_ {
        self.equipment.values().copied()
    }

    // ===== 站位 =====

    pub fn station(&self, station_id: u32) -> EngineResult<&'a Station> {
        self.stations
            .get(&station_id)
            .copied()
            .ok_or_else(|| EngineError::missing("station", station_id))
    }

    pub fn station_by_stand(&self, stand_number: &str) -> EngineResult<&'a Station> {
        self.stations_by_stand
            .get(stand_number)
            .copied()
            .ok_or_else(|| EngineError::missing("station", stand_number))
    }

    /// 全部站位 (按 id 升序)
    pub fn stations(&self) -> impl Iterator<Item = &'a Station> + '_ {
        self.stations.values().copied()
    }

    // ===== 时段 / 时间槽 =====

    pub fn peak_period(&self, period_id: u32) -> EngineResult<&'a PeakPeriod> {
        self.periods
            .get(&period_id)
            .copied()
            .ok_or_else(|| EngineError::missing("peak_period", period_id))
    }

    /// 全部高峰时段 (按 id 升序)
    pub fn peak_periods(&self) -> impl Iterator<Item = &'a PeakPeriod> + '_ {
        self.periods.values().copied()
    }

    pub fn period_of_slot(&self, slot_id: u32) -> EngineResult<u32> {
        self.slot_periods
            .get(&slot_id)
            .copied()
            .ok_or_else(|| EngineError::missing("time_slot", slot_id))
    }

    // ===== 日历 / 情景 =====

    pub fn calendar(&self) -> &'a [CalendarDay] {
        &self.tables.calendar
    }

    /// 基准情景 (is_baseline = TRUE 的第一行)
    pub fn baseline_scenario(&self) -> EngineResult<&'a Scenario> {
        self.tables
            .scenarios
            .iter()
            .find(|s| s.is_baseline)
            .ok_or_else(|| EngineError::missing("scenario", "baseline"))
    }
}
