// ==========================================
// GSE 数据集生成器 - CSV 表存储
// ==========================================
// 每个实体一张表, 一张表一个 CSV 文件 (表头 + 逗号分隔 + UTF-8)
// 写出流程: 写临时文件 → fsync → rename 覆盖, 失败时不留下半张表
// ==========================================

use crate::domain::{
    Aircraft, CalendarDay, Equipment, Flight, FlightDemand, PeakPeriod, ReferenceTables,
    Replenishment, Scenario, Station, StationStock, TimeSlot,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

// ==========================================
// Trait: Table
// ==========================================
// 用途: 记录类型 → 文件名映射
pub trait Table: Serialize + DeserializeOwned {
    /// 表名 (不含扩展名)
    const TABLE: &'static str;

    /// 表头列名, 与记录序列化字段顺序一致 (空表也写出表头)
    const COLUMNS: &'static [&'static str];

    fn file_name() -> String {
        format!("{}.csv", Self::TABLE)
    }
}

impl Table for Aircraft {
    const TABLE: &'static str = "dim_aircraft";
    const COLUMNS: &'static [&'static str] = &[
        "aircraft_id", "aircraft_series", "aircraft_category", "fleet_count", "fleet_pct",
        "typical_pax", "typical_cargo_kg", "typical_bags", "uld_positions", "is_active",
    ];
}

impl Table for Equipment {
    const TABLE: &'static str = "dim_equipment";
    const COLUMNS: &'static [&'static str] = &[
        "equipment_id", "asset_code", "asset_type", "equipment_category", "capacity_ton",
        "units_in_operation", "aircraft_category", "description", "is_active",
    ];
}

impl Table for Station {
    const TABLE: &'static str = "dim_station";
    const COLUMNS: &'static [&'static str] = &[
        "station_id", "stand_number", "stand_name", "description", "capacity_13c",
        "capacity_14p", "capacity_20ft", "capacity_26o", "capacity_40ft", "capacity_26c",
        "total_capacity", "location_x", "location_y", "is_storage_location", "is_active",
    ];
}

impl Table for TimeSlot {
    const TABLE: &'static str = "dim_time_slot";
    const COLUMNS: &'static [&'static str] = &[
        "slot_id", "slot_start_time", "slot_end_time", "slot_label", "hour", "minute_start",
        "period_id", "period_name", "is_peak",
    ];
}

impl Table for PeakPeriod {
    const TABLE: &'static str = "dim_peak_period";
    const COLUMNS: &'static [&'static str] = &[
        "period_id", "period_name", "start_time", "end_time", "description", "is_active",
    ];
}

impl Table for CalendarDay {
    const TABLE: &'static str = "dim_date";
    const COLUMNS: &'static [&'static str] = &[
        "date_key", "full_date", "year", "quarter", "month", "month_name", "week_of_year",
        "day", "day_of_week", "day_name", "is_weekend",
    ];
}

impl Table for Scenario {
    const TABLE: &'static str = "dim_scenario";
    const COLUMNS: &'static [&'static str] = &[
        "scenario_id", "scenario_name", "scenario_type", "description", "parameter_changed",
        "parameter_value", "is_baseline", "is_active",
    ];
}

impl Table for Flight {
    const TABLE: &'static str = "dim_flight";
    const COLUMNS: &'static [&'static str] = &[
        "flight_id", "flight_number", "airline_code", "airline_name", "aircraft_id",
        "aircraft_series", "aircraft_category", "origin_airport", "date_key", "arrival_time",
        "arrival_slot_id", "estimated_pax", "estimated_bags", "cargo_kg", "has_cargo_data",
        "is_active",
    ];
}

impl Table for FlightDemand {
    const TABLE: &'static str = "fact_flight_demand";
    const COLUMNS: &'static [&'static str] = &[
        "demand_id", "flight_id", "date_key", "arrival_slot_id", "period_id", "station_id",
        "equipment_id", "qty_required", "qty_allocated", "shortage_qty", "pickup_slot_id",
        "return_slot_id", "allocation_distance_km", "demand_calc_method", "risk_level",
        "sla_compliant", "is_active",
    ];
}

impl Table for StationStock {
    const TABLE: &'static str = "fact_station_stock";
    const COLUMNS: &'static [&'static str] = &[
        "stock_id", "station_id", "date_key", "period_id", "equipment_id", "scenario_id",
        "capacity", "reserved_outbound", "available_inbound", "demand_qty", "allocated_qty",
        "shortage_qty", "surplus_qty", "utilization_pct", "bottleneck_flag", "is_active",
    ];
}

impl Table for Replenishment {
    const TABLE: &'static str = "fact_replenishment";
    const COLUMNS: &'static [&'static str] = &[
        "replenishment_id", "from_station_id", "to_station_id", "date_key", "before_period_id",
        "equipment_id", "scenario_id", "qty_to_move", "distance_km", "estimated_time_min",
        "priority", "trigger_reason", "status", "is_active",
    ];
}

// ==========================================
// StagedTable - 已写入临时文件、待提交的表
// ==========================================
// 未提交即析构时删除临时文件
#[derive(Debug)]
pub struct StagedTable {
    table: &'static str,
    temp_path: Option<PathBuf>,
    target_path: PathBuf,
    rows: usize,
}

impl StagedTable {
    /// 提交: 临时文件重命名为正式文件
    ///
    /// 重命名失败时临时文件由 Drop 清理
    pub fn commit(mut self) -> RepositoryResult<usize> {
        if let Some(temp_path) = self.temp_path.as_ref() {
            fs::rename(temp_path, &self.target_path)?;
        }
        self.temp_path = None;
        debug!(table = self.table, rows = self.rows, "数据表已提交");
        Ok(self.rows)
    }
}

impl Drop for StagedTable {
    fn drop(&mut self) {
        if let Some(temp_path) = self.temp_path.take() {
            let _ = fs::remove_file(temp_path);
        }
    }
}

// ==========================================
// TableStore - 数据集目录
// ==========================================
#[derive(Debug, Clone)]
pub struct TableStore {
    root: PathBuf,
}

impl TableStore {
    /// 创建表存储
    ///
    /// # 参数
    /// - root: 数据集目录 (写出时自动创建)
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 表文件路径
    pub fn path_of<T: Table>(&self) -> PathBuf {
        self.root.join(T::file_name())
    }

    pub fn exists<T: Table>(&self) -> bool {
        self.path_of::<T>().is_file()
    }

    // ==========================================
    // 读取
    // ==========================================

    /// 读取整张表
    ///
    /// # 返回
    /// - Err(TableMissing): 文件不存在
    /// - Err(MalformedRow): 任一行无法解析 (行号含表头, 从 2 开始)
    pub fn read_all<T: Table>(&self) -> RepositoryResult<Vec<T>> {
        let path = self.path_of::<T>();
        if !path.is_file() {
            return Err(RepositoryError::TableMissing {
                table: T::TABLE,
                path: path.display().to_string(),
            });
        }

        let file = File::open(&path)?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

        let mut rows = Vec::new();
        for (idx, record) in reader.deserialize::<T>().enumerate() {
            let row = record.map_err(|e| RepositoryError::MalformedRow {
                table: T::TABLE,
                row: idx + 2,
                message: e.to_string(),
            })?;
            rows.push(row);
        }

        debug!(table = T::TABLE, rows = rows.len(), "数据表已读取");
        Ok(rows)
    }

    /// 读取全部参考目录
    pub fn load_reference(&self) -> RepositoryResult<ReferenceTables> {
        Ok(ReferenceTables {
            aircraft: self.read_all()?,
            equipment: self.read_all()?,
            stations: self.read_all()?,
            time_slots: self.read_all()?,
            peak_periods: self.read_all()?,
            calendar: self.read_all()?,
            scenarios: self.read_all()?,
        })
    }

    // ==========================================
    // 写出
    // ==========================================

    /// 写出整张表 (原子替换)
    ///
    /// 空表只含表头行
    pub fn write_all<T: Table>(&self, rows: &[T]) -> RepositoryResult<usize> {
        self.stage(rows)?.commit()
    }

    /// 写出全部参考目录
    ///
    /// 七张表全部写入临时文件成功后才统一提交
    pub fn save_reference(&self, tables: &ReferenceTables) -> RepositoryResult<usize> {
        let staged = vec![
            self.stage(&tables.aircraft)?,
            self.stage(&tables.equipment)?,
            self.stage(&tables.stations)?,
            self.stage(&tables.time_slots)?,
            self.stage(&tables.peak_periods)?,
            self.stage(&tables.calendar)?,
            self.stage(&tables.scenarios)?,
        ];

        // 任一提交失败: 删除本轮已提交的表, 其余临时文件随 StagedTable 析构清理
        let mut committed: Vec<PathBuf> = Vec::with_capacity(staged.len());
        let mut total = 0;
        for table in staged {
            let target_path = table.target_path.clone();
            match table.commit() {
                Ok(rows) => {
                    total += rows;
                    committed.push(target_path);
                }
                Err(err) => {
                    for path in &committed {
                        let _ = fs::remove_file(path);
                    }
                    warn!(
                        rolled_back = committed.len(),
                        error = %err,
                        "参考目录提交失败, 已回滚已提交的表"
                    );
                    return Err(err);
                }
            }
        }
        Ok(total)
    }

    /// 写入临时文件, 返回待提交表
    pub fn stage<T: Table>(&self, rows: &[T]) -> RepositoryResult<StagedTable> {
        fs::create_dir_all(&self.root)?;

        let target_path = self.path_of::<T>();
        let temp_path = target_path.with_extension("csv.tmp");

        // 先登记临时文件, 写入中途失败由 Drop 清理
        let staged = StagedTable {
            table: T::TABLE,
            temp_path: Some(temp_path.clone()),
            target_path,
            rows: rows.len(),
        };

        let file = File::create(&temp_path)?;
        let mut writer = csv::Writer::from_writer(file);
        let csv_error = |e: csv::Error| RepositoryError::CsvWriteError {
            table: T::TABLE,
            message: e.to_string(),
        };

        // 表头随首行记录写出, 空表单独写表头
        if rows.is_empty() {
            writer.write_record(T::COLUMNS).map_err(csv_error)?;
        }
        for row in rows {
            writer.serialize(row).map_err(csv_error)?;
        }
        let file = writer
            .into_inner()
            .map_err(|e| RepositoryError::Io(e.into_error()))?;
        file.sync_all()?;

        Ok(staged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{AircraftCategory, ScenarioType};
    use tempfile::TempDir;

    fn sample_scenario(id: u32, baseline: bool) -> Scenario {
        Scenario {
            scenario_id: id,
            scenario_name: format!("S{}", id),
            scenario_type: ScenarioType::Baseline,
            description: "测试, 含逗号".to_string(),
            parameter_changed: "None".to_string(),
            parameter_value: "None".to_string(),
            is_baseline: baseline,
            is_active: true,
        }
    }

    #[test]
    fn test_write_then_read_preserves_rows() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path());

        let rows = vec![sample_scenario(1, true), sample_scenario(2, false)];
        assert_eq!(store.write_all(&rows).unwrap(), 2);

        let loaded: Vec<Scenario> = store.read_all().unwrap();
        assert_eq!(loaded, rows);
        assert!(!dir.path().join("dim_scenario.csv.tmp").exists());
    }

    #[test]
    fn test_boolean_and_decimal_literals() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path());

        let aircraft = Aircraft {
            aircraft_id: 1,
            aircraft_series: "A380".to_string(),
            aircraft_category: AircraftCategory::Widebody,
            fleet_count: 10,
            fleet_pct: 17.5,
            typical_pax: 496,
            typical_cargo_kg: 15000,
            typical_bags: 645,
            uld_positions: 38,
            is_active: true,
        };
        store.write_all(&[aircraft]).unwrap();

        let text = fs::read_to_string(store.path_of::<Aircraft>()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "aircraft_id,aircraft_series,aircraft_category,fleet_count,fleet_pct,typical_pax,typical_cargo_kg,typical_bags,uld_positions,is_active"
        );
        assert_eq!(lines.next().unwrap(), "1,A380,Widebody,10,17.5,496,15000,645,38,TRUE");
    }

    #[test]
    fn test_missing_table_reported() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path());

        let err = store.read_all::<Flight>().unwrap_err();
        assert!(matches!(err, RepositoryError::TableMissing { table: "dim_flight", .. }));
    }

    #[test]
    fn test_malformed_row_reports_line() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path());
        fs::write(
            store.path_of::<Scenario>(),
            "scenario_id,scenario_name,scenario_type,description,parameter_changed,parameter_value,is_baseline,is_active\n\
             1,Baseline,Baseline,d,None,None,TRUE,TRUE\n\
             2,Broken,Baseline,d,None,None,MAYBE,TRUE\n",
        )
        .unwrap();

        let err = store.read_all::<Scenario>().unwrap_err();
        assert!(matches!(err, RepositoryError::MalformedRow { row: 3, .. }));
    }

    #[test]
    fn test_dropped_stage_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path());

        let staged = store.stage(&[sample_scenario(1, true)]).unwrap();
        assert!(dir.path().join("dim_scenario.csv.tmp").exists());
        drop(staged);

        assert!(!dir.path().join("dim_scenario.csv.tmp").exists());
        assert!(!store.exists::<Scenario>());
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path());

        assert_eq!(store.write_all::<Replenishment>(&[]).unwrap(), 0);

        let text = fs::read_to_string(store.path_of::<Replenishment>()).unwrap();
        assert_eq!(text.trim_end(), Replenishment::COLUMNS.join(","));
        assert!(text.starts_with("replenishment_id,from_station_id,to_station_id,date_key,"));

        let loaded: Vec<Replenishment> = store.read_all().unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_failed_reference_commit_rolls_back() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path());

        // 目标路径被目录占用, 第 5 张表 rename 失败
        let blocker = store.path_of::<PeakPeriod>();
        fs::create_dir_all(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();

        let day = chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let tables = crate::engine::reference::build_reference_tables(
            &crate::config::DateWindow::new(day, day),
        );
        assert!(store.save_reference(&tables).is_err());

        assert!(!store.exists::<Aircraft>());
        assert!(!store.exists::<Equipment>());
        assert!(!store.exists::<Station>());
        assert!(!store.exists::<TimeSlot>());
        assert!(!store.exists::<CalendarDay>());
        assert!(!store.exists::<Scenario>());

        let temp_files = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(temp_files, 0);
    }
}
