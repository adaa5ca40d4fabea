// ==========================================
// GSE 数据集生成器 - 生成参数配置
// ==========================================
// 职责: 配置加载 (JSON)、默认值、合法性校验
// 说明: 所有字段均有默认值,配置文件只需写需要覆写的项
// ==========================================

use crate::domain::types::EquipmentCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置解析失败: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("配置值无效 (key: {key}): {message}")]
    ValueError { key: &'static str, message: String },
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

// ==========================================
// 基础区间类型
// ==========================================

/// 闭区间日期窗口
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// 窗口内的全部日期 (含首尾)
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// 整数闭区间 [min, max]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

/// 浮点闭区间 [min, max]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub min: f64,
    pub max: f64,
}

/// 高峰时段抽样权重
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodWeight {
    pub period_id: u32,
    pub weight: f64,
}

// ==========================================
// 航班生成配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    pub window: DateWindow,                   // 航班日期窗口
    pub flights_per_day: CountRange,          // 每日航班数
    pub flight_number: CountRange,            // 航班号数字范围
    pub max_flight_number_attempts: u32,      // 航班号拒绝采样上限
    pub period_weights: Vec<PeriodWeight>,
    pub load_factor: FloatRange,
    pub bags_per_pax: FloatRange,
    pub cargo_data_probability: f64,
    pub cargo_factor: FloatRange,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            window: DateWindow::new(ymd(2025, 3, 1), ymd(2025, 8, 31)),
            flights_per_day: CountRange { min: 75, max: 85 },
            flight_number: CountRange { min: 100, max: 9999 },
            max_flight_number_attempts: 10_000,
            period_weights: vec![
                PeriodWeight { period_id: 1, weight: 0.30 },
                PeriodWeight { period_id: 2, weight: 0.20 },
                PeriodWeight { period_id: 3, weight: 0.35 },
                PeriodWeight { period_id: 4, weight: 0.15 },
            ],
            load_factor: FloatRange { min: 0.70, max: 0.95 },
            bags_per_pax: FloatRange { min: 1.2, max: 1.5 },
            cargo_data_probability: 0.39,
            cargo_factor: FloatRange { min: 0.30, max: 0.80 },
        }
    }
}

// ==========================================
// 航班需求配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandConfig {
    pub full_allocation_probability: f64,     // 足额分配概率
    pub minor_shortage_probability: f64,      // 小缺口概率
    pub minor_shortage: CountRange,
    pub major_shortage: CountRange,           // 剩余概率落入大缺口
    pub preferred_station_probability: f64,
    pub pickup_offset_slots: CountRange,      // 到港前提取
    pub return_offset_slots: u32,             // 到港后归还
    pub allocation_distance_km: FloatRange,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            full_allocation_probability: 0.85,
            minor_shortage_probability: 0.10,
            minor_shortage: CountRange { min: 1, max: 2 },
            major_shortage: CountRange { min: 3, max: 4 },
            preferred_station_probability: 0.70,
            pickup_offset_slots: CountRange { min: 3, max: 6 },
            return_offset_slots: 9,
            allocation_distance_km: FloatRange { min: 0.3, max: 2.5 },
        }
    }
}

// ==========================================
// 站位库存配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockConfig {
    pub excluded_equipment: Vec<EquipmentCode>,
    pub reserved_outbound_ratio: f64,
    pub utilization_cap_pct: f64,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            excluded_equipment: vec![EquipmentCode::Ft40],
            reserved_outbound_ratio: 0.5,
            utilization_cap_pct: 150.0,
        }
    }
}

// ==========================================
// 调拨匹配配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplenishmentConfig {
    pub match_probability: f64,               // 缺口单元参与匹配的比例 (控量)
    pub distance_divisor: f64,                // 布局单位 → 公里
    pub minutes_per_km: f64,
    pub transit_minutes: CountRange,
    pub reference_date: NaiveDate,            // 此日期之前的调拨可为已完成
    pub shortage_reason_probability: f64,
    pub balance_reason_probability: f64,
    pub completed_probability: f64,
    pub approved_probability: f64,
}

impl Default for ReplenishmentConfig {
    fn default() -> Self {
        Self {
            match_probability: 0.30,
            distance_divisor: 30.0,
            minutes_per_km: 4.0,
            transit_minutes: CountRange { min: 2, max: 15 },
            reference_date: ymd(2025, 6, 1),
            shortage_reason_probability: 0.70,
            balance_reason_probability: 0.20,
            completed_probability: 0.60,
            approved_probability: 0.30,
        }
    }
}

// ==========================================
// GeneratorConfig - 顶层配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub output_dir: PathBuf,
    pub calendar: DateWindow,                 // 日历维度与库存表覆盖范围
    pub flights: FlightConfig,
    pub demand: DemandConfig,
    pub stock: StockConfig,
    pub replenishment: ReplenishmentConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            output_dir: PathBuf::from("dataset"),
            calendar: DateWindow::new(ymd(2025, 1, 1), ymd(2025, 12, 31)),
            flights: FlightConfig::default(),
            demand: DemandConfig::default(),
            stock: StockConfig::default(),
            replenishment: ReplenishmentConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// 从 JSON 文件加载配置并校验
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&raw)
    }

    /// 从 JSON 文本解析配置并校验
    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        let config: GeneratorConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    ///
    /// 只拦截无法产出有效数据集的取值,不校验业务合理性
    pub fn validate(&self) -> ConfigResult<()> {
        check_window("calendar", &self.calendar)?;
        check_window("flights.window", &self.flights.window)?;
        if !(self.calendar.contains(self.flights.window.start)
            && self.calendar.contains(self.flights.window.end))
        {
            return Err(ConfigError::ValueError {
                key: "flights.window",
                message: format!(
                    "航班窗口 {}..{} 超出日历范围 {}..{}",
                    self.flights.window.start,
                    self.flights.window.end,
                    self.calendar.start,
                    self.calendar.end
                ),
            });
        }
        check_count_range("flights.flights_per_day", &self.flights.flights_per_day)?;
        check_count_range("flights.flight_number", &self.flights.flight_number)?;
        check_float_range("flights.load_factor", &self.flights.load_factor)?;
        check_float_range("flights.bags_per_pax", &self.flights.bags_per_pax)?;
        check_float_range("flights.cargo_factor", &self.flights.cargo_factor)?;
        check_probability("flights.cargo_data_probability", self.flights.cargo_data_probability)?;

        if self.flights.max_flight_number_attempts == 0 {
            return Err(value_error("flights.max_flight_number_attempts", "必须大于 0"));
        }
        if self.flights.period_weights.is_empty()
            || self.flights.period_weights.iter().any(|w| !(w.weight >= 0.0))
            || self.flights.period_weights.iter().all(|w| w.weight == 0.0)
        {
            return Err(value_error(
                "flights.period_weights",
                "至少需要一个正权重,且不允许负权重",
            ));
        }

        let demand = &self.demand;
        check_probability("demand.full_allocation_probability", demand.full_allocation_probability)?;
        check_probability("demand.minor_shortage_probability", demand.minor_shortage_probability)?;
        check_probability(
            "demand.preferred_station_probability",
            demand.preferred_station_probability,
        )?;
        if demand.full_allocation_probability + demand.minor_shortage_probability > 1.0 {
            return Err(value_error(
                "demand.minor_shortage_probability",
                "足额与小缺口概率之和不能超过 1",
            ));
        }
        check_count_range("demand.minor_shortage", &demand.minor_shortage)?;
        check_count_range("demand.major_shortage", &demand.major_shortage)?;
        check_count_range("demand.pickup_offset_slots", &demand.pickup_offset_slots)?;
        check_float_range("demand.allocation_distance_km", &demand.allocation_distance_km)?;

        let stock = &self.stock;
        if !(0.0..=1.0).contains(&stock.reserved_outbound_ratio) {
            return Err(value_error("stock.reserved_outbound_ratio", "必须位于 [0, 1]"));
        }
        if !(stock.utilization_cap_pct > 0.0) {
            return Err(value_error("stock.utilization_cap_pct", "必须大于 0"));
        }

        let repl = &self.replenishment;
        check_probability("replenishment.match_probability", repl.match_probability)?;
        check_probability(
            "replenishment.shortage_reason_probability",
            repl.shortage_reason_probability,
        )?;
        check_probability(
            "replenishment.balance_reason_probability",
            repl.balance_reason_probability,
        )?;
        check_probability("replenishment.completed_probability", repl.completed_probability)?;
        check_probability("replenishment.approved_probability", repl.approved_probability)?;
        if repl.shortage_reason_probability + repl.balance_reason_probability > 1.0 {
            return Err(value_error(
                "replenishment.balance_reason_probability",
                "触发原因概率之和不能超过 1",
            ));
        }
        if repl.completed_probability + repl.approved_probability > 1.0 {
            return Err(value_error(
                "replenishment.approved_probability",
                "状态概率之和不能超过 1",
            ));
        }
        if !(repl.distance_divisor > 0.0) {
            return Err(value_error("replenishment.distance_divisor", "必须大于 0"));
        }
        check_count_range("replenishment.transit_minutes", &repl.transit_minutes)?;

        Ok(())
    }
}

// ==========================================
// 校验辅助函数
// ==========================================

fn value_error(key: &'static str, message: &str) -> ConfigError {
    ConfigError::ValueError {
        key,
        message: message.to_string(),
    }
}

fn check_window(key: &'static str, window: &DateWindow) -> ConfigResult<()> {
    if window.start > window.end {
        return Err(ConfigError::ValueError {
            key,
            message: format!("起始日期 {} 晚于结束日期 {}", window.start, window.end),
        });
    }
    Ok(())
}

fn check_count_range(key: &'static str, range: &CountRange) -> ConfigResult<()> {
    if range.min > range.max {
        return Err(ConfigError::ValueError {
            key,
            message: format!("min={} 大于 max={}", range.min, range.max),
        });
    }
    Ok(())
}

fn check_float_range(key: &'static str, range: &FloatRange) -> ConfigResult<()> {
    if !(range.min.is_finite() && range.max.is_finite()) || range.min > range.max {
        return Err(ConfigError::ValueError {
            key,
            message: format!("无效区间 [{}, {}]", range.min, range.max),
        });
    }
    Ok(())
}

fn check_probability(key: &'static str, p: f64) -> ConfigResult<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ConfigError::ValueError {
            key,
            message: format!("概率 {} 不在 [0, 1] 内", p),
        });
    }
    Ok(())
}
