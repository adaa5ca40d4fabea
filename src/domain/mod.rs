// ==========================================
// GSE 数据集生成器 - 领域模型层
// ==========================================
// 职责: 定义参考目录与各阶段产出的记录类型
// 红线: 不含文件访问逻辑,不含生成逻辑
// ==========================================

pub mod catalog;
pub mod demand;
pub mod flight;
pub mod replenishment;
pub mod serde_fmt;
pub mod stock;
pub mod types;

// 重导出核心类型
pub use catalog::{
    Aircraft, CalendarDay, Equipment, PeakPeriod, ReferenceTables, Scenario, Station, TimeSlot,
};
pub use demand::FlightDemand;
pub use flight::Flight;
pub use replenishment::Replenishment;
pub use stock::StationStock;
pub use types::{
    AircraftCategory, DemandCalcMethod, EquipmentCategory, EquipmentCode, Priority,
    ReplenishmentStatus, RiskLevel, ScenarioType, ServedAircraft, TriggerReason,
};
