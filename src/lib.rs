// ==========================================
// GSE 数据集生成器 - 核心库
// ==========================================
// 用途: 合成机场地面保障设备 (GSE) 运营数据集
// 技术栈: Rust + CSV 文件
// 系统定位: 离线批量生成, 同一种子产出逐字节一致的数据表
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录类型
pub mod domain;

// 数据仓储层 - CSV 表存储
pub mod repository;

// 引擎层 - 生成阶段
pub mod engine;

// 配置层 - 生成参数
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AircraftCategory, DemandCalcMethod, EquipmentCode, Priority, ReplenishmentStatus, RiskLevel,
    TriggerReason,
};

// 领域实体
pub use domain::{
    Aircraft, CalendarDay, Equipment, Flight, FlightDemand, PeakPeriod, ReferenceTables,
    Replenishment, Scenario, Station, StationStock, TimeSlot,
};

// 引擎
pub use engine::{
    Catalog, DemandGenerator, EngineError, EngineResult, FlightGenerator, PipelineOrchestrator,
    ReplenishmentMatcher, Stage, StageReport, StockAggregator,
};

// 配置与存储
pub use config::{ConfigError, GeneratorConfig};
pub use repository::{RepositoryError, TableStore};

// ==========================================
// 版本信息
// ==========================================
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "GSE Dataset Generator";
