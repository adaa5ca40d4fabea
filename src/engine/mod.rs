// ==========================================
// GSE 数据集生成器 - 生成引擎层
// ==========================================
// 职责: 参考目录构建、航班采样、需求推导、库存聚合、调拨匹配
// 红线: 引擎不直接读写文件, 文件进出由编排器经 TableStore 完成
// ==========================================

pub mod demand_generator;
pub mod error;
pub mod flight_generator;
pub mod lookup;
pub mod orchestrator;
pub mod reference;
pub mod replenishment_matcher;
pub mod sampling;
pub mod stock_aggregator;

// 重导出核心引擎
pub use demand_generator::{DemandDriver, DemandGenerator, DemandRule};
pub use error::{EngineError, EngineResult};
pub use flight_generator::{AircraftPool, AircraftRule, Airline, FlightGenerator};
pub use lookup::Catalog;
pub use orchestrator::{PipelineOrchestrator, Stage, StageReport};
pub use reference::build_reference_tables;
pub use replenishment_matcher::ReplenishmentMatcher;
pub use stock_aggregator::{compute_cell, StockAggregator, StockCell};
