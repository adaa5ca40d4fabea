// ==========================================
// GSE 数据集生成器 - 配置层
// ==========================================
// 职责: 生成参数的加载、默认值与校验
// 存储: JSON 配置文件 (可选, 缺省即默认值)
// ==========================================

pub mod generator_config;

// 重导出核心配置类型
pub use generator_config::{
    ConfigError, ConfigResult, CountRange, DateWindow, DemandConfig, FlightConfig, FloatRange,
    GeneratorConfig, PeriodWeight, ReplenishmentConfig, StockConfig,
};
