// ==========================================
// GSE 数据集生成器 - 阶段编排器
// ==========================================
// 用途: 按依赖顺序执行五个生成阶段
// 参考目录 → 航班 → 航班需求 → 站位库存 → 调拨
// 每个阶段从数据集目录读取上游文件, 写出本阶段文件 (先写临时文件再原子替换)
// ==========================================

use crate::config::GeneratorConfig;
use crate::domain::{Flight, FlightDemand, StationStock};
use crate::engine::demand_generator::DemandGenerator;
use crate::engine::error::EngineResult;
use crate::engine::flight_generator::FlightGenerator;
use crate::engine::lookup::Catalog;
use crate::engine::reference::build_reference_tables;
use crate::engine::replenishment_matcher::ReplenishmentMatcher;
use crate::engine::sampling::stage_rng;
use crate::engine::stock_aggregator::StockAggregator;
use crate::repository::TableStore;
use rand::rngs::StdRng;
use std::fmt;
use std::time::Instant;
use tracing::{info, instrument};

// ==========================================
// Stage - 生成阶段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum Stage {
    Reference,
    Flights,
    Demand,
    Stock,
    Replenishment,
}

impl Stage {
    /// 依赖顺序
    pub const ALL: [Stage; 5] = [
        Stage::Reference,
        Stage::Flights,
        Stage::Demand,
        Stage::Stock,
        Stage::Replenishment,
    ];

    /// 阶段序号 (用于派生阶段随机源)
    pub fn ordinal(&self) -> u64 {
        match self {
            Stage::Reference => 0,
            Stage::Flights => 1,
            Stage::Demand => 2,
            Stage::Stock => 3,
            Stage::Replenishment => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Reference => "reference",
            Stage::Flights => "flights",
            Stage::Demand => "demand",
            Stage::Stock => "stock",
            Stage::Replenishment => "replenishment",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 阶段执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub rows: usize,
    pub elapsed_ms: u128,
}

// ==========================================
// PipelineOrchestrator - 阶段编排器
// ==========================================
pub struct PipelineOrchestrator {
    config: GeneratorConfig,
    store: TableStore,
}

impl PipelineOrchestrator {
    /// 创建编排器
    ///
    /// 配置在任何阶段运行前校验
    pub fn new(config: GeneratorConfig) -> EngineResult<Self> {
        config.validate()?;
        let store = TableStore::new(&config.output_dir);
        Ok(Self { config, store })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn store(&self) -> &TableStore {
        &self.store
    }

    /// 按依赖顺序执行全部阶段, 任一阶段失败即停止
    #[instrument(skip(self), fields(seed = self.config.seed, out_dir = %self.store.root().display()))]
    pub fn run_all(&self) -> EngineResult<Vec<StageReport>> {
        let started = Instant::now();
        let mut reports = Vec::with_capacity(Stage::ALL.len());
        for stage in Stage::ALL {
            reports.push(self.run_stage(stage)?);
        }

        let total_rows: usize = reports.iter().map(|r| r.rows).sum();
        info!(
            stages = reports.len(),
            total_rows,
            elapsed_ms = started.elapsed().as_millis(),
            "数据集生成完成"
        );
        Ok(reports)
    }

    /// 执行单个阶段 (上游文件须已存在)
    #[instrument(skip(self), fields(stage = %stage))]
    pub fn run_stage(&self, stage: Stage) -> EngineResult<StageReport> {
        let started = Instant::now();
        info!(stage = %stage, "阶段开始");

        let mut rng = stage_rng(self.config.seed, stage.ordinal());
        let rows = match stage {
            Stage::Reference => self.run_reference()?,
            Stage::Flights => self.run_flights(&mut rng)?,
            Stage::Demand => self.run_demand(&mut rng)?,
            Stage::Stock => self.run_stock()?,
            Stage::Replenishment => self.run_replenishment(&mut rng)?,
        };

        let report = StageReport {
            stage,
            rows,
            elapsed_ms: started.elapsed().as_millis(),
        };
        info!(stage = %stage, rows, elapsed_ms = report.elapsed_ms, "阶段完成");
        Ok(report)
    }

    // ==========================================
    // 各阶段实现
    // ==========================================

    fn run_reference(&self) -> EngineResult<usize> {
        let tables = build_reference_tables(&self.config.calendar);
        Ok(self.store.save_reference(&tables)?)
    }

    fn run_flights(&self, rng: &mut StdRng) -> EngineResult<usize> {
        let tables = self.store.load_reference()?;
        let catalog = Catalog::new(&tables);

        let generator = FlightGenerator::new(&self.config.flights, &catalog)?;
        let flights = generator.generate(rng)?;
        Ok(self.store.write_all(&flights)?)
    }

    fn run_demand(&self, rng: &mut StdRng) -> EngineResult<usize> {
        let tables = self.store.load_reference()?;
        let catalog = Catalog::new(&tables);
        let flights: Vec<Flight> = self.store.read_all()?;

        let generator = DemandGenerator::new(&self.config.demand, &catalog)?;
        let demand = generator.generate(&flights, rng)?;
        Ok(self.store.write_all(&demand)?)
    }

    fn run_stock(&self) -> EngineResult<usize> {
        let tables = self.store.load_reference()?;
        let catalog = Catalog::new(&tables);
        let demand: Vec<FlightDemand> = self.store.read_all()?;

        let aggregator = StockAggregator::new(&self.config.stock, &catalog);
        let stock = aggregator.aggregate(&demand)?;
        Ok(self.store.write_all(&stock)?)
    }

    fn run_replenishment(&self, rng: &mut StdRng) -> EngineResult<usize> {
        let tables = self.store.load_reference()?;
        let catalog = Catalog::new(&tables);
        let stock: Vec<StationStock> = self.store.read_all()?;

        let matcher = ReplenishmentMatcher::new(&self.config.replenishment, &catalog);
        let moves = matcher.match_all(&stock, rng)?;
        Ok(self.store.write_all(&moves)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::engine::error::EngineError;

    #[test]
    fn test_stage_order_and_ordinals() {
        let ordinals: Vec<u64> = Stage::ALL.iter().map(|s| s.ordinal()).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3, 4]);
        assert!(Stage::ALL.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Stage::Replenishment.to_string(), "replenishment");
    }

    #[test]
    fn test_invalid_config_rejected_before_run() {
        let mut config = GeneratorConfig::default();
        config.flights.flights_per_day.min = 90;

        let err = PipelineOrchestrator::new(config).err().unwrap();
        assert!(matches!(err, EngineError::Config(ConfigError::ValueError { .. })));
    }
}
