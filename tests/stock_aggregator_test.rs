// ==========================================
// StockAggregator 引擎集成测试
// ==========================================
// 测试目标: 验证站位库存稠密聚合
// 覆盖范围: 行数、容量计算恒等式、需求汇总、设备排除、零容量站位
// ==========================================

mod test_helpers;

use gse_datagen::config::{DemandConfig, StockConfig};
use gse_datagen::domain::types::{DemandCalcMethod, RiskLevel};
use gse_datagen::domain::{FlightDemand, StationStock};
use gse_datagen::engine::sampling::stage_rng;
use gse_datagen::engine::{Catalog, DemandGenerator, EngineError, FlightGenerator, StockAggregator};
use test_helpers::{date, small_config, small_reference};

fn demand_row(station_id: u32, equipment_id: u32, period_id: u32, qty: u32) -> FlightDemand {
    FlightDemand {
        demand_id: 1,
        flight_id: 1,
        date: date(2025, 3, 2),
        arrival_slot_id: 100,
        period_id,
        station_id,
        equipment_id,
        qty_required: qty,
        qty_allocated: qty,
        shortage_qty: 0,
        pickup_slot_id: 95,
        return_slot_id: 109,
        allocation_distance_km: 1.0,
        demand_calc_method: DemandCalcMethod::Estimated,
        risk_level: RiskLevel::Ok,
        sla_compliant: true,
        is_active: true,
    }
}

fn aggregate(demand: &[FlightDemand]) -> Vec<StationStock> {
    let tables = small_reference();
    let catalog = Catalog::new(&tables);
    let config = StockConfig::default();
    StockAggregator::new(&config, &catalog)
        .aggregate(demand)
        .unwrap()
}

fn find(stock: &[StationStock], station_id: u32, equipment_id: u32, period_id: u32) -> &StationStock {
    stock
        .iter()
        .find(|s| {
            s.date == date(2025, 3, 2)
                && s.station_id == station_id
                && s.equipment_id == equipment_id
                && s.period_id == period_id
        })
        .unwrap()
}

#[test]
fn test_dense_cross_product() {
    let stock = aggregate(&[]);

    // 7 天 × 4 时段 × 10 站位 × 5 设备 (不含 40FT)
    assert_eq!(stock.len(), 7 * 4 * 10 * 5);
    assert!(stock.iter().all(|s| s.equipment_id != 5));
    assert!(stock.iter().all(|s| s.scenario_id == 1));
    assert!(stock.iter().all(|s| s.demand_qty == 0));

    // 非存放站位 678 仍在表中, 容量为 0
    let stand_678: Vec<_> = stock.iter().filter(|s| s.station_id == 2).collect();
    assert_eq!(stand_678.len(), 7 * 4 * 5);
    assert!(stand_678.iter().all(|s| s.capacity == 0 && s.utilization_pct == 0.0));
}

#[test]
fn test_overloaded_cell_example() {
    // 站位 621 的 26-O 容量为 20
    let stock = aggregate(&[demand_row(5, 4, 3, 25)]);
    let cell = find(&stock, 5, 4, 3);

    assert_eq!(cell.capacity, 20);
    assert_eq!(cell.reserved_outbound, 10);
    assert_eq!(cell.available_inbound, 10);
    assert_eq!(cell.demand_qty, 25);
    assert_eq!(cell.allocated_qty, 10);
    assert_eq!(cell.shortage_qty, -15);
    assert_eq!(cell.surplus_qty, 0);
    assert_eq!(cell.utilization_pct, 150.0);
    assert!(cell.bottleneck_flag);
}

#[test]
fn test_demand_summed_per_cell() {
    let stock = aggregate(&[
        demand_row(10, 2, 1, 6),
        demand_row(10, 2, 1, 7),
        demand_row(10, 2, 2, 3),
    ]);

    assert_eq!(find(&stock, 10, 2, 1).demand_qty, 13);
    assert_eq!(find(&stock, 10, 2, 2).demand_qty, 3);
    assert_eq!(find(&stock, 10, 2, 3).demand_qty, 0);
}

#[test]
fn test_cell_identities_on_generated_demand() {
    let tables = small_reference();
    let catalog = Catalog::new(&tables);
    let config = small_config(std::path::Path::new("unused"));

    let flights = FlightGenerator::new(&config.flights, &catalog)
        .unwrap()
        .generate(&mut stage_rng(42, 1))
        .unwrap();
    let demand_config = DemandConfig::default();
    let demand = DemandGenerator::new(&demand_config, &catalog)
        .unwrap()
        .generate(&flights, &mut stage_rng(42, 2))
        .unwrap();
    let stock = StockAggregator::new(&config.stock, &catalog)
        .aggregate(&demand)
        .unwrap();

    let total_required: u32 = demand.iter().map(|d| d.qty_required).sum();
    let total_stock_demand: u32 = stock.iter().map(|s| s.demand_qty).sum();
    assert_eq!(total_required, total_stock_demand);

    for cell in &stock {
        let gap = cell.available_inbound as i32 - cell.demand_qty as i32;
        assert_eq!(cell.reserved_outbound, cell.capacity / 2);
        assert_eq!(cell.allocated_qty, cell.demand_qty.min(cell.available_inbound));
        assert_eq!(cell.shortage_qty + cell.surplus_qty, gap);
        assert!(cell.shortage_qty == 0 || cell.surplus_qty == 0);
        assert!(cell.utilization_pct <= 150.0);
        assert_eq!(cell.bottleneck_flag, cell.utilization_pct > 100.0);
    }

    for (idx, cell) in stock.iter().enumerate() {
        assert_eq!(cell.stock_id as usize, idx + 1);
    }
    assert!(stock.windows(2).all(|w| {
        (w[0].date, w[0].period_id, w[0].station_id, w[0].equipment_id)
            < (w[1].date, w[1].period_id, w[1].station_id, w[1].equipment_id)
    }));
}

#[test]
fn test_unknown_station_in_demand_rejected() {
    let tables = small_reference();
    let catalog = Catalog::new(&tables);
    let config = StockConfig::default();

    let err = StockAggregator::new(&config, &catalog)
        .aggregate(&[demand_row(42, 2, 1, 3)])
        .unwrap_err();
    assert!(matches!(err, EngineError::ReferenceDataMissing { .. }));
}

#[test]
fn test_demand_date_outside_calendar_rejected() {
    let mut row = demand_row(5, 4, 3, 2);
    row.date = date(2026, 3, 2);

    let tables = small_reference();
    let catalog = Catalog::new(&tables);
    let config = StockConfig::default();
    let err = StockAggregator::new(&config, &catalog)
        .aggregate(&[row])
        .unwrap_err();

    match err {
        EngineError::ReferenceDataMissing { entity, key } => {
            assert_eq!(entity, "calendar");
            assert_eq!(key, "20260302");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
