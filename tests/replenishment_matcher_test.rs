// ==========================================
// ReplenishmentMatcher 引擎集成测试
// ==========================================
// 测试目标: 验证缺口/富余贪心匹配
// 覆盖范围: 数量约束、站位不自调、排序、状态与触发原因抽签、距离并列取小 id
// ==========================================

mod test_helpers;

use gse_datagen::config::{DemandConfig, ReplenishmentConfig};
use gse_datagen::domain::types::{Priority, ReplenishmentStatus, TriggerReason};
use gse_datagen::domain::{Replenishment, StationStock};
use gse_datagen::engine::sampling::stage_rng;
use gse_datagen::engine::{
    Catalog, DemandGenerator, FlightGenerator, ReplenishmentMatcher, StockAggregator,
};
use std::collections::BTreeMap;
use test_helpers::{date, small_config, small_reference};

/// 生成小规模库存表 (宽体需求集中, 缺口足够多)
fn generated_stock(seed: u64) -> Vec<StationStock> {
    let tables = small_reference();
    let catalog = Catalog::new(&tables);
    let config = small_config(std::path::Path::new("unused"));

    let flights = FlightGenerator::new(&config.flights, &catalog)
        .unwrap()
        .generate(&mut stage_rng(seed, 1))
        .unwrap();
    let demand = DemandGenerator::new(&DemandConfig::default(), &catalog)
        .unwrap()
        .generate(&flights, &mut stage_rng(seed, 2))
        .unwrap();
    StockAggregator::new(&config.stock, &catalog)
        .aggregate(&demand)
        .unwrap()
}

fn run_matcher(stock: &[StationStock], config: &ReplenishmentConfig, seed: u64) -> Vec<Replenishment> {
    let tables = small_reference();
    let catalog = Catalog::new(&tables);
    ReplenishmentMatcher::new(config, &catalog)
        .match_all(stock, &mut stage_rng(seed, 4))
        .unwrap()
}

fn stock_cell(station_id: u32, gap: i32) -> StationStock {
    StationStock {
        stock_id: station_id,
        station_id,
        date: date(2025, 3, 4),
        period_id: 3,
        equipment_id: 4,
        scenario_id: 1,
        capacity: 40,
        reserved_outbound: 20,
        available_inbound: 20,
        demand_qty: (20 - gap).max(0) as u32,
        allocated_qty: 0,
        shortage_qty: gap.min(0),
        surplus_qty: gap.max(0),
        utilization_pct: 0.0,
        bottleneck_flag: false,
        is_active: true,
    }
}

#[test]
fn test_quantities_bounded_by_shortage_and_surplus() {
    let stock = generated_stock(42);
    let config = ReplenishmentConfig {
        match_probability: 1.0,
        ..ReplenishmentConfig::default()
    };
    let moves = run_matcher(&stock, &config, 42);
    assert!(!moves.is_empty());

    let cells: BTreeMap<_, &StationStock> = stock
        .iter()
        .map(|s| ((s.date, s.period_id, s.equipment_id, s.station_id), s))
        .collect();

    let mut shipped: BTreeMap<_, i32> = BTreeMap::new();
    let mut received: BTreeMap<_, i32> = BTreeMap::new();
    for m in &moves {
        assert_ne!(m.from_station_id, m.to_station_id);
        assert!(m.qty_to_move > 0);
        assert!((2..=15).contains(&m.estimated_time_min));

        let to = cells[&(m.date, m.before_period_id, m.equipment_id, m.to_station_id)];
        assert!(to.shortage_qty < 0);
        assert!(m.qty_to_move as i32 <= to.shortage_qty.abs());
        assert_eq!(m.priority, Priority::from_shortage(to.shortage_qty));

        *shipped
            .entry((m.date, m.before_period_id, m.equipment_id, m.from_station_id))
            .or_default() += m.qty_to_move as i32;
        *received
            .entry((m.date, m.before_period_id, m.equipment_id, m.to_station_id))
            .or_default() += m.qty_to_move as i32;
    }

    for (key, qty) in shipped {
        assert!(qty <= cells[&key].surplus_qty, "富余站位超量调出: {:?}", key);
    }
    for (key, qty) in received {
        assert!(qty <= cells[&key].shortage_qty.abs());
    }
}

#[test]
fn test_sorted_by_date_period_priority() {
    let stock = generated_stock(7);
    let config = ReplenishmentConfig {
        match_probability: 1.0,
        ..ReplenishmentConfig::default()
    };
    let moves = run_matcher(&stock, &config, 7);

    for (idx, m) in moves.iter().enumerate() {
        assert_eq!(m.replenishment_id as usize, idx + 1);
    }
    assert!(moves.windows(2).all(|w| {
        (w[0].date, w[0].before_period_id, w[0].priority.rank())
            <= (w[1].date, w[1].before_period_id, w[1].priority.rank())
    }));
}

#[test]
fn test_status_after_reference_date_is_recommended() {
    let stock = generated_stock(3);
    let config = ReplenishmentConfig {
        match_probability: 1.0,
        reference_date: date(2025, 3, 2),
        completed_probability: 1.0,
        approved_probability: 0.0,
        ..ReplenishmentConfig::default()
    };
    let moves = run_matcher(&stock, &config, 3);

    let (after, before): (Vec<_>, Vec<_>) =
        moves.iter().partition(|m| m.date >= date(2025, 3, 2));
    assert!(!after.is_empty());
    assert!(!before.is_empty());
    assert!(after.iter().all(|m| m.status == ReplenishmentStatus::Recommended));
    assert!(before.iter().all(|m| m.status == ReplenishmentStatus::Completed));
}

/// 参考日期晚于整个窗口: 全部调拨按状态概率抽签
fn statuses_with(completed: f64, approved: f64) -> Vec<ReplenishmentStatus> {
    let stock = generated_stock(42);
    let config = ReplenishmentConfig {
        match_probability: 1.0,
        reference_date: date(2025, 6, 1),
        completed_probability: completed,
        approved_probability: approved,
        ..ReplenishmentConfig::default()
    };
    let moves = run_matcher(&stock, &config, 42);
    assert!(!moves.is_empty());
    moves.iter().map(|m| m.status).collect()
}

#[test]
fn test_status_drawn_before_reference_date() {
    let statuses = statuses_with(1.0, 0.0);
    assert!(statuses.iter().all(|s| *s == ReplenishmentStatus::Completed));

    let statuses = statuses_with(0.0, 1.0);
    assert!(statuses.iter().all(|s| *s == ReplenishmentStatus::Approved));

    let statuses = statuses_with(0.0, 0.0);
    assert!(statuses.iter().all(|s| *s == ReplenishmentStatus::Recommended));

    // 混合比例下三种状态均出现
    let statuses = statuses_with(0.4, 0.4);
    assert!(statuses.len() >= 10);
    assert!(statuses.contains(&ReplenishmentStatus::Completed));
    assert!(statuses.contains(&ReplenishmentStatus::Approved));
    assert!(statuses.contains(&ReplenishmentStatus::Recommended));
}

#[test]
fn test_trigger_reason_follows_probabilities() {
    let stock = generated_stock(42);
    let reasons_with = |shortage: f64, balance: f64| -> Vec<TriggerReason> {
        let config = ReplenishmentConfig {
            match_probability: 1.0,
            shortage_reason_probability: shortage,
            balance_reason_probability: balance,
            ..ReplenishmentConfig::default()
        };
        let moves = run_matcher(&stock, &config, 42);
        assert!(!moves.is_empty());
        moves.iter().map(|m| m.trigger_reason).collect()
    };

    assert!(reasons_with(1.0, 0.0).iter().all(|r| *r == TriggerReason::Shortage));
    assert!(reasons_with(0.0, 1.0).iter().all(|r| *r == TriggerReason::Balance));
    assert!(reasons_with(0.0, 0.0).iter().all(|r| *r == TriggerReason::Preventive));
}

#[test]
fn test_equal_distance_prefers_lower_station_id() {
    // 625 (25,12) 与 641 (41,14) 到 632 (32,15) 的距离均约 0.3 公里
    let stock = vec![stock_cell(7, -2), stock_cell(8, 6), stock_cell(6, 6)];
    let config = ReplenishmentConfig {
        match_probability: 1.0,
        ..ReplenishmentConfig::default()
    };
    let moves = run_matcher(&stock, &config, 1);

    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].from_station_id, 6);
    assert_eq!(moves[0].distance_km, 0.3);
    assert_eq!(moves[0].qty_to_move, 2);
    assert_eq!(moves[0].priority, Priority::Medium);
}

#[test]
fn test_same_seed_same_moves() {
    let stock = generated_stock(42);
    let config = ReplenishmentConfig::default();

    let a = run_matcher(&stock, &config, 42);
    let b = run_matcher(&stock, &config, 42);
    assert_eq!(a, b);
}
