// ==========================================
// GSE 数据集生成器 - 航班设备需求引擎
// ==========================================
// 输入: 航班表 + 参考目录 + 需求配置
// 输出: 每个航班 2 行 (窄体) 或 3 行 (宽体) 设备需求
// 红线: qty_allocated ≤ qty_required, 取还时间槽回绕到 [1, 288]
// ==========================================

use crate::config::DemandConfig;
use crate::domain::serde_fmt::round1;
use crate::domain::types::{AircraftCategory, DemandCalcMethod, EquipmentCode, RiskLevel};
use crate::domain::{Aircraft, Flight, FlightDemand, Station};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::lookup::Catalog;
use crate::engine::sampling::{uniform_count, uniform_float, wrap_slot};
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{info, instrument, warn};

// ==========================================
// 需求规则表
// ==========================================

/// 需求驱动量
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DemandDriver {
    /// ceil(uld × uld_factor) + (有货量 ? ceil(kg / kg_per_unit) : default_cargo_units)
    PalletLoad {
        uld_factor: f64,
        kg_per_unit: f64,
        default_cargo_units: u32,
    },
    /// ceil(uld × uld_factor)
    ContainerLoad { uld_factor: f64 },
    /// ceil(bags / bags_per_unit)
    Baggage { bags_per_unit: f64 },
}

/// 单类设备的需求规则: clamp(lower, upper, driver)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandRule {
    pub equipment: EquipmentCode,
    pub lower: u32,
    pub upper: u32,
    pub driver: DemandDriver,
}

impl DemandRule {
    /// 需求数量
    pub fn required_qty(&self, aircraft: &Aircraft, flight: &Flight) -> u32 {
        let raw = match self.driver {
            DemandDriver::PalletLoad {
                uld_factor,
                kg_per_unit,
                default_cargo_units,
            } => {
                let pallets = (aircraft.uld_positions as f64 * uld_factor).ceil() as u32;
                let cargo = if flight.has_cargo_data {
                    (flight.cargo_kg / kg_per_unit).ceil() as u32
                } else {
                    default_cargo_units
                };
                pallets + cargo
            }
            DemandDriver::ContainerLoad { uld_factor } => {
                (aircraft.uld_positions as f64 * uld_factor).ceil() as u32
            }
            DemandDriver::Baggage { bags_per_unit } => {
                (flight.estimated_bags as f64 / bags_per_unit).ceil() as u32
            }
        };
        raw.clamp(self.lower, self.upper)
    }
}

pub const WIDEBODY_RULES: [DemandRule; 3] = [
    DemandRule {
        equipment: EquipmentCode::P14,
        lower: 4,
        upper: 12,
        driver: DemandDriver::PalletLoad {
            uld_factor: 0.6,
            kg_per_unit: 3000.0,
            default_cargo_units: 2,
        },
    },
    DemandRule {
        equipment: EquipmentCode::O26,
        lower: 8,
        upper: 22,
        driver: DemandDriver::Baggage { bags_per_unit: 30.0 },
    },
    DemandRule {
        equipment: EquipmentCode::C26,
        lower: 4,
        upper: 11,
        driver: DemandDriver::Baggage { bags_per_unit: 60.0 },
    },
];

pub const NARROWBODY_RULES: [DemandRule; 2] = [
    DemandRule {
        equipment: EquipmentCode::C13,
        lower: 3,
        upper: 8,
        driver: DemandDriver::ContainerLoad { uld_factor: 0.8 },
    },
    DemandRule {
        equipment: EquipmentCode::O26,
        lower: 4,
        upper: 8,
        driver: DemandDriver::Baggage { bags_per_unit: 35.0 },
    },
];

pub fn demand_rules(category: AircraftCategory) -> &'static [DemandRule] {
    match category {
        AircraftCategory::Widebody => &WIDEBODY_RULES,
        AircraftCategory::Narrowbody => &NARROWBODY_RULES,
    }
}

/// 各机型类别的优先站位 (机位号)
pub fn preferred_stands(category: AircraftCategory) -> [&'static str; 3] {
    match category {
        AircraftCategory::Widebody => ["632", "641", "647"],
        AircraftCategory::Narrowbody => ["661", "668", "699"],
    }
}

// ==========================================
// DemandGenerator - 需求生成引擎
// ==========================================
pub struct DemandGenerator<'a> {
    config: &'a DemandConfig,
    catalog: &'a Catalog<'a>,
    widebody_stations: Vec<&'a Station>,
    narrowbody_stations: Vec<&'a Station>,
    storage_stations: Vec<&'a Station>,
    widebody_equipment: Vec<u32>,
    narrowbody_equipment: Vec<u32>,
}

impl<'a> DemandGenerator<'a> {
    /// 创建需求生成引擎
    ///
    /// 站位池与设备 id 在此解析, 缺失时直接报错
    pub fn new(config: &'a DemandConfig, catalog: &'a Catalog<'a>) -> EngineResult<Self> {
        let resolve_stands = |category| {
            preferred_stands(category)
                .iter()
                .map(|stand| catalog.station_by_stand(stand))
                .collect::<EngineResult<Vec<_>>>()
        };
        let resolve_equipment = |category| {
            demand_rules(category)
                .iter()
                .map(|rule| catalog.equipment_by_code(rule.equipment).map(|e| e.equipment_id))
                .collect::<EngineResult<Vec<_>>>()
        };

        let storage_stations: Vec<&Station> =
            catalog.stations().filter(|s| s.is_storage_location).collect();
        if storage_stations.is_empty() {
            return Err(EngineError::missing("station", "is_storage_location"));
        }

        Ok(Self {
            config,
            catalog,
            widebody_stations: resolve_stands(AircraftCategory::Widebody)?,
            narrowbody_stations: resolve_stands(AircraftCategory::Narrowbody)?,
            storage_stations,
            widebody_equipment: resolve_equipment(AircraftCategory::Widebody)?,
            narrowbody_equipment: resolve_equipment(AircraftCategory::Narrowbody)?,
        })
    }

    /// 为全部航班生成需求行
    #[instrument(skip(self, flights, rng), fields(flights = flights.len()))]
    pub fn generate<R: Rng + ?Sized>(
        &self,
        flights: &[Flight],
        rng: &mut R,
    ) -> EngineResult<Vec<FlightDemand>> {
        let mut rows = Vec::with_capacity(flights.len() * 3);

        for flight in flights {
            let aircraft = self.catalog.aircraft(flight.aircraft_id)?;
            if aircraft.aircraft_category != flight.aircraft_category {
                warn!(
                    flight_id = flight.flight_id,
                    aircraft_id = aircraft.aircraft_id,
                    "航班机型类别与机型目录不一致, 以机型目录为准"
                );
            }
            self.generate_for_flight(flight, aircraft, rng, &mut rows)?;
        }

        rows.sort_by_key(|d| (d.date, d.arrival_slot_id, d.flight_id));
        for (row, id) in rows.iter_mut().zip(1u32..) {
            row.demand_id = id;
        }

        let short_rows = rows.iter().filter(|d| d.shortage_qty < 0).count();
        let high_risk = rows
            .iter()
            .filter(|d| d.risk_level == RiskLevel::High)
            .count();
        let sla_breaches = rows.iter().filter(|d| !d.sla_compliant).count();
        info!(
            rows = rows.len(),
            short_rows, high_risk, sla_breaches, "航班需求生成完成"
        );

        Ok(rows)
    }

    /// 单个航班的需求行 (站位与取还时间槽整航班共用)
    fn generate_for_flight<R: Rng + ?Sized>(
        &self,
        flight: &Flight,
        aircraft: &Aircraft,
        rng: &mut R,
        out: &mut Vec<FlightDemand>,
    ) -> EngineResult<()> {
        let category = aircraft.aircraft_category;
        let period_id = self.catalog.period_of_slot(flight.arrival_slot_id)?;
        let station = self.assign_station(rng, category)?;

        let arrival = flight.arrival_slot_id as i64;
        let pickup_offset = uniform_count(rng, &self.config.pickup_offset_slots) as i64;
        let pickup_slot_id = wrap_slot(arrival - pickup_offset);
        let return_slot_id = wrap_slot(arrival + self.config.return_offset_slots as i64);

        let demand_calc_method = if flight.has_cargo_data {
            DemandCalcMethod::CargoBased
        } else {
            DemandCalcMethod::Estimated
        };

        let equipment_ids = match category {
            AircraftCategory::Widebody => &self.widebody_equipment,
            AircraftCategory::Narrowbody => &self.narrowbody_equipment,
        };

        for (rule, &equipment_id) in demand_rules(category).iter().zip(equipment_ids) {
            let qty_required = rule.required_qty(aircraft, flight);
            let qty_allocated = self.allocate(rng, qty_required);
            let shortage_qty = qty_allocated as i32 - qty_required as i32;
            let allocation_distance_km =
                round1(uniform_float(rng, &self.config.allocation_distance_km));

            out.push(FlightDemand {
                demand_id: 0,
                flight_id: flight.flight_id,
                date: flight.date,
                arrival_slot_id: flight.arrival_slot_id,
                period_id,
                station_id: station.station_id,
                equipment_id,
                qty_required,
                qty_allocated,
                shortage_qty,
                pickup_slot_id,
                return_slot_id,
                allocation_distance_km,
                demand_calc_method,
                risk_level: RiskLevel::from_shortage(shortage_qty),
                sla_compliant: shortage_qty >= -1,
                is_active: true,
            });
        }
        Ok(())
    }

    /// 模拟分配: 足额 / 小缺口 / 大缺口, 下限 0
    pub fn allocate<R: Rng + ?Sized>(&self, rng: &mut R, qty_required: u32) -> u32 {
        let r: f64 = rng.random();
        let shortfall = if r < self.config.full_allocation_probability {
            0
        } else if r < self.config.full_allocation_probability + self.config.minor_shortage_probability
        {
            uniform_count(rng, &self.config.minor_shortage)
        } else {
            uniform_count(rng, &self.config.major_shortage)
        };
        qty_required.saturating_sub(shortfall)
    }

    fn assign_station<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        category: AircraftCategory,
    ) -> EngineResult<&'a Station> {
        let pool = if rng.random::<f64>() < self.config.preferred_station_probability {
            match category {
                AircraftCategory::Widebody => &self.widebody_stations,
                AircraftCategory::Narrowbody => &self.narrowbody_stations,
            }
        } else {
            &self.storage_stations
        };
        pool.choose(rng)
            .copied()
            .ok_or_else(|| EngineError::missing("station", category))
    }
}
