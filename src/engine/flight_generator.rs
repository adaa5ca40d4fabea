// ==========================================
// GSE 数据集生成器 - 航班生成引擎
// ==========================================
// 输入: 机型 / 高峰时段 参考目录 + 航班配置
// 输出: 按 (日期, 到港时刻) 排序的航班表, id 从 1 连续编号
// 红线: 航班号在 (航司, 日期) 内唯一, 拒绝采样有上限
// ==========================================

use crate::config::{ConfigError, FlightConfig};
use crate::domain::serde_fmt::round1;
use crate::domain::types::AircraftCategory;
use crate::domain::{Aircraft, Flight, PeakPeriod};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::lookup::Catalog;
use crate::engine::sampling::{slot_of, uniform_count, uniform_float, SLOT_MINUTES};
use chrono::{NaiveDate, NaiveTime};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument};

// ==========================================
// 航司与始发地
// ==========================================

/// 航司 (代码, 名称, 抽样权重)
#[derive(Debug, Clone, Copy)]
pub struct Airline {
    pub code: &'static str,
    pub name: &'static str,
    pub weight: f64,
}

const fn airline(code: &'static str, name: &'static str, weight: f64) -> Airline {
    Airline { code, name, weight }
}

/// 航司权重按营收占比
pub const AIRLINES: [Airline; 22] = [
    airline("EY", "Etihad Airways", 62.36),
    airline("G9", "Air Arabia Abu Dhabi", 8.79),
    airline("W6", "Wizz Air Abu Dhabi", 7.99),
    airline("6E", "IndiGo", 5.53),
    airline("IX", "Air India Express", 2.98),
    airline("QR", "Qatar Airways", 1.99),
    airline("PK", "Pakistan International Airlines", 1.27),
    airline("QP", "Akasa Air", 1.27),
    airline("SV", "Saudi Arabian Airlines", 0.96),
    airline("MS", "EgyptAir", 0.75),
    airline("XY", "flynas", 0.71),
    airline("GF", "Gulf Air", 0.65),
    airline("O3", "SF Airlines", 0.62),
    airline("RJ", "Royal Jordanian", 0.59),
    airline("TK", "Turkish Airlines", 0.59),
    airline("SU", "Aeroflot", 0.56),
    airline("FC", "Florida Coastal Airlines", 0.50),
    airline("BG", "Biman Bangladesh Airlines", 0.44),
    airline("AI", "Air India", 0.37),
    airline("UL", "SriLankan Airlines", 0.37),
    airline("ME", "Middle East Airlines", 0.34),
    airline("BS", "British International Helicopters", 0.34),
];

pub const ORIGIN_AIRPORTS: [&str; 15] = [
    "LHR", "CDG", "FRA", "SIN", "HKG", "BKK", "JFK", "DEL", "MUM", "CAI", "JNB", "NRT", "ICN",
    "DXB", "KWI",
];

/// 短程窄体池 (A321 / A320)
const SHORT_HAUL_SERIES: [&str; 2] = ["A321", "A320"];

// ==========================================
// 机型选择规则
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AircraftPool {
    Widebody,   // 全部宽体
    Narrowbody, // 全部窄体
    ShortHaul,  // A321 / A320
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AircraftRule {
    /// 固定机型池, 不抽签
    Fixed(AircraftPool),
    /// 以 probability 选 primary, 否则 secondary
    Split {
        probability: f64,
        primary: AircraftPool,
        secondary: AircraftPool,
    },
}

/// 按航司代码查机型规则
pub fn aircraft_rule(airline_code: &str) -> AircraftRule {
    match airline_code {
        "EY" => AircraftRule::Split {
            probability: 0.60,
            primary: AircraftPool::Widebody,
            secondary: AircraftPool::ShortHaul,
        },
        "G9" | "W6" | "6E" | "QP" => AircraftRule::Fixed(AircraftPool::ShortHaul),
        "QR" => AircraftRule::Split {
            probability: 0.80,
            primary: AircraftPool::Widebody,
            secondary: AircraftPool::Narrowbody,
        },
        _ => AircraftRule::Split {
            probability: 0.50,
            primary: AircraftPool::Widebody,
            secondary: AircraftPool::Narrowbody,
        },
    }
}

struct AircraftPools<'a> {
    widebody: Vec<&'a Aircraft>,
    narrowbody: Vec<&'a Aircraft>,
    short_haul: Vec<&'a Aircraft>,
}

impl<'a> AircraftPools<'a> {
    fn resolve(catalog: &Catalog<'a>) -> EngineResult<Self> {
        let pools = Self {
            widebody: catalog.aircraft_in_category(AircraftCategory::Widebody),
            narrowbody: catalog.aircraft_in_category(AircraftCategory::Narrowbody),
            short_haul: SHORT_HAUL_SERIES
                .iter()
                .map(|series| catalog.aircraft_by_series(series))
                .collect::<EngineResult<Vec<_>>>()?,
        };
        if pools.widebody.is_empty() {
            return Err(EngineError::missing("aircraft", AircraftCategory::Widebody));
        }
        if pools.narrowbody.is_empty() {
            return Err(EngineError::missing("aircraft", AircraftCategory::Narrowbody));
        }
        Ok(pools)
    }

    fn get(&self, pool: AircraftPool) -> &[&'a Aircraft] {
        match pool {
            AircraftPool::Widebody => &self.widebody,
            AircraftPool::Narrowbody => &self.narrowbody,
            AircraftPool::ShortHaul => &self.short_haul,
        }
    }
}

// ==========================================
// FlightGenerator - 航班生成引擎
// ==========================================
pub struct FlightGenerator<'a> {
    config: &'a FlightConfig,
    airline_index: WeightedIndex<f64>,
    period_index: WeightedIndex<f64>,
    periods: Vec<&'a PeakPeriod>,
    pools: AircraftPools<'a>,
}

impl<'a> FlightGenerator<'a> {
    /// 创建航班生成引擎
    ///
    /// 权重分布与机型池在此一次构建, 缺少规则引用的机型或时段时报错
    pub fn new(config: &'a FlightConfig, catalog: &Catalog<'a>) -> EngineResult<Self> {
        let airline_index = WeightedIndex::new(AIRLINES.iter().map(|a| a.weight))
            .map_err(|e| weights_error("flights.airlines", e))?;
        let period_index = WeightedIndex::new(config.period_weights.iter().map(|w| w.weight))
            .map_err(|e| weights_error("flights.period_weights", e))?;
        let periods = config
            .period_weights
            .iter()
            .map(|w| catalog.peak_period(w.period_id))
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(Self {
            config,
            airline_index,
            period_index,
            periods,
            pools: AircraftPools::resolve(catalog)?,
        })
    }

    /// 生成日期窗口内全部航班
    #[instrument(skip(self, rng), fields(start = %self.config.window.start, end = %self.config.window.end))]
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> EngineResult<Vec<Flight>> {
        let mut flights = Vec::new();

        for date in self.config.window.days() {
            let count = uniform_count(rng, &self.config.flights_per_day);
            let mut used_numbers: BTreeMap<&'static str, BTreeSet<u32>> = BTreeMap::new();

            for _ in 0..count {
                let airline = AIRLINES[self.airline_index.sample(rng)];
                let used = used_numbers.entry(airline.code).or_default();
                let number = self.draw_flight_number(rng, airline.code, date, used)?;
                let aircraft = self.pick_aircraft(rng, airline.code)?;
                flights.push(self.build_flight(rng, &airline, number, aircraft, date)?);
            }
            debug!(date = %date, flights = count, "单日航班已生成");
        }

        // 稳定排序后重新编号
        flights.sort_by_key(|f| (f.date, f.arrival_time));
        for (flight, id) in flights.iter_mut().zip(1u32..) {
            flight.flight_id = id;
        }

        let widebody = flights
            .iter()
            .filter(|f| f.aircraft_category == AircraftCategory::Widebody)
            .count();
        let with_cargo = flights.iter().filter(|f| f.has_cargo_data).count();
        info!(
            flights = flights.len(),
            widebody,
            narrowbody = flights.len() - widebody,
            with_cargo,
            "航班生成完成"
        );

        Ok(flights)
    }

    // ==========================================
    // 单项采样
    // ==========================================

    /// 航班号拒绝采样 (有上限)
    fn draw_flight_number<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        airline_code: &str,
        date: NaiveDate,
        used: &mut BTreeSet<u32>,
    ) -> EngineResult<u32> {
        let attempts = self.config.max_flight_number_attempts;
        for _ in 0..attempts {
            let number = uniform_count(rng, &self.config.flight_number);
            if used.insert(number) {
                return Ok(number);
            }
        }
        Err(EngineError::GenerationExhausted {
            airline_code: airline_code.to_string(),
            date,
            attempts,
        })
    }

    fn pick_aircraft<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        airline_code: &str,
    ) -> EngineResult<&'a Aircraft> {
        let pool = match aircraft_rule(airline_code) {
            AircraftRule::Fixed(pool) => pool,
            AircraftRule::Split {
                probability,
                primary,
                secondary,
            } => {
                if rng.random::<f64>() < probability {
                    primary
                } else {
                    secondary
                }
            }
        };

        self.pools
            .get(pool)
            .choose(rng)
            .copied()
            .ok_or_else(|| EngineError::missing("aircraft", format!("{:?}", pool)))
    }

    /// 到港时刻: 先按权重选时段, 再在时段内均匀取小时, 分钟取 5 的倍数
    fn draw_arrival<R: Rng + ?Sized>(&self, rng: &mut R) -> (u32, u32) {
        let period = self.periods[self.period_index.sample(rng)];
        let (start, end) = (period.start_hour(), period.end_hour());

        let hour = if period.wraps_midnight() {
            if end == 0 || rng.random_bool(0.5) {
                rng.random_range(start..=23)
            } else {
                rng.random_range(0..end)
            }
        } else {
            rng.random_range(start..end.max(start + 1))
        };
        let minute = SLOT_MINUTES * rng.random_range(0..60 / SLOT_MINUTES);
        (hour, minute)
    }

    fn build_flight<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        airline: &Airline,
        number: u32,
        aircraft: &Aircraft,
        date: NaiveDate,
    ) -> EngineResult<Flight> {
        let (hour, minute) = self.draw_arrival(rng);
        let arrival_time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| EngineError::missing("time_slot", format!("{:02}:{:02}", hour, minute)))?;

        let origin = ORIGIN_AIRPORTS.choose(rng).copied().unwrap_or("DXB");

        // ===== 业务量估算 =====
        let load_factor = uniform_float(rng, &self.config.load_factor);
        let estimated_pax = (aircraft.typical_pax as f64 * load_factor) as u32;
        let bags_per_pax = uniform_float(rng, &self.config.bags_per_pax);
        let estimated_bags = (estimated_pax as f64 * bags_per_pax) as u32;

        let has_cargo_data = rng.random::<f64>() < self.config.cargo_data_probability;
        let cargo_kg = if has_cargo_data {
            let factor = uniform_float(rng, &self.config.cargo_factor);
            round1(aircraft.typical_cargo_kg as f64 * factor)
        } else {
            0.0
        };

        Ok(Flight {
            flight_id: 0,
            flight_number: format!("{}{}", airline.code, number),
            airline_code: airline.code.to_string(),
            airline_name: airline.name.to_string(),
            aircraft_id: aircraft.aircraft_id,
            aircraft_series: aircraft.aircraft_series.clone(),
            aircraft_category: aircraft.aircraft_category,
            origin_airport: origin.to_string(),
            date,
            arrival_time,
            arrival_slot_id: slot_of(hour, minute),
            estimated_pax,
            estimated_bags,
            cargo_kg,
            has_cargo_data,
            is_active: true,
        })
    }
}

fn weights_error(key: &'static str, err: rand::distr::weighted::Error) -> EngineError {
    EngineError::Config(ConfigError::ValueError {
        key,
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CountRange, DateWindow};
    use crate::engine::reference::build_reference_tables;
    use crate::engine::sampling::stage_rng;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn small_config() -> FlightConfig {
        FlightConfig {
            window: DateWindow::new(day(1), day(3)),
            flights_per_day: CountRange { min: 20, max: 25 },
            ..FlightConfig::default()
        }
    }

    #[test]
    fn test_aircraft_rules() {
        assert_eq!(aircraft_rule("G9"), AircraftRule::Fixed(AircraftPool::ShortHaul));
        assert_eq!(aircraft_rule("QP"), AircraftRule::Fixed(AircraftPool::ShortHaul));
        assert!(matches!(
            aircraft_rule("QR"),
            AircraftRule::Split { probability, .. } if probability == 0.80
        ));
        assert!(matches!(
            aircraft_rule("TK"),
            AircraftRule::Split { secondary: AircraftPool::Narrowbody, .. }
        ));
    }

    #[test]
    fn test_generate_sorted_and_renumbered() {
        let tables = build_reference_tables(&DateWindow::new(day(1), day(3)));
        let catalog = Catalog::new(&tables);
        let config = small_config();
        let generator = FlightGenerator::new(&config, &catalog).unwrap();

        let flights = generator.generate(&mut stage_rng(42, 1)).unwrap();
        assert!(flights.len() >= 60 && flights.len() <= 75);

        for (idx, flight) in flights.iter().enumerate() {
            assert_eq!(flight.flight_id as usize, idx + 1);
            assert!((1..=288).contains(&flight.arrival_slot_id));
        }
        assert!(flights
            .windows(2)
            .all(|w| (w[0].date, w[0].arrival_time) <= (w[1].date, w[1].arrival_time)));
    }

    #[test]
    fn test_pinned_airlines_fly_short_haul() {
        let tables = build_reference_tables(&DateWindow::new(day(1), day(3)));
        let catalog = Catalog::new(&tables);
        let config = small_config();
        let generator = FlightGenerator::new(&config, &catalog).unwrap();

        let flights = generator.generate(&mut stage_rng(7, 1)).unwrap();
        for flight in flights.iter().filter(|f| ["G9", "W6", "6E", "QP"].contains(&f.airline_code.as_str())) {
            assert!(SHORT_HAUL_SERIES.contains(&flight.aircraft_series.as_str()));
        }
    }

    #[test]
    fn test_flight_number_exhaustion() {
        let tables = build_reference_tables(&DateWindow::new(day(1), day(1)));
        let catalog = Catalog::new(&tables);
        let config = FlightConfig {
            window: DateWindow::new(day(1), day(1)),
            flights_per_day: CountRange { min: 40, max: 40 },
            flight_number: CountRange { min: 100, max: 101 },
            max_flight_number_attempts: 50,
            ..FlightConfig::default()
        };
        let generator = FlightGenerator::new(&config, &catalog).unwrap();

        let err = generator.generate(&mut stage_rng(42, 1)).unwrap_err();
        assert!(matches!(err, EngineError::GenerationExhausted { attempts: 50, .. }));
    }

    #[test]
    fn test_unknown_period_rejected() {
        let tables = build_reference_tables(&DateWindow::new(day(1), day(1)));
        let catalog = Catalog::new(&tables);
        let mut config = small_config();
        config.period_weights[0].period_id = 9;

        assert!(matches!(
            FlightGenerator::new(&config, &catalog),
            Err(EngineError::ReferenceDataMissing { .. })
        ));
    }
}
