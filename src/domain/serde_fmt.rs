// ==========================================
// GSE 数据集生成器 - CSV 字段格式
// ==========================================
// 布尔值: 字面量 TRUE/FALSE
// 小数: 固定一位小数
// 日期: YYYYMMDD 整数键
// 时刻: HH:MM:SS
// ==========================================

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

/// 四舍五入到一位小数
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 日期 → YYYYMMDD 整数键
pub fn to_date_key(date: NaiveDate) -> u32 {
    date.year() as u32 * 10_000 + date.month() * 100 + date.day()
}

/// YYYYMMDD 整数键 → 日期
pub fn from_date_key(key: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt((key / 10_000) as i32, (key / 100) % 100, key % 100)
}

pub mod bool_flag {
    use super::*;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "TRUE" } else { "FALSE" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_uppercase().as_str() {
            "TRUE" => Ok(true),
            "FALSE" => Ok(false),
            other => Err(D::Error::custom(format!("无效的布尔标记: {}", other))),
        }
    }
}

pub mod one_decimal {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:.1}", value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.trim()
            .parse::<f64>()
            .map_err(|e| D::Error::custom(format!("无效的小数 {}: {}", raw, e)))
    }
}

pub mod date_key {
    use super::*;

    pub fn serialize<S: Serializer>(value: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(to_date_key(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let key = u32::deserialize(deserializer)?;
        from_date_key(key).ok_or_else(|| D::Error::custom(format!("无效的日期键: {}", key)))
    }
}

pub mod clock_time {
    use super::*;

    const FORMAT: &str = "%H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT)
            .map_err(|e| D::Error::custom(format!("无效的时刻 {}: {}", raw, e)))
    }
}
