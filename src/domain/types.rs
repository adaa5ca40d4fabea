// ==========================================
// GSE 数据集生成器 - 领域类型定义
// ==========================================
// 枚举值的序列化形式即 CSV 中的取值,下游分析模型按字面量匹配
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 机型类别 (Aircraft Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AircraftCategory {
    Widebody,   // 宽体机
    Narrowbody, // 窄体机
}

impl fmt::Display for AircraftCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AircraftCategory::Widebody => write!(f, "Widebody"),
            AircraftCategory::Narrowbody => write!(f, "Narrowbody"),
        }
    }
}

// ==========================================
// 设备适用机型 (Served Aircraft)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServedAircraft {
    Widebody,
    Narrowbody,
    All,
}

// ==========================================
// 设备大类 (Equipment Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentCategory {
    Dolly,   // 拖盘
    Trolley, // 行李车
}

// ==========================================
// 设备资产代码 (Equipment Code)
// ==========================================
// 站位容量按资产代码分列 (capacity_13c ... capacity_26c)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EquipmentCode {
    #[serde(rename = "13C")]
    C13, // LD3 集装箱拖盘
    #[serde(rename = "14P")]
    P14, // 10 英尺货盘拖盘
    #[serde(rename = "20FT")]
    Ft20, // 20 英尺货盘拖盘
    #[serde(rename = "26-O")]
    O26, // 敞开式行李车
    #[serde(rename = "40FT")]
    Ft40, // 40 英尺货盘拖盘
    #[serde(rename = "26-C")]
    C26, // 封闭式行李车
}

impl EquipmentCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentCode::C13 => "13C",
            EquipmentCode::P14 => "14P",
            EquipmentCode::Ft20 => "20FT",
            EquipmentCode::O26 => "26-O",
            EquipmentCode::Ft40 => "40FT",
            EquipmentCode::C26 => "26-C",
        }
    }
}

impl fmt::Display for EquipmentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 缺口风险等级 (Risk Level)
// ==========================================
// 顺序: Ok < Low < Medium < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Ok,     // 足额分配
    Low,    // 缺 1
    Medium, // 缺 2~3
    High,   // 缺 4 及以上
}

impl RiskLevel {
    /// 由缺口数量 (allocated - required, 恒 ≤ 0) 推导风险等级
    pub fn from_shortage(shortage_qty: i32) -> Self {
        match shortage_qty {
            q if q >= 0 => RiskLevel::Ok,
            -1 => RiskLevel::Low,
            -3..=-2 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Ok => write!(f, "OK"),
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

// ==========================================
// 需求测算方式 (Demand Calc Method)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandCalcMethod {
    #[serde(rename = "Cargo-based")]
    CargoBased, // 有实际货量数据
    Estimated,  // 按机型估算
}

// ==========================================
// 调拨优先级 (Replenishment Priority)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// 由目标站位缺口推导优先级
    pub fn from_shortage(shortage_qty: i32) -> Self {
        if shortage_qty <= -4 {
            Priority::High
        } else if shortage_qty <= -2 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    /// 排序秩: HIGH < MEDIUM < LOW
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "HIGH"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::Low => write!(f, "LOW"),
        }
    }
}

// ==========================================
// 调拨触发原因 (Trigger Reason)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerReason {
    Shortage,   // 缺口补充
    Balance,    // 均衡调配
    Preventive, // 预防性调拨
}

// ==========================================
// 调拨状态 (Replenishment Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReplenishmentStatus {
    Completed,   // 已完成
    Approved,    // 已批准
    Recommended, // 系统建议
}

// ==========================================
// 情景类型 (Scenario Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioType {
    Baseline,
    Capacity,
    Redistribution,
    Demand,
}
