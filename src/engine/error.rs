// ==========================================
// GSE 数据集生成器 - 生成引擎错误类型
// ==========================================
// 红线: 任一阶段出错即中止该阶段, 不写出部分结果
// ==========================================

use crate::config::ConfigError;
use crate::repository::RepositoryError;
use chrono::NaiveDate;
use thiserror::Error;

/// 生成引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 输入错误 =====
    #[error("参考数据缺失: {entity} (key: {key})")]
    ReferenceDataMissing { entity: String, key: String },

    // ===== 采样错误 =====
    #[error("航班号采样耗尽: 航司 {airline_code} 在 {date} 尝试 {attempts} 次仍无可用航班号")]
    GenerationExhausted {
        airline_code: String,
        date: NaiveDate,
        attempts: u32,
    },

    // ===== 配置与存储 =====
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("存储错误: {0}")]
    Storage(#[source] RepositoryError),
}

impl EngineError {
    pub fn missing(entity: impl Into<String>, key: impl ToString) -> Self {
        EngineError::ReferenceDataMissing {
            entity: entity.into(),
            key: key.to_string(),
        }
    }
}

// 输入表缺失或无法解析都视为参考数据缺失
impl From<RepositoryError> for EngineError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::TableMissing { table, path } => EngineError::ReferenceDataMissing {
                entity: table.to_string(),
                key: path,
            },
            RepositoryError::MalformedRow {
                table,
                row,
                message,
            } => EngineError::ReferenceDataMissing {
                entity: table.to_string(),
                key: format!("第 {} 行: {}", row, message),
            },
            other => EngineError::Storage(other),
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
