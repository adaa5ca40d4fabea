// ==========================================
// GSE 数据集生成器 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 输入错误 =====
    #[error("数据表文件不存在: {table} ({path})")]
    TableMissing { table: &'static str, path: String },

    #[error("数据行解析失败 ({table} 第 {row} 行): {message}")]
    MalformedRow {
        table: &'static str,
        row: usize,
        message: String,
    },

    // ===== 输出错误 =====
    #[error("CSV 写入失败 ({table}): {message}")]
    CsvWriteError { table: &'static str, message: String },

    #[error("文件读写失败: {0}")]
    Io(#[from] std::io::Error),
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
