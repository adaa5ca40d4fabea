// ==========================================
// GSE 数据集生成器 - 数据仓储层
// ==========================================
// 职责: 各实体表与 CSV 文件之间的读写
// 红线: 不含生成逻辑; 写出为整表原子替换
// ==========================================

pub mod error;
pub mod table_store;

pub use error::{RepositoryError, RepositoryResult};
pub use table_store::{Table, TableStore};
