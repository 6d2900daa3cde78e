// ==========================================
// Lecturna 教务系统 - 导入层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

use crate::repository::error::RepositoryError;

/// 导入层错误类型 (整文件级失败)
///
/// 单行失败不走此类型,收敛进 ImportReport.errors
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("文件不存在或不可读: {0}")]
    FileUnreadable(String),

    #[error("CSV 解析失败: {0}")]
    CsvError(#[from] csv::Error),

    #[error("表头缺失必需列: {0}")]
    MissingColumn(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
