// ==========================================
// Lecturna 教务系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,转换仓储错误为可解释的错误消息
// 红线: 所有错误信息必须包含显式原因
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    /// 填报窗口已关闭 (reason 由截止闸门给出)
    #[error("填报窗口已关闭: {0}")]
    DeadlineExpired(String),

    // ==========================================
    // 并发控制错误
    // ==========================================
    /// 评审期间池子被并发消费,整批提交已回滚
    #[error("快照过期: {entity} id={id} 已被并发占用,本批提交已整体回滚")]
    StaleSnapshot { entity: String, id: String },

    // ==========================================
    // 透传错误
    // ==========================================
    #[error(transparent)]
    Repository(RepositoryError),

    #[error("内部错误: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::StaleSnapshot { entity, id } => ApiError::StaleSnapshot { entity, id },
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} id={}", entity, id))
            }
            other => ApiError::Repository(other),
        }
    }
}

/// API层结果类型
pub type ApiResult<T> = Result<T, ApiError>;
