// ==========================================
// Liverpool 订单对账系统 - 引擎层错误类型
// ==========================================
// 职责: 单次运行的统一错误口径，四种对外可见失败之一一对应
// ==========================================

use crate::importer::ImportError;
use crate::repository::RepositoryError;
use crate::store::RemoteError;
use thiserror::Error;

/// 运行级错误类型
#[derive(Error, Debug)]
pub enum SyncError {
    /// 同一上传只允许一次在途运行（single-flight）
    #[error("已有同步任务进行中，请等待当前运行结束")]
    RunInFlight,

    /// 档案结构/行数据错误（用户需修正后重新上传）
    #[error(transparent)]
    Import(#[from] ImportError),

    /// 库存表读取失败（运行可安全重试：订单集合未推进）
    #[error("库存表读取失败: {0}")]
    RemoteRead(String),

    /// 库存表批量写入失败（运行可安全重试：订单集合未推进）
    #[error("库存表写入失败: {0}")]
    RemoteWrite(String),

    /// 库存表缺少必要表头（SKU_Liverpool / PEDIDOS LIVERPOOL）
    #[error("库存表结构错误: {0}")]
    SheetLayout(String),

    /// 已处理订单存储错误
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// 报表生成失败
    #[error("报表生成失败: {0}")]
    Report(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<RemoteError> for SyncError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::ReadError(msg) => SyncError::RemoteRead(msg),
            RemoteError::WriteError(msg) => SyncError::RemoteWrite(msg),
        }
    }
}

/// Result 类型别名
pub type SyncResult<T> = Result<T, SyncError>;
