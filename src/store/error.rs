// ==========================================
// Liverpool 订单对账系统 - 远端存储错误类型
// ==========================================
// 超时由底层 I/O 客户端处理，对上一律表现为读/写失败
// ==========================================

use thiserror::Error;

/// 远端库存表错误类型
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("库存表读取失败: {0}")]
    ReadError(String),

    #[error("库存表写入失败: {0}")]
    WriteError(String),
}

/// Result 类型别名
pub type RemoteResult<T> = Result<T, RemoteError>;
