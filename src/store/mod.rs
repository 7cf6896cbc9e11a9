// ==========================================
// Liverpool 订单对账系统 - 远端存储层
// ==========================================
// 职责: 定义库存表接口（读全表 / 批量写单元格）
// 红线: 批量写必须在一次远端调用内尝试全部单元格；核心不做单格重试
// ==========================================

pub mod csv_store;
pub mod error;
pub mod memory;

pub use csv_store::CsvInventoryStore;
pub use error::{RemoteError, RemoteResult};
pub use memory::MemoryInventoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ==========================================
// CellUpdate - 单元格写入指令
// ==========================================
// 语义: "entered as typed" —— 数值字符串由远端按数值处理
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellUpdate {
    pub address: String, // A1 形式（<列字母><行号>）
    pub value: String,
}

// ==========================================
// InventoryStore Trait
// ==========================================
// 用途: 库存表数据访问
// 实现者: CsvInventoryStore（本地 CSV 表）, MemoryInventoryStore（测试）
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// 读取库存表全部行（含表头行），单元格一律为原始字符串
    async fn read_all(&self) -> RemoteResult<Vec<Vec<String>>>;

    /// 一次调用批量写入所有单元格
    ///
    /// # 返回
    /// - Ok(usize): 提交的单元格数
    /// - Err(RemoteError::WriteError): 整批失败（由调用方决定是否重跑）
    async fn batch_update(&self, updates: &[CellUpdate]) -> RemoteResult<usize>;
}
