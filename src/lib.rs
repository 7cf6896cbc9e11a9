// ==========================================
// Liverpool 订单对账系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + CSV/Excel
// 系统定位: 单操作员对账工具（订单汇总 → 库存表幂等更新）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 文件解析与行标准化
pub mod importer;

// 引擎层 - 汇总 / 去重 / 匹配 / 流程协调
pub mod engine;

// 数据仓储层 - 已处理订单集合
pub mod repository;

// 远端存储层 - 库存表接口
pub mod store;

// 报表层 - 缺失 SKU 报告 / 处理结果导出
pub mod report;

// 配置层 - 环境变量配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AggregatedLine, InventoryRow, InventorySnapshot, MatchedUpdate, OrderLine, ReportDocument,
    RunLog, RunOutcome, RunState, RunSummary, UpdatePlan, STATUS_CANCELADO,
};

// 导入层
pub use importer::{ImportError, RowNormalizer, UniversalFileParser};

// 引擎层
pub use engine::{RunCoordinator, SyncError};

// 仓储层
pub use repository::{
    ProcessedOrderRepository, RegisterOutcome, RepositoryError, SqliteProcessedOrderRepository,
};

// 远端存储层
pub use store::{CellUpdate, CsvInventoryStore, InventoryStore, MemoryInventoryStore, RemoteError};

// 配置
pub use config::SyncConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Liverpool 订单对账系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
