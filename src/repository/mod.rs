// ==========================================
// Liverpool 订单对账系统 - 数据仓储层
// ==========================================
// 职责: 已处理订单集合 + 运行审计的持久化
// ==========================================

pub mod error;
pub mod processed_order_repo;
pub mod processed_order_repo_impl;

pub use error::{RepositoryError, RepositoryResult};
pub use processed_order_repo::{ProcessedOrderRepository, RegisterOutcome};
pub use processed_order_repo_impl::SqliteProcessedOrderRepository;
