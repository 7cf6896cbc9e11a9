// ==========================================
// Liverpool 订单对账系统 - 引擎层
// ==========================================
// 职责: 对账运行的纯算法（汇总/去重/匹配）与运行协调
// ==========================================

pub mod aggregator;
pub mod coordinator;
pub mod dedup;
pub mod error;
pub mod matcher;

pub use aggregator::aggregate;
pub use coordinator::RunCoordinator;
pub use dedup::{filter_new, unique_order_ids};
pub use error::{SyncError, SyncResult};
pub use matcher::{plan_update, snapshot_from_values};
