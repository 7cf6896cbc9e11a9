// ==========================================
// Liverpool 订单对账系统 - 领域层
// ==========================================
// 职责: 纯数据实体与状态类型，不含 I/O
// ==========================================

pub mod inventory;
pub mod order;
pub mod run;

pub use inventory::{InventoryRow, InventorySnapshot, MatchedUpdate, UpdatePlan};
pub use order::{AggregatedLine, OrderLine, STATUS_CANCELADO};
pub use run::{ReportDocument, RunLog, RunOutcome, RunState, RunSummary};
