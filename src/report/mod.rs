// ==========================================
// Liverpool 订单对账系统 - 报表层
// ==========================================

pub mod builder;

pub use builder::{build_enriched_export, build_missing_report, mexico_now, TIMESTAMP_FMT};
