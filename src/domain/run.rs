// ==========================================
// Liverpool 订单对账系统 - 运行状态与结果模型
// ==========================================
// 用途: Run Coordinator 的状态机与对外结果
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// RunState - 单次运行状态机
// ==========================================
// 转移: Idle → FileLoaded → Normalized → Deduped → Aggregated
//       → MatchedPlanned → Updated → IdsRegistered → Done
// 任一状态出现不可恢复错误 → Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Idle,
    FileLoaded,
    Normalized,
    Deduped,
    Aggregated,
    MatchedPlanned,
    Updated,
    IdsRegistered,
    Done,
    Failed,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "IDLE",
            RunState::FileLoaded => "FILE_LOADED",
            RunState::Normalized => "NORMALIZED",
            RunState::Deduped => "DEDUPED",
            RunState::Aggregated => "AGGREGATED",
            RunState::MatchedPlanned => "MATCHED_PLANNED",
            RunState::Updated => "UPDATED",
            RunState::IdsRegistered => "IDS_REGISTERED",
            RunState::Done => "DONE",
            RunState::Failed => "FAILED",
        }
    }
}

// ==========================================
// RunOutcome - 对外可见结果
// ==========================================
// Updated: 有新订单行，库存表已更新
// AlreadyProcessed: 去重后为空，未执行任何远端写入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Updated,
    AlreadyProcessed,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Updated => "UPDATED",
            RunOutcome::AlreadyProcessed => "NO_OP",
        }
    }
}

// ==========================================
// ReportDocument - 内存中的可下载文件
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub file_name: String,
    pub content: Vec<u8>,
}

// ==========================================
// RunSummary - 单次运行汇总（返回给调用方）
// ==========================================
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: String,
    pub file_name: String,
    pub outcome: RunOutcome,

    // 各阶段计数
    pub total_lines: usize,     // 标准化后的明细行数
    pub new_lines: usize,       // 去重后剩余行数
    pub aggregated: usize,      // 汇总行数
    pub matched: usize,         // 命中库存表的汇总行数
    pub missing: usize,         // 未命中（进入缺失报告）的汇总行数
    pub committed_cells: usize, // 实际批量写入的单元格数
    pub registered_ids: usize,  // 本次新登记的订单编号数
    pub skipped_ids: usize,     // 已存在被跳过的订单编号数

    pub elapsed_ms: i64,

    // 产出文件（No-op 运行不产出）
    pub missing_report: Option<ReportDocument>,
    pub processed_export: Option<ReportDocument>,
}

// ==========================================
// RunLog - 运行审计记录（落库）
// ==========================================
// 对齐: sync_run_log 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLog {
    pub run_id: String,
    pub file_name: Option<String>,
    pub outcome: String, // UPDATED / NO_OP
    pub total_lines: i32,
    pub new_lines: i32,
    pub aggregated: i32,
    pub matched: i32,
    pub missing: i32,
    pub committed_cells: i32,
    pub registered_ids: i32,
    pub skipped_ids: i32,
    pub elapsed_ms: Option<i32>,
    pub finished_at: DateTime<Utc>,
}
