// ==========================================
// Liverpool 订单对账系统 - 已处理订单 Repository Trait
// ==========================================
// 职责: 定义已处理订单集合与运行审计的数据访问接口（不含业务规则）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::run::RunLog;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::collections::HashSet;

// ==========================================
// RegisterOutcome - 批量登记结果
// ==========================================
// inserted/skipped 单调增长语义: 已存在的编号静默跳过，永不报错
#[derive(Debug, Clone, Default)]
pub struct RegisterOutcome {
    pub inserted: usize,
    pub skipped: usize,
    /// 单条失败明细（订单编号, 原因）；只记录，不中断批次
    pub failures: Vec<(String, String)>,
}

// ==========================================
// ProcessedOrderRepository Trait
// ==========================================
// 用途: 已处理订单集合（processed_order 表）与运行审计（sync_run_log 表）
// 实现者: SqliteProcessedOrderRepository（使用 rusqlite）
#[async_trait]
pub trait ProcessedOrderRepository: Send + Sync {
    /// 建表（首次运行 schema bootstrap；幂等）
    async fn bootstrap(&self) -> RepositoryResult<()>;

    /// 读取全部已处理订单编号（去重前读取）
    async fn load_all(&self) -> RepositoryResult<HashSet<String>>;

    /// 单个订单编号是否已处理
    async fn contains(&self, order_id: &str) -> RepositoryResult<bool>;

    /// 批量登记订单编号（insert-if-absent）并记录本次运行审计
    ///
    /// # 参数
    /// - order_ids: 本次成功更新所覆盖的订单编号
    /// - run_log: 运行审计记录（与登记同一事务写入）
    ///
    /// # 返回
    /// - Ok(RegisterOutcome): inserted/skipped 统计与单条失败明细
    /// - Err: 事务整体失败（连接不可用等）
    ///
    /// # 说明
    /// 调用方必须保证在库存表写入被确认之后才调用（happens-before 顺序）。
    async fn register_batch(
        &self,
        order_ids: &[String],
        run_log: &RunLog,
    ) -> RepositoryResult<RegisterOutcome>;

    /// 仅记录运行审计（No-op 运行等未触发登记的场景）
    async fn insert_run_log(&self, run_log: &RunLog) -> RepositoryResult<()>;

    /// 查询最近的运行审计记录
    async fn recent_runs(&self, limit: usize) -> RepositoryResult<Vec<RunLog>>;
}
