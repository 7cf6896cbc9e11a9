// ==========================================
// Liverpool 订单对账系统 - 运行协调器
// ==========================================
// 职责: 串联 标准化 → 去重 → 汇总 → 匹配 → 批量写 → 登记 → 报表
// 红线: 订单编号登记必须发生在远端写入确认之后（happens-before）
// 红线: 同一时刻最多一个运行在飞（单飞闸）
// ==========================================

use crate::domain::run::{RunLog, RunOutcome, RunState, RunSummary};
use crate::engine::aggregator::aggregate;
use crate::engine::dedup::{filter_new, unique_order_ids};
use crate::engine::error::{SyncError, SyncResult};
use crate::engine::matcher::{plan_update, snapshot_from_values};
use crate::importer::{RowNormalizer, UniversalFileParser};
use crate::report::{build_enriched_export, build_missing_report, mexico_now, TIMESTAMP_FMT};
use crate::repository::ProcessedOrderRepository;
use crate::store::{CellUpdate, InventoryStore};
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

// 单飞闸释放守卫（覆盖提前返回与错误路径）
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// ==========================================
// RunCoordinator - 单次对账运行的协调器
// ==========================================
pub struct RunCoordinator<R, S> {
    repo: R,
    store: S,
    in_flight: AtomicBool,
}

impl<R, S> RunCoordinator<R, S>
where
    R: ProcessedOrderRepository,
    S: InventoryStore,
{
    pub fn new(repo: R, store: S) -> Self {
        Self {
            repo,
            store,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 从订单文件执行一次完整对账运行
    ///
    /// # 返回
    /// - Err(RunInFlight): 已有运行在飞，本次整体拒绝
    /// - Err(Import/SheetLayout/RemoteRead/RemoteWrite/...): 运行失败，未登记任何编号
    pub async fn run_file<P: AsRef<Path>>(&self, path: P) -> SyncResult<RunSummary> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let rows = UniversalFileParser.parse(path)?;
        self.run_rows(&file_name, rows).await
    }

    /// 从已解析的原始行执行一次完整对账运行
    pub async fn run_rows(
        &self,
        file_name: &str,
        rows: Vec<HashMap<String, String>>,
    ) -> SyncResult<RunSummary> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("已有运行在飞，拒绝本次请求: {}", file_name);
            return Err(SyncError::RunInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let run_id = Uuid::new_v4().to_string();
        let started = Instant::now();
        info!("运行开始: run_id={} 文件={}", run_id, file_name);

        match self.run_inner(&run_id, file_name, rows, &started).await {
            Ok(summary) => {
                info!(
                    "运行结束[{}]: run_id={} 结果={} 命中={} 缺失={} 登记={} 耗时={}ms",
                    RunState::Done.as_str(),
                    run_id,
                    summary.outcome.as_str(),
                    summary.matched,
                    summary.missing,
                    summary.registered_ids,
                    summary.elapsed_ms
                );
                Ok(summary)
            }
            Err(e) => {
                error!(
                    "运行失败[{}]: run_id={} 错误={}",
                    RunState::Failed.as_str(),
                    run_id,
                    e
                );
                Err(e)
            }
        }
    }

    async fn run_inner(
        &self,
        run_id: &str,
        file_name: &str,
        rows: Vec<HashMap<String, String>>,
        started: &Instant,
    ) -> SyncResult<RunSummary> {
        info!("状态[{}]: 原始行数={}", RunState::FileLoaded.as_str(), rows.len());

        // 标准化
        let lines = RowNormalizer.normalize(&rows)?;
        let total_lines = lines.len();
        info!("状态[{}]: 明细行数={}", RunState::Normalized.as_str(), total_lines);

        // 去重（读取全量已处理集合）
        let processed = self.repo.load_all().await?;
        let new_lines = filter_new(lines, &processed);
        info!(
            "状态[{}]: 新行={} 已处理集合={}",
            RunState::Deduped.as_str(),
            new_lines.len(),
            processed.len()
        );

        if new_lines.is_empty() {
            return self.finish_noop(run_id, file_name, total_lines, started).await;
        }

        // 汇总（排除取消状态）
        let aggregated = aggregate(&new_lines);
        info!("状态[{}]: 汇总行={}", RunState::Aggregated.as_str(), aggregated.len());

        // 紧邻写入前重读快照，保证行位置与地址一致
        let values = self.store.read_all().await?;
        let snapshot = snapshot_from_values(&values)?;
        let plan = plan_update(&aggregated, &snapshot);
        info!(
            "状态[{}]: 命中={} 缺失={}",
            RunState::MatchedPlanned.as_str(),
            plan.matched.len(),
            plan.missing.len()
        );

        // 批量写（整批一次调用；失败则整次运行失败，不登记任何编号）
        let committed_cells = if plan.matched.is_empty() {
            0
        } else {
            let updates: Vec<CellUpdate> = plan
                .matched
                .iter()
                .map(|m| CellUpdate {
                    address: m.address.clone(),
                    value: m.new_value.to_string(),
                })
                .collect();
            self.store.batch_update(&updates).await?
        };
        info!("状态[{}]: 写入单元格={}", RunState::Updated.as_str(), committed_cells);

        // 登记（写入确认之后；单条失败只记录，整体失败也不回滚远端写入）
        let order_ids = unique_order_ids(&new_lines);
        let elapsed_ms = started.elapsed().as_millis() as i64;
        let mut run_log = self.make_run_log(run_id, file_name, RunOutcome::Updated, elapsed_ms);
        run_log.total_lines = total_lines as i32;
        run_log.new_lines = new_lines.len() as i32;
        run_log.aggregated = aggregated.len() as i32;
        run_log.matched = plan.matched.len() as i32;
        run_log.missing = plan.missing.len() as i32;
        run_log.committed_cells = committed_cells as i32;

        let (registered_ids, skipped_ids) = match self.repo.register_batch(&order_ids, &run_log).await {
            Ok(outcome) => {
                for (order_id, reason) in &outcome.failures {
                    warn!("订单编号登记失败: {} ({})", order_id, reason);
                }
                (outcome.inserted, outcome.skipped)
            }
            Err(e) => {
                // 远端已更新；登记失败不对外报错，下次运行可能重复计入
                error!("订单编号批量登记失败（库存表已更新）: {}", e);
                (0, 0)
            }
        };
        info!(
            "状态[{}]: 新登记={} 跳过={}",
            RunState::IdsRegistered.as_str(),
            registered_ids,
            skipped_ids
        );

        // 报表
        let stamp = mexico_now().format(TIMESTAMP_FMT).to_string();
        let missing_report = if plan.missing.is_empty() {
            None
        } else {
            Some(build_missing_report(&plan.missing, &stamp)?)
        };
        let processed_export = Some(build_enriched_export(&aggregated, Some(&snapshot), &stamp)?);

        Ok(RunSummary {
            run_id: run_id.to_string(),
            file_name: file_name.to_string(),
            outcome: RunOutcome::Updated,
            total_lines,
            new_lines: new_lines.len(),
            aggregated: aggregated.len(),
            matched: plan.matched.len(),
            missing: plan.missing.len(),
            committed_cells,
            registered_ids,
            skipped_ids,
            elapsed_ms: started.elapsed().as_millis() as i64,
            missing_report,
            processed_export,
        })
    }

    // 去重后为空: 不读快照、不写远端、不产出报表，仅落运行审计
    async fn finish_noop(
        &self,
        run_id: &str,
        file_name: &str,
        total_lines: usize,
        started: &Instant,
    ) -> SyncResult<RunSummary> {
        info!("所有订单编号均已处理，跳过远端更新: 文件={}", file_name);

        let elapsed_ms = started.elapsed().as_millis() as i64;
        let mut run_log = self.make_run_log(run_id, file_name, RunOutcome::AlreadyProcessed, elapsed_ms);
        run_log.total_lines = total_lines as i32;
        if let Err(e) = self.repo.insert_run_log(&run_log).await {
            warn!("运行审计写入失败: {}", e);
        }

        Ok(RunSummary {
            run_id: run_id.to_string(),
            file_name: file_name.to_string(),
            outcome: RunOutcome::AlreadyProcessed,
            total_lines,
            new_lines: 0,
            aggregated: 0,
            matched: 0,
            missing: 0,
            committed_cells: 0,
            registered_ids: 0,
            skipped_ids: 0,
            elapsed_ms,
            missing_report: None,
            processed_export: None,
        })
    }

    fn make_run_log(
        &self,
        run_id: &str,
        file_name: &str,
        outcome: RunOutcome,
        elapsed_ms: i64,
    ) -> RunLog {
        RunLog {
            run_id: run_id.to_string(),
            file_name: Some(file_name.to_string()),
            outcome: outcome.as_str().to_string(),
            total_lines: 0,
            new_lines: 0,
            aggregated: 0,
            matched: 0,
            missing: 0,
            committed_cells: 0,
            registered_ids: 0,
            skipped_ids: 0,
            elapsed_ms: Some(elapsed_ms as i32),
            finished_at: Utc::now(),
        }
    }
}
