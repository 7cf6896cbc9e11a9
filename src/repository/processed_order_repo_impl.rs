// ==========================================
// Liverpool 订单对账系统 - 已处理订单 Repository 实现
// ==========================================
// 存储: SQLite（processed_order / sync_run_log 两表）
// 并发: Arc<Mutex<Connection>>，单操作员场景
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::run::RunLog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::processed_order_repo::{ProcessedOrderRepository, RegisterOutcome};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

pub struct SqliteProcessedOrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteProcessedOrderRepository {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn insert_run_log_stmt(conn: &Connection, run_log: &RunLog) -> RepositoryResult<()> {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO sync_run_log (
                run_id, file_name, outcome, total_lines, new_lines, aggregated,
                matched, missing, committed_cells, registered_ids, skipped_ids,
                elapsed_ms, finished_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                run_log.run_id,
                run_log.file_name,
                run_log.outcome,
                run_log.total_lines,
                run_log.new_lines,
                run_log.aggregated,
                run_log.matched,
                run_log.missing,
                run_log.committed_cells,
                run_log.registered_ids,
                run_log.skipped_ids,
                run_log.elapsed_ms,
                run_log.finished_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl ProcessedOrderRepository for SqliteProcessedOrderRepository {
    async fn bootstrap(&self) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS processed_order (
                order_id       TEXT PRIMARY KEY,
                registered_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sync_run_log (
                run_id          TEXT PRIMARY KEY,
                file_name       TEXT,
                outcome         TEXT NOT NULL,
                total_lines     INTEGER NOT NULL DEFAULT 0,
                new_lines       INTEGER NOT NULL DEFAULT 0,
                aggregated      INTEGER NOT NULL DEFAULT 0,
                matched         INTEGER NOT NULL DEFAULT 0,
                missing         INTEGER NOT NULL DEFAULT 0,
                committed_cells INTEGER NOT NULL DEFAULT 0,
                registered_ids  INTEGER NOT NULL DEFAULT 0,
                skipped_ids     INTEGER NOT NULL DEFAULT 0,
                elapsed_ms      INTEGER,
                finished_at     TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_run_log_finished ON sync_run_log(finished_at);
            "#,
        )
        .map_err(|e| RepositoryError::DatabaseQueryError(e.to_string()))?;

        Ok(())
    }

    async fn load_all(&self) -> RepositoryResult<HashSet<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT order_id FROM processed_order")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<String>, _>>()?;

        Ok(ids)
    }

    async fn contains(&self, order_id: &str) -> RepositoryResult<bool> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM processed_order WHERE order_id = ?1",
            params![order_id],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    async fn register_batch(
        &self,
        order_ids: &[String],
        run_log: &RunLog,
    ) -> RepositoryResult<RegisterOutcome> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut outcome = RegisterOutcome::default();
        let registered_at = Utc::now().to_rfc3339();

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO processed_order (order_id, registered_at) VALUES (?1, ?2)",
            )?;

            for order_id in order_ids {
                // 单条失败只记录，不中断整批（漏登记一条的代价是下次多算一次，可接受）
                match stmt.execute(params![order_id, registered_at]) {
                    Ok(0) => outcome.skipped += 1,
                    Ok(_) => outcome.inserted += 1,
                    Err(e) => {
                        warn!(order_id = %order_id, error = %e, "订单编号登记失败");
                        outcome.failures.push((order_id.clone(), e.to_string()));
                    }
                }
            }
        }

        // 审计行回填实际登记计数
        let mut run_log = run_log.clone();
        run_log.registered_ids = outcome.inserted as i32;
        run_log.skipped_ids = outcome.skipped as i32;
        Self::insert_run_log_stmt(&tx, &run_log)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(outcome)
    }

    async fn insert_run_log(&self, run_log: &RunLog) -> RepositoryResult<()> {
        let conn = self.lock()?;
        Self::insert_run_log_stmt(&conn, run_log)
    }

    async fn recent_runs(&self, limit: usize) -> RepositoryResult<Vec<RunLog>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT run_id, file_name, outcome, total_lines, new_lines, aggregated,
                   matched, missing, committed_cells, registered_ids, skipped_ids,
                   elapsed_ms, finished_at
            FROM sync_run_log
            ORDER BY finished_at DESC
            LIMIT ?1
            "#,
        )?;

        let runs = stmt
            .query_map(params![limit as i64], |row| {
                let finished_at: String = row.get(12)?;
                Ok(RunLog {
                    run_id: row.get(0)?,
                    file_name: row.get(1)?,
                    outcome: row.get(2)?,
                    total_lines: row.get(3)?,
                    new_lines: row.get(4)?,
                    aggregated: row.get(5)?,
                    matched: row.get(6)?,
                    missing: row.get(7)?,
                    committed_cells: row.get(8)?,
                    registered_ids: row.get(9)?,
                    skipped_ids: row.get(10)?,
                    elapsed_ms: row.get(11)?,
                    finished_at: chrono::DateTime::parse_from_rfc3339(&finished_at)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now()),
                })
            })?
            .collect::<Result<Vec<RunLog>, _>>()?;

        Ok(runs)
    }
}
