// ==========================================
// Repository 层集成测试
// ==========================================
// 测试目标: 已处理订单集合的登记语义与运行审计落库
// ==========================================

mod test_helpers;

use chrono::Utc;
use liverpool_sync::logging;
use liverpool_sync::repository::{ProcessedOrderRepository, SqliteProcessedOrderRepository};
use liverpool_sync::RunLog;

fn make_run_log(run_id: &str, outcome: &str) -> RunLog {
    RunLog {
        run_id: run_id.to_string(),
        file_name: Some("pedidos.xlsx".to_string()),
        outcome: outcome.to_string(),
        total_lines: 3,
        new_lines: 2,
        aggregated: 2,
        matched: 1,
        missing: 1,
        committed_cells: 1,
        registered_ids: 2,
        skipped_ids: 0,
        elapsed_ms: Some(12),
        finished_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_bootstrap_is_idempotent() {
    logging::init_test();
    let (_temp, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let repo = SqliteProcessedOrderRepository::new(&db_path).expect("创建 Repository 失败");

    repo.bootstrap().await.expect("首次建表应该成功");
    repo.bootstrap().await.expect("重复建表应该幂等");

    let all = repo.load_all().await.expect("读取集合应该成功");
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_register_batch_skips_existing_ids() {
    logging::init_test();
    let (_temp, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let repo = SqliteProcessedOrderRepository::new(&db_path).expect("创建 Repository 失败");
    repo.bootstrap().await.expect("建表失败");

    let ids = vec!["P-001".to_string(), "P-002".to_string()];
    let outcome = repo
        .register_batch(&ids, &make_run_log("run-1", "UPDATED"))
        .await
        .expect("首次登记应该成功");
    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.skipped, 0);
    assert!(outcome.failures.is_empty());

    // 第二次登记: 已存在的静默跳过，新编号照常插入
    let ids = vec!["P-001".to_string(), "P-003".to_string()];
    let outcome = repo
        .register_batch(&ids, &make_run_log("run-2", "UPDATED"))
        .await
        .expect("重复登记应该成功");
    assert_eq!(outcome.inserted, 1);
    assert_eq!(outcome.skipped, 1);

    let all = repo.load_all().await.expect("读取集合失败");
    assert_eq!(all.len(), 3);
    assert!(repo.contains("P-002").await.expect("查询失败"));
    assert!(!repo.contains("P-999").await.expect("查询失败"));
}

#[tokio::test]
async fn test_run_log_written_with_registration() {
    logging::init_test();
    let (_temp, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let repo = SqliteProcessedOrderRepository::new(&db_path).expect("创建 Repository 失败");
    repo.bootstrap().await.expect("建表失败");

    repo.register_batch(&["P-001".to_string()], &make_run_log("run-1", "UPDATED"))
        .await
        .expect("登记失败");
    repo.insert_run_log(&make_run_log("run-2", "NO_OP"))
        .await
        .expect("审计写入失败");

    let runs = repo.recent_runs(10).await.expect("审计查询失败");
    assert_eq!(runs.len(), 2);

    let updated = runs.iter().find(|r| r.run_id == "run-1").expect("缺少 run-1");
    assert_eq!(updated.outcome, "UPDATED");
    assert_eq!(updated.matched, 1);

    let noop = runs.iter().find(|r| r.run_id == "run-2").expect("缺少 run-2");
    assert_eq!(noop.outcome, "NO_OP");
}
