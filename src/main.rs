// ==========================================
// Liverpool 订单对账系统 - 命令行入口
// ==========================================
// 用法: liverpool-sync <订单文件.xlsx|.csv> [--json]
// 退出码: 0 成功（含 No-op）/ 2 文件或栏位错误 / 3 远端读写或表头错误 / 1 其他
// ==========================================

use liverpool_sync::engine::SyncError;
use liverpool_sync::repository::ProcessedOrderRepository;
use liverpool_sync::{
    logging, CsvInventoryStore, RunCoordinator, SqliteProcessedOrderRepository, SyncConfig,
    APP_NAME, VERSION,
};
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    info!("{} v{} 启动", APP_NAME, VERSION);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let json_output = args.iter().any(|a| a == "--json");
    let Some(file_arg) = args.iter().find(|a| !a.starts_with("--")) else {
        eprintln!("用法: liverpool-sync <订单文件.xlsx|.csv> [--json]");
        return ExitCode::from(2);
    };

    match run(file_arg, json_output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("运行终止: {}", e);
            eprintln!("错误: {}", e);
            exit_code_for(&e)
        }
    }
}

async fn run(file_arg: &str, json_output: bool) -> Result<(), SyncError> {
    let config = SyncConfig::from_env();
    info!(
        "配置: 数据库={} 库存表={}",
        config.db_path.display(),
        config.sheet_path.display()
    );

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SyncError::Other(e.into()))?;
    }

    let repo = SqliteProcessedOrderRepository::new(&config.db_path.to_string_lossy())?;
    repo.bootstrap().await?;

    let store = CsvInventoryStore::new(&config.sheet_path);
    let coordinator = RunCoordinator::new(repo, store);

    let summary = coordinator.run_file(file_arg).await?;

    if json_output {
        let payload = serde_json::json!({
            "run_id": summary.run_id,
            "file_name": summary.file_name,
            "outcome": summary.outcome.as_str(),
            "total_lines": summary.total_lines,
            "new_lines": summary.new_lines,
            "aggregated": summary.aggregated,
            "matched": summary.matched,
            "missing": summary.missing,
            "committed_cells": summary.committed_cells,
            "registered_ids": summary.registered_ids,
            "skipped_ids": summary.skipped_ids,
            "elapsed_ms": summary.elapsed_ms,
        });
        println!("{}", payload);
    } else {
        println!("结果: {}", summary.outcome.as_str());
        println!(
            "明细行={} 新行={} 汇总={} 命中={} 缺失={} 写入单元格={} 新登记={} 耗时={}ms",
            summary.total_lines,
            summary.new_lines,
            summary.aggregated,
            summary.matched,
            summary.missing,
            summary.committed_cells,
            summary.registered_ids,
            summary.elapsed_ms
        );
    }

    for doc in [&summary.missing_report, &summary.processed_export]
        .into_iter()
        .flatten()
    {
        write_report(doc.file_name.as_str(), &doc.content)?;
    }

    Ok(())
}

fn write_report(file_name: &str, content: &[u8]) -> Result<(), SyncError> {
    std::fs::write(Path::new(file_name), content).map_err(|e| {
        SyncError::Report(format!("报表写盘失败 {}: {}", file_name, e))
    })?;
    info!("报表已生成: {}", file_name);
    println!("报表: {}", file_name);
    Ok(())
}

fn exit_code_for(e: &SyncError) -> ExitCode {
    match e {
        SyncError::Import(_) => ExitCode::from(2),
        SyncError::RemoteRead(_) | SyncError::RemoteWrite(_) | SyncError::SheetLayout(_) => {
            ExitCode::from(3)
        }
        _ => ExitCode::FAILURE,
    }
}
