// ==========================================
// Liverpool 订单对账系统 - 报表构建器
// ==========================================
// 职责: 缺失 SKU 报告与已处理订单导出（内存 CSV，文件名带墨西哥城时间戳）
// ==========================================

use crate::domain::inventory::InventorySnapshot;
use crate::domain::order::AggregatedLine;
use crate::domain::run::ReportDocument;
use crate::engine::error::{SyncError, SyncResult};
use crate::engine::matcher::normalize_key;
use chrono::{DateTime, FixedOffset, Utc};
use std::collections::HashMap;

/// 文件名时间戳格式（墨西哥城时区，日-月-年--时_分）
pub const TIMESTAMP_FMT: &str = "%d-%m-%Y--%H_%M";

/// 当前墨西哥城时间（固定 UTC-6，不做夏令时换算）
pub fn mexico_now() -> DateTime<FixedOffset> {
    let offset = FixedOffset::west_opt(6 * 3600).unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
    Utc::now().with_timezone(&offset)
}

fn csv_into_document(file_name: String, write: impl FnOnce(&mut csv::Writer<Vec<u8>>) -> csv::Result<()>) -> SyncResult<ReportDocument> {
    // flexible: 标题行与数据行字段数不同
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());
    write(&mut writer).map_err(|e| SyncError::Report(e.to_string()))?;
    let content = writer
        .into_inner()
        .map_err(|e| SyncError::Report(e.to_string()))?;
    Ok(ReportDocument { file_name, content })
}

/// 缺失 SKU 报告（skus_no_encontrados_{stamp}.csv）
///
/// # 说明
/// 首行为生成时间戳标题行；仅覆盖本次未命中库存表的汇总行
pub fn build_missing_report(missing: &[AggregatedLine], stamp: &str) -> SyncResult<ReportDocument> {
    csv_into_document(format!("skus_no_encontrados_{}.csv", stamp), |writer| {
        writer.write_record(["SKUs no encontrados", stamp])?;
        writer.write_record(["Número de sku", "SKU de la oferta", "Información adicional sku", "Cantidad"])?;
        for line in missing {
            writer.write_record([
                line.sku_number.as_str(),
                line.sku_offer.as_str(),
                line.extra_info.as_str(),
                &line.quantity.to_string(),
            ])?;
        }
        Ok(())
    })
}

/// 已处理订单导出（pedidos_procesados_{stamp}.csv）
///
/// # 说明
/// 每条汇总行附带快照中的总库存列；快照缺失该列或 SKU 未命中时留空
pub fn build_enriched_export(
    aggregated: &[AggregatedLine],
    snapshot: Option<&InventorySnapshot>,
    stamp: &str,
) -> SyncResult<ReportDocument> {
    let mut totals: HashMap<String, &str> = HashMap::new();
    if let Some(snapshot) = snapshot {
        for row in &snapshot.rows {
            totals
                .entry(normalize_key(&row.sku))
                .or_insert(row.total_inventory_raw.as_str());
        }
    }

    let total_header = format!("Inventario total ({})", stamp);
    csv_into_document(format!("pedidos_procesados_{}.csv", stamp), |writer| {
        writer.write_record([
            "Número de sku",
            "SKU de la oferta",
            "Información adicional sku",
            "Cantidad",
            total_header.as_str(),
        ])?;
        for line in aggregated {
            let total = totals
                .get(&normalize_key(&line.sku_number))
                .copied()
                .unwrap_or("");
            writer.write_record([
                line.sku_number.as_str(),
                line.sku_offer.as_str(),
                line.extra_info.as_str(),
                &line.quantity.to_string(),
                total,
            ])?;
        }
        Ok(())
    })
}
