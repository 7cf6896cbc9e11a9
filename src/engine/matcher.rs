// ==========================================
// Liverpool 订单对账系统 - 库存匹配与更新计划
// ==========================================
// 职责: 快照解析 → 标准化键匹配 → 加法更新计划（命中/缺失二分）
// 红线: 地址由快照行位置派生，快照必须在写入前紧邻重读（见 coordinator）
// ==========================================

use crate::domain::inventory::{InventoryRow, InventorySnapshot, MatchedUpdate, UpdatePlan};
use crate::domain::order::AggregatedLine;
use crate::engine::error::{SyncError, SyncResult};
use std::collections::HashMap;

// 库存表表头（与远端表一致的字面值；匹配时做标准化比较）
pub const COL_SKU: &str = "SKU_Liverpool";
pub const COL_PEDIDOS: &str = "PEDIDOS LIVERPOOL";
pub const COL_TOTAL: &str = "INVENTARIO TOTAL";

/// 表头偏移: 1 行表头 + 1 基行号
pub const HEADER_ROW_OFFSET: usize = 2;

/// 匹配用标准化键（trim + 小写；仅用于匹配，显示值不动）
pub fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// 零基列索引 → A1 列字母（0 → A, 25 → Z, 26 → AA）
pub fn column_letter(mut idx: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// 解析库存计数；非数字一律按 0（脏数据不阻断更新路径）
pub fn parse_count(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return n;
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return f as i64;
    }
    0
}

/// 原始表值 → 库存快照
///
/// # 返回
/// - Err(SheetLayout): 空表或缺少 SKU_Liverpool / PEDIDOS LIVERPOOL 表头
///
/// # 说明
/// INVENTARIO TOTAL 可缺（此时导出报表的库存列为空）
pub fn snapshot_from_values(values: &[Vec<String>]) -> SyncResult<InventorySnapshot> {
    let header = values
        .first()
        .ok_or_else(|| SyncError::SheetLayout("库存表为空".to_string()))?;

    let find_col = |name: &str| -> Option<usize> {
        header
            .iter()
            .position(|h| normalize_key(h) == normalize_key(name))
    };

    let sku_col = find_col(COL_SKU)
        .ok_or_else(|| SyncError::SheetLayout(format!("缺少表头: {}", COL_SKU)))?;
    let pedidos_col = find_col(COL_PEDIDOS)
        .ok_or_else(|| SyncError::SheetLayout(format!("缺少表头: {}", COL_PEDIDOS)))?;
    let total_col = find_col(COL_TOTAL);

    let cell = |row: &Vec<String>, col: usize| row.get(col).cloned().unwrap_or_default();

    let rows = values[1..]
        .iter()
        .enumerate()
        .map(|(index, row)| InventoryRow {
            sku: cell(row, sku_col),
            pedidos_raw: cell(row, pedidos_col),
            total_inventory_raw: total_col.map(|c| cell(row, c)).unwrap_or_default(),
            index,
        })
        .collect();

    Ok(InventorySnapshot { rows, pedidos_col })
}

/// 汇总行 × 快照 → 更新计划
///
/// # 说明
/// - 标准化键每行只算一次，查找 O(1)
/// - 同键多行时命中快照中的首行（与远端表的首行定位语义一致）
/// - 不变量: matched.len() + missing.len() == aggregated.len()
pub fn plan_update(aggregated: &[AggregatedLine], snapshot: &InventorySnapshot) -> UpdatePlan {
    let mut lookup: HashMap<String, &InventoryRow> = HashMap::new();
    for row in &snapshot.rows {
        lookup.entry(normalize_key(&row.sku)).or_insert(row);
    }

    let letter = column_letter(snapshot.pedidos_col);
    let mut matched = Vec::new();
    let mut missing = Vec::new();

    for line in aggregated {
        match lookup.get(&normalize_key(&line.sku_number)) {
            Some(row) => {
                let current = parse_count(&row.pedidos_raw);
                matched.push(MatchedUpdate {
                    line: line.clone(),
                    address: format!("{}{}", letter, row.index + HEADER_ROW_OFFSET),
                    current,
                    new_value: current + line.quantity,
                });
            }
            None => missing.push(line.clone()),
        }
    }

    UpdatePlan { matched, missing }
}
