// ==========================================
// Liverpool 订单对账系统 - 库存领域模型
// ==========================================
// 来源: 远端库存表（按 SKU_Liverpool 列定位的行存储）
// 生命周期: 快照为单次运行内的时点读取，计划为运行内临时产物
// ==========================================

use crate::domain::order::AggregatedLine;
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryRow - 库存表单行快照
// ==========================================
// 不变量: 原始字符串保持显示值；匹配只用标准化键（trim + 小写）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRow {
    pub sku: String,                 // SKU_Liverpool 显示值（未标准化）
    pub pedidos_raw: String,         // PEDIDOS LIVERPOOL 原始单元格值
    pub total_inventory_raw: String, // INVENTARIO TOTAL 原始单元格值（表中缺列时为空）
    pub index: usize,                // 数据行零基索引（写回地址依赖此值）
}

// ==========================================
// InventorySnapshot - 库存表时点快照
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub rows: Vec<InventoryRow>,
    pub pedidos_col: usize, // PEDIDOS LIVERPOOL 的零基列索引（决定写回列字母）
}

// ==========================================
// MatchedUpdate - 命中行的加法更新
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedUpdate {
    pub line: AggregatedLine,
    pub address: String, // A1 形式目标单元格（<列字母><行号>）
    pub current: i64,    // 快照中的当前值（非数字按 0 处理）
    pub new_value: i64,  // current + quantity
}

// ==========================================
// UpdatePlan - 更新计划（命中/缺失二分）
// ==========================================
// 不变量: matched ∪ missing == 输入的全部 AggregatedLine，两分区不相交
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePlan {
    pub matched: Vec<MatchedUpdate>,
    pub missing: Vec<AggregatedLine>,
}

impl UpdatePlan {
    pub fn total_lines(&self) -> usize {
        self.matched.len() + self.missing.len()
    }
}
