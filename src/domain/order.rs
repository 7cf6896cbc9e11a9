// ==========================================
// Liverpool 订单对账系统 - 订单领域模型
// ==========================================
// 来源: Liverpool 渠道订单导出档（Excel/CSV）
// 用途: 导入层写入，引擎层只读
// ==========================================

use serde::{Deserialize, Serialize};

/// 订单导出档中标记取消的状态字面值（精确匹配，区分大小写）
pub const STATUS_CANCELADO: &str = "Cancelado";

// ==========================================
// OrderLine - 订单明细行（标准化后）
// ==========================================
// 不变量: order_id 非空（去重身份）；sku_number 与 sku_offer 至少一个非空
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: String,   // 订单编号（去重身份）
    pub status: String,     // 订单状态（"Cancelado" 表示排除）
    pub sku_offer: String,  // 报价 SKU
    pub sku_number: String, // SKU 编号（缺列时由 sku_offer 派生）
    pub extra_info: String, // SKU 附加信息（变体/尺码等，次级分组键）
    pub quantity: i64,      // 数量（整数，≥ 0）

    // 元信息
    pub row_number: usize, // 原始文件行号（用于错误定位）
}

impl OrderLine {
    /// 是否已取消（汇总时排除）
    pub fn is_cancelled(&self) -> bool {
        self.status == STATUS_CANCELADO
    }

    /// 汇总分组键 (sku_number, sku_offer, extra_info)
    pub fn group_key(&self) -> (String, String, String) {
        (
            self.sku_number.clone(),
            self.sku_offer.clone(),
            self.extra_info.clone(),
        )
    }
}

// ==========================================
// AggregatedLine - 按 SKU 汇总后的行
// ==========================================
// 不变量: quantity == 同组所有非取消 OrderLine.quantity 之和
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedLine {
    pub sku_number: String,
    pub sku_offer: String,
    pub extra_info: String,
    pub quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_is_exact_match() {
        let mut line = OrderLine {
            order_id: "P-1".to_string(),
            status: "Cancelado".to_string(),
            sku_offer: "abc".to_string(),
            sku_number: "abc".to_string(),
            extra_info: String::new(),
            quantity: 1,
            row_number: 1,
        };
        assert!(line.is_cancelled());

        // 大小写不同不算取消（与导出档字面值保持一致）
        line.status = "cancelado".to_string();
        assert!(!line.is_cancelled());
    }
}
