// ==========================================
// Liverpool 订单对账系统 - 汇总引擎
// ==========================================
// 职责: 排除取消行，按 (sku_number, sku_offer, extra_info) 分组求和
// 不变量: 输出顺序 = 分组键首次出现顺序（同一输入可复现）
// ==========================================

use crate::domain::order::{AggregatedLine, OrderLine};
use std::collections::HashMap;

/// 按 SKU 分组汇总数量
///
/// # 说明
/// - 状态为 "Cancelado" 的行不计入任何汇总
/// - 零行输入产出空结果，不是错误
pub fn aggregate(lines: &[OrderLine]) -> Vec<AggregatedLine> {
    let mut index: HashMap<(String, String, String), usize> = HashMap::new();
    let mut out: Vec<AggregatedLine> = Vec::new();

    for line in lines {
        if line.is_cancelled() {
            continue;
        }

        let key = line.group_key();
        match index.get(&key) {
            Some(&i) => out[i].quantity += line.quantity,
            None => {
                index.insert(key, out.len());
                out.push(AggregatedLine {
                    sku_number: line.sku_number.clone(),
                    sku_offer: line.sku_offer.clone(),
                    extra_info: line.extra_info.clone(),
                    quantity: line.quantity,
                });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(order_id: &str, status: &str, sku: &str, extra: &str, qty: i64) -> OrderLine {
        OrderLine {
            order_id: order_id.to_string(),
            status: status.to_string(),
            sku_offer: sku.to_string(),
            sku_number: sku.to_string(),
            extra_info: extra.to_string(),
            quantity: qty,
            row_number: 0,
        }
    }

    #[test]
    fn test_cancelled_quantity_excluded() {
        // 场景 A: 3 行，其中一行 Cancelado 数量 5（SKU "X"）
        let lines = vec![
            line("P-1", "Entregado", "X", "", 1),
            line("P-2", "Cancelado", "X", "", 5),
            line("P-3", "Entregado", "Y", "", 2),
        ];

        let out = aggregate(&lines);
        let x = out.iter().find(|a| a.sku_number == "X").unwrap();
        assert_eq!(x.quantity, 1);
    }

    #[test]
    fn test_same_key_summed() {
        // 场景 B: 同 (sku_number, extra_info)，2 + 3 → 5
        let lines = vec![
            line("P-1", "Entregado", "100", "talla-9", 2),
            line("P-2", "Entregado", "100", "talla-9", 3),
        ];

        let out = aggregate(&lines);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].quantity, 5);
    }

    #[test]
    fn test_distinct_extra_info_not_merged() {
        let lines = vec![
            line("P-1", "Entregado", "100", "talla-9", 2),
            line("P-2", "Entregado", "100", "talla-10", 3),
        ];

        let out = aggregate(&lines);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_output_order_is_first_seen() {
        let lines = vec![
            line("P-1", "Entregado", "B", "", 1),
            line("P-2", "Entregado", "A", "", 1),
            line("P-3", "Entregado", "B", "", 1),
        ];

        let out = aggregate(&lines);
        assert_eq!(out[0].sku_number, "B");
        assert_eq!(out[0].quantity, 2);
        assert_eq!(out[1].sku_number, "A");
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }
}
