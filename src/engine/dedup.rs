// ==========================================
// Liverpool 订单对账系统 - 去重过滤器
// ==========================================
// 职责: 依据已处理订单集合过滤已见行（纯函数，O(n)）
// 落库原语在 repository::ProcessedOrderRepository
// ==========================================

use crate::domain::order::OrderLine;
use std::collections::HashSet;

/// 过滤出未处理过的订单行，保持输入顺序
pub fn filter_new(lines: Vec<OrderLine>, processed: &HashSet<String>) -> Vec<OrderLine> {
    lines
        .into_iter()
        .filter(|line| !processed.contains(&line.order_id))
        .collect()
}

/// 提取去重后的订单编号（保持首次出现顺序）
///
/// 取消行的编号也在内：该订单已被“计为零”处理，重传不应再计
pub fn unique_order_ids(lines: &[OrderLine]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for line in lines {
        if seen.insert(line.order_id.clone()) {
            ids.push(line.order_id.clone());
        }
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(order_id: &str) -> OrderLine {
        OrderLine {
            order_id: order_id.to_string(),
            status: "Entregado".to_string(),
            sku_offer: "abc".to_string(),
            sku_number: "abc".to_string(),
            extra_info: String::new(),
            quantity: 1,
            row_number: 0,
        }
    }

    #[test]
    fn test_filter_new_preserves_order() {
        let processed: HashSet<String> = ["P-2".to_string()].into_iter().collect();
        let lines = vec![line("P-1"), line("P-2"), line("P-3")];

        let out = filter_new(lines, &processed);
        let ids: Vec<&str> = out.iter().map(|l| l.order_id.as_str()).collect();
        assert_eq!(ids, vec!["P-1", "P-3"]);
    }

    #[test]
    fn test_filter_new_empty_set_keeps_all() {
        let processed = HashSet::new();
        let out = filter_new(vec![line("P-1"), line("P-2")], &processed);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_unique_order_ids_dedupes_within_batch() {
        // 多行同订单（一单多品项）
        let lines = vec![line("P-1"), line("P-1"), line("P-2")];
        assert_eq!(unique_order_ids(&lines), vec!["P-1", "P-2"]);
    }
}
