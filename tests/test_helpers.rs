// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、库存表数据与订单行的构造
// ==========================================

use std::collections::HashMap;
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库文件路径（schema 由 bootstrap 建立）
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();
    Ok((temp_file, db_path))
}

/// 标准库存表内容（含表头行）
///
/// # 说明
/// " ABC123 " 故意带空白，验证标准化键匹配；PEDIDOS 列为 B 列
pub fn inventory_values() -> Vec<Vec<String>> {
    vec![
        row(&["SKU_Liverpool", "PEDIDOS LIVERPOOL", "INVENTARIO TOTAL"]),
        row(&[" ABC123 ", "10", "50"]),
        row(&["DEF456", "7", "20"]),
    ]
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

/// 构造一条订单文件原始行（列名与导出格式一致）
pub fn order_row(order_id: &str, estado: &str, sku: &str, cantidad: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    map.insert("ID del pedido".to_string(), order_id.to_string());
    map.insert("Estado".to_string(), estado.to_string());
    map.insert("SKU de la oferta".to_string(), format!("oferta-{}", sku));
    map.insert("Número de sku".to_string(), sku.to_string());
    map.insert("Información adicional sku".to_string(), "talla M".to_string());
    map.insert("Cantidad".to_string(), cantidad.to_string());
    map
}
