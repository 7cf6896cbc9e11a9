// ==========================================
// Liverpool 订单对账系统 - 行标准化器
// ==========================================
// 职责: 原始行记录（任意列名大小写/空白）→ 标准 OrderLine
// 红线: 缺失必要栏位必须报 SchemaError 并点名栏位，不允许运行期 key 查找失败
// ==========================================

use crate::domain::order::OrderLine;
use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;

// ==========================================
// CanonicalField - 标准栏位集合
// ==========================================
// 映射表对扩展开放：新导出格式加别名即可，旧格式缺 sku_number 时由 sku_offer 派生
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    OrderId,
    Status,
    SkuOffer,
    SkuNumber,
    ExtraInfo,
    Quantity,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 6] = [
        CanonicalField::OrderId,
        CanonicalField::Status,
        CanonicalField::SkuOffer,
        CanonicalField::SkuNumber,
        CanonicalField::ExtraInfo,
        CanonicalField::Quantity,
    ];

    /// 标准栏位名（错误信息与报表使用）
    pub fn name(&self) -> &'static str {
        match self {
            CanonicalField::OrderId => "ID del pedido",
            CanonicalField::Status => "Estado",
            CanonicalField::SkuOffer => "SKU de la oferta",
            CanonicalField::SkuNumber => "Número de SKU",
            CanonicalField::ExtraInfo => "Información adicional sku",
            CanonicalField::Quantity => "Cantidad",
        }
    }

    /// 已知列名别名（全部为 trim + 小写后的形式）
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::OrderId => &["id del pedido", "id pedido", "order id"],
            CanonicalField::Status => &["estado", "status"],
            CanonicalField::SkuOffer => &["sku de la oferta", "sku oferta"],
            CanonicalField::SkuNumber => &["número de sku", "numero de sku", "sku number"],
            CanonicalField::ExtraInfo => &[
                "información adicional sku",
                "informacion adicional sku",
            ],
            CanonicalField::Quantity => &["cantidad", "quantity"],
        }
    }

    /// 是否为必要栏位（SkuNumber 可缺，由 SkuOffer 派生）
    fn required(&self) -> bool {
        !matches!(self, CanonicalField::SkuNumber)
    }
}

// ==========================================
// RowNormalizer - 行标准化器
// ==========================================
pub struct RowNormalizer;

impl RowNormalizer {
    /// 将原始行记录批量标准化为 OrderLine 序列
    ///
    /// # 参数
    /// - rows: 文件解析产出的原始行（列名未标准化）
    ///
    /// # 返回
    /// - Ok(Vec<OrderLine>): 标准化结果，顺序与输入一致
    /// - Err(SchemaError): 缺失必要栏位（点名栏位）
    /// - Err(TypeConversionError): 数量非法（带行号）
    ///
    /// # 说明
    /// 纯变换，无副作用。空输入产出空序列。
    pub fn normalize(&self, rows: &[HashMap<String, String>]) -> ImportResult<Vec<OrderLine>> {
        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };

        // 依第一行校验整档结构（同一文件所有行共享表头）
        let resolved = Self::resolve_columns(first)?;

        let mut lines = Vec::with_capacity(rows.len());
        for (idx, raw) in rows.iter().enumerate() {
            let row_number = idx + 2; // 1 表头行 + 1 基索引，与源文件行号对齐
            lines.push(Self::normalize_row(raw, &resolved, row_number)?);
        }

        Ok(lines)
    }

    /// 解析列名映射（标准栏位 → 原始列名）
    fn resolve_columns(
        row: &HashMap<String, String>,
    ) -> ImportResult<HashMap<CanonicalField, String>> {
        // 标准化列名 → 原始列名
        let lowered: HashMap<String, &String> = row
            .keys()
            .map(|k| (k.trim().to_lowercase(), k))
            .collect();

        let mut resolved = HashMap::new();
        let mut missing = Vec::new();

        for field in CanonicalField::ALL {
            let hit = field
                .aliases()
                .iter()
                .find_map(|alias| lowered.get(*alias));

            match hit {
                Some(original) => {
                    resolved.insert(field, (*original).clone());
                }
                None if field.required() => missing.push(field.name().to_string()),
                None => {}
            }
        }

        if !missing.is_empty() {
            return Err(ImportError::SchemaError { missing });
        }

        Ok(resolved)
    }

    /// 标准化单行
    fn normalize_row(
        raw: &HashMap<String, String>,
        resolved: &HashMap<CanonicalField, String>,
        row_number: usize,
    ) -> ImportResult<OrderLine> {
        let get = |field: CanonicalField| -> String {
            resolved
                .get(&field)
                .and_then(|col| raw.get(col))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        let order_id = get(CanonicalField::OrderId);
        if order_id.is_empty() {
            return Err(ImportError::EmptyOrderId(row_number));
        }

        let sku_offer = get(CanonicalField::SkuOffer);
        let mut sku_number = get(CanonicalField::SkuNumber);
        if sku_number.is_empty() {
            // 旧导出格式无 SKU 编号列：以报价 SKU 作为稳定分组键
            sku_number = sku_offer.clone();
        }
        if sku_number.is_empty() {
            return Err(ImportError::EmptySku(row_number));
        }

        let quantity = Self::parse_quantity(&get(CanonicalField::Quantity), row_number)?;

        Ok(OrderLine {
            order_id,
            status: get(CanonicalField::Status),
            sku_offer,
            sku_number,
            extra_info: get(CanonicalField::ExtraInfo),
            quantity,
            row_number,
        })
    }

    /// 解析数量（整数 ≥ 0；Excel 数值单元格可能带小数形式）
    fn parse_quantity(value: &str, row_number: usize) -> ImportResult<i64> {
        let conversion_error = |message: String| ImportError::TypeConversionError {
            row: row_number,
            field: CanonicalField::Quantity.name().to_string(),
            message,
        };

        let parsed = match value.parse::<i64>() {
            Ok(n) => n,
            Err(_) => {
                // Excel 导出常见 "5.0" 形式
                let f = value
                    .parse::<f64>()
                    .map_err(|_| conversion_error(format!("无法解析为整数: {}", value)))?;
                if f.fract() != 0.0 {
                    return Err(conversion_error(format!("数量不是整数: {}", value)));
                }
                f as i64
            }
        };

        if parsed < 0 {
            return Err(conversion_error(format!("数量不可为负: {}", parsed)));
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_normalize_basic() {
        let rows = vec![row(&[
            ("ID del pedido", "P-001"),
            ("Estado", "Entregado"),
            ("SKU de la oferta", "SKU-100"),
            ("Información adicional sku", "talla-9"),
            ("Cantidad", "3"),
        ])];

        let lines = RowNormalizer.normalize(&rows).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].order_id, "P-001");
        assert_eq!(lines[0].quantity, 3);
        // 缺 SKU 编号列 → 由报价 SKU 派生
        assert_eq!(lines[0].sku_number, "SKU-100");
        assert_eq!(lines[0].row_number, 2);
    }

    #[test]
    fn test_normalize_case_and_spacing_insensitive_headers() {
        let rows = vec![row(&[
            ("  ID DEL PEDIDO ", "P-001"),
            ("ESTADO", "Entregado"),
            ("Sku De La Oferta", "abc"),
            ("INFORMACIÓN ADICIONAL SKU", "x"),
            ("CANTIDAD", "1"),
        ])];

        let lines = RowNormalizer.normalize(&rows).unwrap();
        assert_eq!(lines[0].sku_offer, "abc");
    }

    #[test]
    fn test_normalize_explicit_sku_number_wins() {
        let rows = vec![row(&[
            ("ID del pedido", "P-001"),
            ("Estado", "Entregado"),
            ("SKU de la oferta", "oferta-1"),
            ("Número de SKU", "100"),
            ("Información adicional sku", "talla-9"),
            ("Cantidad", "1"),
        ])];

        let lines = RowNormalizer.normalize(&rows).unwrap();
        assert_eq!(lines[0].sku_number, "100");
        assert_eq!(lines[0].sku_offer, "oferta-1");
    }

    #[test]
    fn test_schema_error_names_missing_fields() {
        let rows = vec![row(&[("ID del pedido", "P-001"), ("Estado", "Entregado")])];

        let err = RowNormalizer.normalize(&rows).unwrap_err();
        match err {
            ImportError::SchemaError { missing } => {
                assert!(missing.contains(&"SKU de la oferta".to_string()));
                assert!(missing.contains(&"Cantidad".to_string()));
                // 可缺栏位不在清单中
                assert!(!missing.contains(&"Número de SKU".to_string()));
            }
            other => panic!("Expected SchemaError, got {:?}", other),
        }
    }

    #[test]
    fn test_quantity_accepts_excel_float_form() {
        let rows = vec![row(&[
            ("ID del pedido", "P-001"),
            ("Estado", "Entregado"),
            ("SKU de la oferta", "abc"),
            ("Información adicional sku", ""),
            ("Cantidad", "5.0"),
        ])];

        let lines = RowNormalizer.normalize(&rows).unwrap();
        assert_eq!(lines[0].quantity, 5);
    }

    #[test]
    fn test_quantity_invalid_is_row_error() {
        let rows = vec![row(&[
            ("ID del pedido", "P-001"),
            ("Estado", "Entregado"),
            ("SKU de la oferta", "abc"),
            ("Información adicional sku", ""),
            ("Cantidad", "dos"),
        ])];

        let err = RowNormalizer.normalize(&rows).unwrap_err();
        assert!(matches!(
            err,
            ImportError::TypeConversionError { row: 2, .. }
        ));
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let lines = RowNormalizer.normalize(&[]).unwrap();
        assert!(lines.is_empty());
    }
}
