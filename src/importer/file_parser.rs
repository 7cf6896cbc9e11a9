// ==========================================
// Liverpool 订单对账系统 - 文件解析器
// ==========================================
// 职责: 订单导出档 → 原始行记录（HashMap<列名, 值>）
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 文件解析接口（阶段 0）
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录；列名仅做 trim，语义标准化交给 RowNormalizer
    fn parse_to_raw_records(&self, file_path: &Path)
        -> ImportResult<Vec<HashMap<String, String>>>;
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(
        &self,
        file_path: &Path,
    ) -> ImportResult<Vec<HashMap<String, String>>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            // 短行缺失的尾列以空串补齐，键集合始终与表头一致
            let mut row_map: HashMap<String, String> = headers
                .iter()
                .map(|h| (h.clone(), String::new()))
                .collect();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(
        &self,
        file_path: &Path,
    ) -> ImportResult<Vec<HashMap<String, String>>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let mut workbook: Xlsx<_> = open_workbook(file_path)
            .map_err(|e: calamine::XlsxError| ImportError::ExcelParseError(e.to_string()))?;

        // 读取第一个 sheet（订单导出档只含一个工作表）
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut records = Vec::new();
        for data_row in rows {
            // 与 CSV 路径一致: 行短于表头时补空串
            let mut row_map: HashMap<String, String> = headers
                .iter()
                .map(|h| (h.clone(), String::new()))
                .collect();

            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), cell.to_string().trim().to_string());
                }
            }

            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(records)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<HashMap<String, String>>> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_records(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_records(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_csv_parser_valid_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "ID del pedido,Estado,Cantidad").unwrap();
        writeln!(temp_file, "P-001,Entregado,2").unwrap();
        writeln!(temp_file, "P-002,Cancelado,5").unwrap();

        let parser = CsvParser;
        let records = parser.parse_to_raw_records(temp_file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("ID del pedido"), Some(&"P-001".to_string()));
        assert_eq!(records[1].get("Estado"), Some(&"Cancelado".to_string()));
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let parser = CsvParser;
        let result = parser.parse_to_raw_records(Path::new("no_existe.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "ID del pedido,Cantidad").unwrap();
        writeln!(temp_file, "P-001,2").unwrap();
        writeln!(temp_file, ",").unwrap(); // 空行
        writeln!(temp_file, "P-002,3").unwrap();

        let parser = CsvParser;
        let records = parser.parse_to_raw_records(temp_file.path()).unwrap();

        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_csv_short_row_keeps_all_header_keys() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            "ID del pedido,Estado,SKU de la oferta,Información adicional sku,Cantidad"
        )
        .unwrap();
        writeln!(temp_file, "P-001,Enviado,abc123").unwrap(); // 尾列缺失的短行

        let records = CsvParser.parse_to_raw_records(temp_file.path()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].len(), 5);
        assert_eq!(records[0].get("Cantidad"), Some(&String::new()));
        assert_eq!(
            records[0].get("Información adicional sku"),
            Some(&String::new())
        );
    }

    #[test]
    fn test_short_first_row_is_not_schema_error() {
        use crate::importer::error::ImportError;
        use crate::importer::row_normalizer::RowNormalizer;

        // 表头具备全部必要栏位，首行数据行短于表头:
        // 结构校验必须通过；缺数量值是行级错误，不是结构错误
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            "ID del pedido,Estado,SKU de la oferta,Información adicional sku,Cantidad"
        )
        .unwrap();
        writeln!(temp_file, "P-001,Enviado,abc123").unwrap();

        let records = CsvParser.parse_to_raw_records(temp_file.path()).unwrap();
        let result = RowNormalizer.normalize(&records);
        assert!(matches!(
            result,
            Err(ImportError::TypeConversionError { row: 2, .. })
        ));

        // 短行只缺可空的附加信息列时，整档正常标准化
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            "ID del pedido,Estado,SKU de la oferta,Cantidad,Información adicional sku"
        )
        .unwrap();
        writeln!(temp_file, "P-001,Enviado,abc123,4").unwrap();
        writeln!(temp_file, "P-002,Enviado,def456,2,talla M").unwrap();

        let records = CsvParser.parse_to_raw_records(temp_file.path()).unwrap();
        let lines = RowNormalizer.normalize(&records).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].quantity, 4);
        assert_eq!(lines[0].extra_info, "");
        assert_eq!(lines[1].extra_info, "talla M");
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let result = UniversalFileParser.parse("pedidos.pdf");
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }
}
