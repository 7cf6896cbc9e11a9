// ==========================================
// Liverpool 订单对账系统 - 导入层
// ==========================================
// 职责: 订单导出档解析 + 行标准化
// 支持: Excel, CSV
// ==========================================

pub mod error;
pub mod file_parser;
pub mod row_normalizer;

pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, UniversalFileParser};
pub use row_normalizer::{CanonicalField, RowNormalizer};
