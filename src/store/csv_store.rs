// ==========================================
// Liverpool 订单对账系统 - CSV 库存表实现
// ==========================================
// 用途: 以本地 CSV 文件充当库存表（单操作员场景）
// 说明: 单元格保持原始字符串，写入整档回写一次
// ==========================================

use crate::store::error::{RemoteError, RemoteResult};
use crate::store::{CellUpdate, InventoryStore};
use async_trait::async_trait;
use csv::{ReaderBuilder, WriterBuilder};
use std::path::{Path, PathBuf};

pub struct CsvInventoryStore {
    path: PathBuf,
}

impl CsvInventoryStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_values(&self) -> RemoteResult<Vec<Vec<String>>> {
        let file = std::fs::File::open(&self.path)
            .map_err(|e| RemoteError::ReadError(format!("{}: {}", self.path.display(), e)))?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut values = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| RemoteError::ReadError(e.to_string()))?;
            values.push(record.iter().map(|c| c.to_string()).collect());
        }

        Ok(values)
    }

    // 先写同目录临时档再原子改名；写入中途失败不破坏原表
    fn write_values(&self, values: &[Vec<String>]) -> RemoteResult<()> {
        let tmp_path = self.tmp_path();

        if let Err(e) = Self::write_to(&tmp_path, values) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e);
        }

        std::fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp_path);
            RemoteError::WriteError(format!("{}: {}", self.path.display(), e))
        })?;

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "inventario.csv".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_to(path: &Path, values: &[Vec<String>]) -> RemoteResult<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| RemoteError::WriteError(format!("{}: {}", path.display(), e)))?;

        let mut writer = WriterBuilder::new().flexible(true).from_writer(file);
        for row in values {
            writer
                .write_record(row)
                .map_err(|e| RemoteError::WriteError(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| RemoteError::WriteError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl InventoryStore for CsvInventoryStore {
    async fn read_all(&self) -> RemoteResult<Vec<Vec<String>>> {
        self.read_values()
    }

    async fn batch_update(&self, updates: &[CellUpdate]) -> RemoteResult<usize> {
        let mut values = self.read_values().map_err(|e| match e {
            // 写路径中的读失败对调用方而言是整批写失败
            RemoteError::ReadError(msg) | RemoteError::WriteError(msg) => {
                RemoteError::WriteError(msg)
            }
        })?;

        for update in updates {
            let (col, row) = parse_a1(&update.address)?;

            if values.len() <= row {
                values.resize(row + 1, Vec::new());
            }
            if values[row].len() <= col {
                values[row].resize(col + 1, String::new());
            }
            values[row][col] = update.value.clone();
        }

        self.write_values(&values)?;
        Ok(updates.len())
    }
}

/// 解析 A1 形式地址 → (零基列索引, 零基行索引)
pub fn parse_a1(address: &str) -> RemoteResult<(usize, usize)> {
    let letters: String = address.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    let digits = &address[letters.len()..];

    if letters.is_empty() || digits.is_empty() {
        return Err(RemoteError::WriteError(format!("地址格式错误: {}", address)));
    }

    let mut col = 0usize;
    for c in letters.chars() {
        let v = (c.to_ascii_uppercase() as usize) - ('A' as usize) + 1;
        col = col * 26 + v;
    }

    let row: usize = digits
        .parse()
        .map_err(|_| RemoteError::WriteError(format!("地址格式错误: {}", address)))?;
    if row == 0 {
        return Err(RemoteError::WriteError(format!("地址行号非法: {}", address)));
    }

    Ok((col - 1, row - 1))
}
