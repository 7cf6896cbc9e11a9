// ==========================================
// Liverpool 订单对账系统 - 内存库存表实现
// ==========================================
// 用途: 集成测试替身（可注入读/写失败，统计写调用次数）
// ==========================================

use crate::store::csv_store::parse_a1;
use crate::store::error::{RemoteError, RemoteResult};
use crate::store::{CellUpdate, InventoryStore};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct MemoryInventoryStore {
    values: Mutex<Vec<Vec<String>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_calls: AtomicUsize,
}

impl MemoryInventoryStore {
    pub fn new(values: Vec<Vec<String>>) -> Self {
        Self {
            values: Mutex::new(values),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            write_calls: AtomicUsize::new(0),
        }
    }

    /// 注入读失败（模拟库存表不可达）
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// 注入写失败（整批拒绝，不产生部分写入）
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// 批量写被调用的次数（幂等验证用）
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// 当前表内容快照
    pub fn snapshot(&self) -> Vec<Vec<String>> {
        self.values.lock().expect("memory store poisoned").clone()
    }

    /// 直接读取某单元格（A1 地址）
    pub fn cell(&self, address: &str) -> Option<String> {
        let (col, row) = parse_a1(address).ok()?;
        let values = self.values.lock().expect("memory store poisoned");
        values.get(row).and_then(|r| r.get(col)).cloned()
    }
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn read_all(&self) -> RemoteResult<Vec<Vec<String>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RemoteError::ReadError("inyección de falla".to_string()));
        }
        Ok(self.values.lock().expect("memory store poisoned").clone())
    }

    async fn batch_update(&self, updates: &[CellUpdate]) -> RemoteResult<usize> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RemoteError::WriteError("inyección de falla".to_string()));
        }

        let mut values = self.values.lock().expect("memory store poisoned");
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

        Ok(updates.len())
    }
}
