// ==========================================
// Liverpool 订单对账系统 - 配置层
// ==========================================
// 职责: 数据库与库存表路径的解析（环境变量优先，其次平台默认目录）
// ==========================================

use std::env;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "LIVERPOOL_SYNC_DB_PATH";
pub const ENV_SHEET_PATH: &str = "LIVERPOOL_SYNC_SHEET_PATH";

const DB_FILE_NAME: &str = "liverpool_sync.db";
const DEFAULT_SHEET_FILE: &str = "inventario_liverpool.csv";

// ==========================================
// SyncConfig - 运行配置
// ==========================================
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// SQLite 数据库路径（已处理订单集合与运行审计）
    pub db_path: PathBuf,
    /// 库存表路径（CSV 后端）
    pub sheet_path: PathBuf,
}

impl SyncConfig {
    /// 从环境变量装配配置；未设置时落平台默认
    pub fn from_env() -> Self {
        let db_path = env::var(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_db_path());
        let sheet_path = env::var(ENV_SHEET_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SHEET_FILE));
        Self { db_path, sheet_path }
    }
}

/// 默认数据库路径: <数据目录>/liverpool-sync/liverpool_sync.db，取不到数据目录时落当前目录
pub fn default_db_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("liverpool-sync").join(DB_FILE_NAME),
        None => PathBuf::from(DB_FILE_NAME),
    }
}
