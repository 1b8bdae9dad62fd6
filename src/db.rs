// ==========================================
// 门窗型材引擎 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一目录快照库与 config_kv 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发读时的偶发 busy 错误
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 显式指定数据库路径的环境变量
pub const DB_PATH_ENV: &str = "WINDOW_ENGINE_DB_PATH";

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 默认数据库路径
///
/// 优先级: 环境变量 > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./catalog.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("window-profile-engine");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("catalog.db");
        } else {
            tracing::warn!(dir = %dir.display(), "无法创建数据目录，使用当前目录");
        }
    }

    path.to_string_lossy().to_string()
}
