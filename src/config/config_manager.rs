// ==========================================
// 门窗型材引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、快照
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::cache_settings::{
    DEFAULT_CALL_TIMEOUT_MS, DEFAULT_NEGATIVE_TTL_SECS, DEFAULT_POSITIVE_TTL_SECS,
};
use crate::config::engine_config_trait::EngineConfigReader;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// config_kv 表结构（幂等）
pub const CONFIG_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);
"#;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例，并确保 config_kv 表存在
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        conn.execute_batch(CONFIG_SCHEMA_SQL)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            conn_guard.execute_batch(CONFIG_SCHEMA_SQL)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取数值配置，缺失或格式错误时回落默认值
    fn get_u64_or_default(&self, key: &str, default: u64) -> ConfigResult<u64> {
        match self.get_config_value(key)? {
            Some(raw) => Ok(raw.trim().parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(config_key = key, raw_value = %raw, default, "配置格式错误，使用默认值");
                default
            })),
            None => Ok(default),
        }
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 诊断时记录本次选型/计算所用的缓存配置
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

// ==========================================
// EngineConfigReader Trait 实现
// ==========================================
#[async_trait]
impl EngineConfigReader for ConfigManager {
    async fn get_cache_enabled(&self) -> ConfigResult<bool> {
        let value = self.get_config_value(config_keys::CATALOG_CACHE_ENABLED)?;
        Ok(match value.as_deref().map(|v| v.trim().to_lowercase()) {
            Some(v) => !matches!(v.as_str(), "0" | "false" | "no" | "off"),
            None => true,
        })
    }

    async fn get_cache_positive_ttl_secs(&self) -> ConfigResult<u64> {
        self.get_u64_or_default(config_keys::CATALOG_CACHE_TTL_SECS, DEFAULT_POSITIVE_TTL_SECS)
    }

    async fn get_cache_negative_ttl_secs(&self) -> ConfigResult<u64> {
        self.get_u64_or_default(
            config_keys::CATALOG_CACHE_NEGATIVE_TTL_SECS,
            DEFAULT_NEGATIVE_TTL_SECS,
        )
    }

    async fn get_catalog_call_timeout_ms(&self) -> ConfigResult<u64> {
        self.get_u64_or_default(config_keys::CATALOG_CALL_TIMEOUT_MS, DEFAULT_CALL_TIMEOUT_MS)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 目录缓存
    pub const CATALOG_CACHE_ENABLED: &str = "catalog_cache_enabled";
    pub const CATALOG_CACHE_TTL_SECS: &str = "catalog_cache_ttl_secs";
    pub const CATALOG_CACHE_NEGATIVE_TTL_SECS: &str = "catalog_cache_negative_ttl_secs";

    // 目录访问
    pub const CATALOG_CALL_TIMEOUT_MS: &str = "catalog_call_timeout_ms";
}
