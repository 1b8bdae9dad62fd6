// ==========================================
// 门窗型材引擎 - SQLite 目录快照仓储
// ==========================================
// 红线: Repository 不含业务逻辑，只负责数据访问
// 说明: 远端目录的传输协议不在本仓库范围内，
//       本地快照库按相同契约提供只读查询
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::catalog::{
    Color, Profile, ProfileStructure, ProfileSystem, StockItem, SystemAvailableColor,
    SystemProfileListItem,
};
use crate::domain::types::SystemType;
use crate::repository::catalog_repo::CatalogRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// 目录快照表结构（幂等）
pub const CATALOG_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS profile_systems (
    system_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    top_overlap_mm REAL NOT NULL DEFAULT 0,
    bottom_overlap_mm REAL NOT NULL DEFAULT 0,
    side_overlap_mm REAL NOT NULL DEFAULT 0,
    primacy INTEGER,
    created_at TEXT,
    updated_at TEXT
);

CREATE TABLE IF NOT EXISTS profiles (
    profile_id INTEGER PRIMARY KEY,
    profile_sku TEXT NOT NULL UNIQUE,
    profile_name TEXT NOT NULL DEFAULT '',
    profile_h REAL,
    profile_w REAL,
    profile_h2 REAL,
    uses_overlap INTEGER,
    profile_structure TEXT,
    created_at TEXT,
    updated_at TEXT
);

CREATE TABLE IF NOT EXISTS colors (
    color_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    hex_code TEXT
);

CREATE TABLE IF NOT EXISTS stock_items (
    stock_item_id INTEGER PRIMARY KEY,
    profile_id INTEGER NOT NULL REFERENCES profiles(profile_id),
    color_id INTEGER NOT NULL REFERENCES colors(color_id),
    item_sku TEXT NOT NULL,
    profile_price REAL NOT NULL DEFAULT 0,
    profile_length REAL,
    UNIQUE(profile_id, color_id)
);

CREATE TABLE IF NOT EXISTS system_available_colors (
    system_id INTEGER NOT NULL REFERENCES profile_systems(system_id),
    color_id INTEGER NOT NULL REFERENCES colors(color_id),
    color_code_suffix TEXT,
    PRIMARY KEY (system_id, color_id)
);

CREATE TABLE IF NOT EXISTS system_profile_list (
    system_id INTEGER NOT NULL REFERENCES profile_systems(system_id),
    profile_id INTEGER NOT NULL REFERENCES profiles(profile_id),
    primacy INTEGER,
    element_part_role TEXT NOT NULL,
    PRIMARY KEY (system_id, profile_id, element_part_role)
);
"#;

// ==========================================
// SqliteCatalogRepository - 目录快照仓储
// ==========================================
pub struct SqliteCatalogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCatalogRepository {
    /// 创建新的 SqliteCatalogRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 创建目录表（已存在则跳过）
    pub fn init_schema(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(CATALOG_SCHEMA_SQL)?;
        Ok(())
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

// ==========================================
// 行映射
// ==========================================

fn map_profile_system(row: &Row<'_>) -> SqliteResult<ProfileSystem> {
    Ok(ProfileSystem {
        system_id: row.get(0)?,
        name: row.get(1)?,
        system_type: SystemType::from_db_str(&row.get::<_, String>(2)?),
        top_overlap_mm: row.get(3)?,
        bottom_overlap_mm: row.get(4)?,
        side_overlap_mm: row.get(5)?,
        primacy: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn map_profile(row: &Row<'_>) -> SqliteResult<Profile> {
    Ok(Profile {
        profile_id: row.get(0)?,
        profile_sku: row.get(1)?,
        profile_name: row.get(2)?,
        profile_h: row.get(3)?,
        profile_w: row.get(4)?,
        profile_h2: row.get(5)?,
        uses_overlap: row.get::<_, Option<i64>>(6)?.map(|v| v != 0),
        profile_structure: row
            .get::<_, Option<String>>(7)?
            .and_then(|s| ProfileStructure::from_db_str(&s)),
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

// ==========================================
// CatalogRepository 实现
// ==========================================
#[async_trait]
impl CatalogRepository for SqliteCatalogRepository {
    async fn get_profile_systems_by_type(
        &self,
        system_type: &str,
    ) -> RepositoryResult<Vec<ProfileSystem>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                system_id, name, type,
                top_overlap_mm, bottom_overlap_mm, side_overlap_mm,
                primacy, created_at, updated_at
            FROM profile_systems
            WHERE UPPER(type) = UPPER(?1)
            ORDER BY primacy IS NULL, primacy ASC, system_id ASC
            "#,
        )?;

        let systems = stmt
            .query_map(params![system_type], map_profile_system)?
            .collect::<SqliteResult<Vec<_>>>()?;

        debug!(system_type, count = systems.len(), "查询型材系统");
        Ok(systems)
    }

    async fn get_system_available_colors(
        &self,
        system_id: i64,
    ) -> RepositoryResult<Vec<SystemAvailableColor>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT system_id, color_id, color_code_suffix
            FROM system_available_colors
            WHERE system_id = ?1
            ORDER BY color_id ASC
            "#,
        )?;

        let colors = stmt
            .query_map(params![system_id], |row| {
                Ok(SystemAvailableColor {
                    system_id: row.get(0)?,
                    color_id: row.get(1)?,
                    color_code_suffix: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(colors)
    }

    async fn get_color_by_id(&self, color_id: i64) -> RepositoryResult<Option<Color>> {
        let conn = self.get_conn()?;
        let color = conn
            .query_row(
                "SELECT color_id, name, hex_code FROM colors WHERE color_id = ?1",
                params![color_id],
                |row| {
                    Ok(Color {
                        color_id: row.get(0)?,
                        name: row.get(1)?,
                        hex_code: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(color)
    }

    async fn get_system_profile_list_items(
        &self,
        system_id: i64,
        role: &str,
    ) -> RepositoryResult<Vec<SystemProfileListItem>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT system_id, profile_id, primacy, element_part_role
            FROM system_profile_list
            WHERE system_id = ?1 AND element_part_role = ?2
            ORDER BY primacy IS NULL, primacy DESC, profile_id ASC
            "#,
        )?;

        let items = stmt
            .query_map(params![system_id, role], |row| {
                Ok(SystemProfileListItem {
                    system_id: row.get(0)?,
                    profile_id: row.get(1)?,
                    primacy: row.get(2)?,
                    element_part_role: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        debug!(system_id, role, count = items.len(), "查询角色候选型材");
        Ok(items)
    }

    async fn get_profile_by_id(&self, profile_id: i64) -> RepositoryResult<Option<Profile>> {
        let conn = self.get_conn()?;
        let profile = conn
            .query_row(
                r#"
                SELECT
                    profile_id, profile_sku, profile_name,
                    profile_h, profile_w, profile_h2,
                    uses_overlap, profile_structure,
                    created_at, updated_at
                FROM profiles
                WHERE profile_id = ?1
                "#,
                params![profile_id],
                map_profile,
            )
            .optional()?;

        Ok(profile)
    }

    async fn get_stock_item(
        &self,
        profile_id: i64,
        color_id: i64,
    ) -> RepositoryResult<Option<StockItem>> {
        let conn = self.get_conn()?;
        let item = conn
            .query_row(
                r#"
                SELECT stock_item_id, profile_id, color_id, item_sku, profile_price, profile_length
                FROM stock_items
                WHERE profile_id = ?1 AND color_id = ?2
                "#,
                params![profile_id, color_id],
                |row| {
                    Ok(StockItem {
                        stock_item_id: row.get(0)?,
                        profile_id: row.get(1)?,
                        color_id: row.get(2)?,
                        item_sku: row.get(3)?,
                        profile_price: row.get(4)?,
                        profile_length_mm: row.get(5)?,
                    })
                },
            )
            .optional()?;

        Ok(item)
    }
}
