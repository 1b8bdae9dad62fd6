// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时目录库初始化、标准推拉夹具数据
// 说明: 数据与 helpers::mock_catalog::MockCatalog::sliding_fixture 一致
// ==========================================

#![allow(dead_code)]

use rusqlite::{params, Connection};
use std::error::Error;
use tempfile::NamedTempFile;
use window_profile_engine::repository::{SqliteCatalogRepository, CATALOG_SCHEMA_SQL};
use window_profile_engine::roles;

/// 创建临时目录库并初始化 schema（不含数据）
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path)?;
    conn.execute_batch(CATALOG_SCHEMA_SQL)?;

    Ok((temp_file, db_path))
}

/// 创建临时目录库并写入标准推拉夹具
pub fn create_seeded_catalog() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let (temp_file, db_path) = create_test_db()?;
    let conn = Connection::open(&db_path)?;
    seed_catalog(&conn)?;
    Ok((temp_file, db_path))
}

/// 打开目录仓储
pub fn open_catalog(db_path: &str) -> SqliteCatalogRepository {
    SqliteCatalogRepository::new(db_path).expect("打开目录库失败")
}

/// 写入标准推拉夹具
///
/// - 系统: 1 S60 推拉 (primacy 1), 2 S80 推拉 (primacy 2), 3 C50 平开, 4 无优先级推拉
/// - 颜色: 1 白色, 2 香槟 (系统 1 可用), 3 木纹 (系统 1 不可用)
/// - 白色: 除 JS-60X 外全部有货；香槟: 无搭接料 OV-60
pub fn seed_catalog(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let systems: [(i64, &str, &str, Option<i64>); 4] = [
        (1, "S60 推拉", "SLIDING", Some(1)),
        (2, "S80 推拉", "SLIDING", Some(2)),
        (3, "C50 平开", "CASEMENT", Some(1)),
        (4, "S-legacy 推拉", "sliding", None),
    ];
    for (id, name, system_type, primacy) in systems {
        conn.execute(
            r#"INSERT INTO profile_systems
               (system_id, name, type, top_overlap_mm, bottom_overlap_mm, side_overlap_mm, primacy)
               VALUES (?1, ?2, ?3, 5.0, 5.0, 10.0, ?4)"#,
            params![id, name, system_type, primacy],
        )?;
    }

    for (id, name, hex) in [(1, "白色", "#FFFFFF"), (2, "香槟", "#F7E7CE"), (3, "木纹", "#8B5A2B")] {
        conn.execute(
            "INSERT INTO colors (color_id, name, hex_code) VALUES (?1, ?2, ?3)",
            params![id, name, hex],
        )?;
    }

    for (system_id, color_id) in [(1, 1), (1, 2), (2, 1), (4, 1)] {
        conn.execute(
            "INSERT INTO system_available_colors (system_id, color_id) VALUES (?1, ?2)",
            params![system_id, color_id],
        )?;
    }

    let profiles: [(i64, &str, Option<f64>, Option<f64>, Option<bool>, &str); 10] = [
        (101, "FT-60", Some(40.0), Some(20.0), None, "FRAME"),
        (102, "FB-60", Some(40.0), Some(20.0), None, "FRAME"),
        (103, "FS-60", Some(40.0), Some(25.0), None, "FRAME"),
        (104, "JS-60", Some(30.0), None, None, "WIND"),
        (105, "JM-60", Some(20.0), None, Some(true), "WIND"),
        (106, "RT-60", Some(30.0), None, None, "WIND"),
        (107, "RB-60", Some(30.0), None, None, "WIND"),
        (108, "OV-60", Some(15.0), None, None, "WIND"),
        (109, "JM-60B", Some(20.0), None, Some(false), "WIND"),
        (110, "JS-60X", Some(32.0), None, None, "WIND"),
    ];
    for (id, sku, h, h2, uses_overlap, structure) in profiles {
        conn.execute(
            r#"INSERT INTO profiles
               (profile_id, profile_sku, profile_name, profile_h, profile_w, profile_h2,
                uses_overlap, profile_structure)
               VALUES (?1, ?2, ?2, ?3, 60.0, ?4, ?5, ?6)"#,
            params![id, sku, h, h2, uses_overlap, structure],
        )?;
    }

    let role_list: [(&str, i64, Option<i64>); 10] = [
        (roles::FRAME_TOP_SLIDING, 101, Some(10)),
        (roles::FRAME_BOTTOM_SLIDING, 102, Some(10)),
        (roles::FRAME_SIDE_SLIDING, 103, Some(10)),
        (roles::WIND_JAMB_SIDE_SLIDING, 104, Some(10)),
        (roles::WIND_JAMB_SIDE_SLIDING, 110, Some(20)),
        (roles::WIND_JAMB_MEETING_SLIDING, 109, Some(5)),
        (roles::WIND_JAMB_MEETING_SLIDING, 105, Some(10)),
        (roles::WIND_RAIL_TOP_SLIDING, 106, Some(10)),
        (roles::WIND_RAIL_BOTTOM_SLIDING, 107, Some(10)),
        (roles::WIND_VERTICAL_OVERLAP_SLIDING, 108, Some(10)),
    ];
    for (role, profile_id, primacy) in role_list {
        conn.execute(
            r#"INSERT INTO system_profile_list (system_id, profile_id, primacy, element_part_role)
               VALUES (1, ?1, ?2, ?3)"#,
            params![profile_id, primacy, role],
        )?;
    }

    let mut stock: Vec<(i64, i64)> = (101..=109).map(|p| (p, 1)).collect();
    stock.extend([101, 102, 103, 104, 105, 106, 107, 110].iter().map(|p| (*p, 2)));
    for (profile_id, color_id) in stock {
        conn.execute(
            r#"INSERT INTO stock_items (profile_id, color_id, item_sku, profile_price, profile_length)
               VALUES (?1, ?2, ?3, 12.5, 6000.0)"#,
            params![profile_id, color_id, format!("{}-{:02}", profile_id, color_id)],
        )?;
    }

    Ok(())
}
