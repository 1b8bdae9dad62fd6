// ==========================================
// 门窗型材引擎 - 演示入口
// ==========================================
// 流程: 配置 → 目录快照 → 缓存 → 选型 → 计算 → 输出 JSON
// 环境变量:
// - WINDOW_ENGINE_DB_PATH: 目录库路径
// - WINDOW_ENGINE_COLOR_ID: 期望颜色 ID（默认 1）
// ==========================================

use anyhow::{anyhow, Context};
use std::sync::Arc;
use window_profile_engine::config::{CatalogCacheSettings, ConfigManager};
use window_profile_engine::db::get_default_db_path;
use window_profile_engine::{
    logging, roles, CachedCatalogRepository, CalculationOutcome, DimensionCalculator, Element,
    ProfileSelector, SelectionRequest, SqliteCatalogRepository, SystemType, Wind, WindKind,
};

const COLOR_ID_ENV: &str = "WINDOW_ENGINE_COLOR_ID";
const DEFAULT_COLOR_ID: i64 = 1;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", window_profile_engine::APP_NAME, window_profile_engine::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    // 配置
    let config = ConfigManager::new(&db_path).map_err(|e| anyhow!(e))?;
    let settings = CatalogCacheSettings::load(&config)
        .await
        .map_err(|e| anyhow!(e))?;
    tracing::info!(?settings, "目录缓存配置");

    // 目录
    let sqlite = SqliteCatalogRepository::new(&db_path).context("打开目录库失败")?;
    sqlite.init_schema().context("初始化目录表失败")?;
    let catalog = Arc::new(CachedCatalogRepository::new(Arc::new(sqlite), settings));

    // 选型
    let color_id = std::env::var(COLOR_ID_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_COLOR_ID);

    let selector = ProfileSelector::new(catalog.clone());
    let request = SelectionRequest {
        element_type: SystemType::Sliding,
        desired_color_id: color_id,
        required_roles: roles::SLIDING_DEFAULT_ROLES
            .iter()
            .map(|r| r.to_string())
            .collect(),
    };
    let selection = selector
        .select_default_system_and_profiles(&request)
        .await
        .context("型材选型失败")?;

    for problem in &selection.problems {
        tracing::warn!("选型问题: {}", problem);
    }

    let system = match &selection.system {
        Some(system) if selection.color.is_some() && !selection.profiles.is_empty() => system,
        _ => {
            tracing::warn!("选型结果不完整，跳过尺寸计算");
            println!("{}", serde_json::to_string_pretty(&selection)?);
            return Ok(());
        }
    };

    // 计算：2000 x 1500 两扇推拉
    let mut element = Element::new(2000.0, 1500.0, SystemType::Sliding)?;
    element.add_wind(Wind::new("左扇", WindKind::SlidingSash))?;
    element.add_wind(Wind::new("右扇", WindKind::SlidingSash))?;

    let outcome = DimensionCalculator::new()
        .calculate_details(&mut element, system, &selection.profiles)
        .context("尺寸计算失败")?;

    if let CalculationOutcome::Computed(dims) = &outcome {
        tracing::info!(
            panel_height = dims.panel_height,
            panel_width = dims.panel_width,
            "计算完成"
        );
    }

    let stats = catalog.stats();
    tracing::info!(
        hits = stats.hits,
        misses = stats.misses,
        upstream_calls = stats.upstream_calls,
        coalesced = stats.coalesced,
        "目录缓存统计"
    );

    println!("{}", serde_json::to_string_pretty(&element)?);
    Ok(())
}
