// ==========================================
// Mock 目录实现 - 用于集成测试
// ==========================================
// 能力:
// - 内存数据，列表按插入顺序返回（模拟目录给定顺序）
// - 按方法计数上游调用
// - 按查询点注入传输错误
// - 可选固定延迟（配合 tokio 暂停时钟）
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;
use window_profile_engine::domain::{
    Color, Profile, ProfileSystem, StockItem, SystemAvailableColor, SystemProfileListItem,
    SystemType,
};
use window_profile_engine::repository::{CatalogRepository, RepositoryError, RepositoryResult};
use window_profile_engine::roles;

/// 注入失败的查询点
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailPoint {
    SystemsByType,
    AvailableColors(i64),
    Color(i64),
    RoleList(i64, String),
    Profile(i64),
    StockItem(i64, i64),
}

/// Mock 目录结构
#[derive(Default)]
pub struct MockCatalog {
    pub systems: Vec<ProfileSystem>,
    pub available_colors: Vec<SystemAvailableColor>,
    pub colors: HashMap<i64, Color>,
    pub role_lists: Vec<SystemProfileListItem>,
    pub profiles: HashMap<i64, Profile>,
    pub stock_items: HashMap<(i64, i64), StockItem>,
    pub delay: Option<Duration>,
    failures: Mutex<HashSet<FailPoint>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl MockCatalog {
    /// 空目录
    pub fn empty() -> Self {
        Self::default()
    }

    /// 推拉系统标准夹具（与 test_helpers::seed_catalog 数据一致）
    pub fn sliding_fixture() -> Self {
        let mut catalog = Self::default();

        catalog.systems = vec![
            system(1, "S60 推拉", SystemType::Sliding, Some(1)),
            system(2, "S80 推拉", SystemType::Sliding, Some(2)),
            system(3, "C50 平开", SystemType::Casement, Some(1)),
        ];

        for (id, name) in [(1, "白色"), (2, "香槟"), (3, "木纹")] {
            catalog.colors.insert(
                id,
                Color {
                    color_id: id,
                    name: name.to_string(),
                    hex_code: None,
                },
            );
        }
        catalog.available_colors = vec![available(1, 1), available(1, 2), available(2, 1)];

        for p in [
            profile(101, "FT-60", Some(40.0), Some(20.0), None),
            profile(102, "FB-60", Some(40.0), Some(20.0), None),
            profile(103, "FS-60", Some(40.0), Some(25.0), None),
            profile(104, "JS-60", Some(30.0), None, None),
            profile(105, "JM-60", Some(20.0), None, Some(true)),
            profile(106, "RT-60", Some(30.0), None, None),
            profile(107, "RB-60", Some(30.0), None, None),
            profile(108, "OV-60", Some(15.0), None, None),
            profile(109, "JM-60B", Some(20.0), None, Some(false)),
            profile(110, "JS-60X", Some(32.0), None, None),
        ] {
            catalog.profiles.insert(p.profile_id, p);
        }

        catalog.role_lists = vec![
            list_item(1, roles::FRAME_TOP_SLIDING, 101, Some(10)),
            list_item(1, roles::FRAME_BOTTOM_SLIDING, 102, Some(10)),
            list_item(1, roles::FRAME_SIDE_SLIDING, 103, Some(10)),
            list_item(1, roles::WIND_JAMB_SIDE_SLIDING, 110, Some(20)),
            list_item(1, roles::WIND_JAMB_SIDE_SLIDING, 104, Some(10)),
            list_item(1, roles::WIND_JAMB_MEETING_SLIDING, 105, Some(10)),
            list_item(1, roles::WIND_JAMB_MEETING_SLIDING, 109, Some(5)),
            list_item(1, roles::WIND_RAIL_TOP_SLIDING, 106, Some(10)),
            list_item(1, roles::WIND_RAIL_BOTTOM_SLIDING, 107, Some(10)),
            list_item(1, roles::WIND_VERTICAL_OVERLAP_SLIDING, 108, Some(10)),
        ];

        // 白色: 除 JS-60X 外全部有货；香槟: 无搭接料，JS-60X 有货
        for profile_id in 101..=109 {
            catalog.add_stock(profile_id, 1);
        }
        for profile_id in [101, 102, 103, 104, 105, 106, 107, 110] {
            catalog.add_stock(profile_id, 2);
        }

        catalog
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn add_stock(&mut self, profile_id: i64, color_id: i64) {
        self.stock_items
            .insert((profile_id, color_id), stock(profile_id, color_id));
    }

    pub fn remove_stock(&mut self, profile_id: i64, color_id: i64) {
        self.stock_items.remove(&(profile_id, color_id));
    }

    pub fn fail(&self, point: FailPoint) {
        self.failures.lock().unwrap().insert(point);
    }

    pub fn heal(&self, point: &FailPoint) {
        self.failures.lock().unwrap().remove(point);
    }

    /// 某方法的上游调用次数
    pub fn calls(&self, operation: &str) -> usize {
        self.calls.lock().unwrap().get(operation).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    async fn enter(&self, operation: &'static str, point: FailPoint) -> RepositoryResult<()> {
        *self.calls.lock().unwrap().entry(operation).or_insert(0) += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failures.lock().unwrap().contains(&point) {
            return Err(RepositoryError::Transport(format!(
                "injected failure: {:?}",
                point
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for MockCatalog {
    async fn get_profile_systems_by_type(
        &self,
        system_type: &str,
    ) -> RepositoryResult<Vec<ProfileSystem>> {
        self.enter("get_profile_systems_by_type", FailPoint::SystemsByType)
            .await?;
        let mut systems: Vec<ProfileSystem> = self
            .systems
            .iter()
            .filter(|s| s.system_type.as_str().eq_ignore_ascii_case(system_type))
            .cloned()
            .collect();
        systems.sort_by_key(|s| (s.primacy.is_none(), s.primacy, s.system_id));
        Ok(systems)
    }

    async fn get_system_available_colors(
        &self,
        system_id: i64,
    ) -> RepositoryResult<Vec<SystemAvailableColor>> {
        self.enter(
            "get_system_available_colors",
            FailPoint::AvailableColors(system_id),
        )
        .await?;
        Ok(self
            .available_colors
            .iter()
            .filter(|c| c.system_id == system_id)
            .cloned()
            .collect())
    }

    async fn get_color_by_id(&self, color_id: i64) -> RepositoryResult<Option<Color>> {
        self.enter("get_color_by_id", FailPoint::Color(color_id)).await?;
        Ok(self.colors.get(&color_id).cloned())
    }

    async fn get_system_profile_list_items(
        &self,
        system_id: i64,
        role: &str,
    ) -> RepositoryResult<Vec<SystemProfileListItem>> {
        self.enter(
            "get_system_profile_list_items",
            FailPoint::RoleList(system_id, role.to_string()),
        )
        .await?;
        Ok(self
            .role_lists
            .iter()
            .filter(|i| i.system_id == system_id && i.element_part_role == role)
            .cloned()
            .collect())
    }

    async fn get_profile_by_id(&self, profile_id: i64) -> RepositoryResult<Option<Profile>> {
        self.enter("get_profile_by_id", FailPoint::Profile(profile_id))
            .await?;
        Ok(self.profiles.get(&profile_id).cloned())
    }

    async fn get_stock_item(
        &self,
        profile_id: i64,
        color_id: i64,
    ) -> RepositoryResult<Option<StockItem>> {
        self.enter("get_stock_item", FailPoint::StockItem(profile_id, color_id))
            .await?;
        Ok(self.stock_items.get(&(profile_id, color_id)).cloned())
    }
}

// ==========================================
// 构造辅助
// ==========================================

pub fn system(id: i64, name: &str, system_type: SystemType, primacy: Option<i64>) -> ProfileSystem {
    ProfileSystem {
        system_id: id,
        name: name.to_string(),
        system_type,
        top_overlap_mm: 5.0,
        bottom_overlap_mm: 5.0,
        side_overlap_mm: 10.0,
        primacy,
        created_at: None,
        updated_at: None,
    }
}

pub fn profile(
    id: i64,
    sku: &str,
    h: Option<f64>,
    h2: Option<f64>,
    uses_overlap: Option<bool>,
) -> Profile {
    Profile {
        profile_id: id,
        profile_sku: sku.to_string(),
        profile_name: sku.to_string(),
        profile_h: h,
        profile_w: Some(60.0),
        profile_h2: h2,
        uses_overlap,
        profile_structure: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn stock(profile_id: i64, color_id: i64) -> StockItem {
    StockItem {
        stock_item_id: profile_id * 100 + color_id,
        profile_id,
        color_id,
        item_sku: format!("{}-{:02}", profile_id, color_id),
        profile_price: 12.5,
        profile_length_mm: Some(6000.0),
    }
}

pub fn available(system_id: i64, color_id: i64) -> SystemAvailableColor {
    SystemAvailableColor {
        system_id,
        color_id,
        color_code_suffix: None,
    }
}

pub fn list_item(system_id: i64, role: &str, profile_id: i64, primacy: Option<i64>) -> SystemProfileListItem {
    SystemProfileListItem {
        system_id,
        profile_id,
        primacy,
        element_part_role: role.to_string(),
    }
}
