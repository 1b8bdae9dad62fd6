// ==========================================
// 门窗型材引擎 - 目录访问接口
// ==========================================
// 红线: Repository 不含业务逻辑
// 约定: 单条查询三态
//   - Ok(Some(_)): 找到
//   - Ok(None):    确认不存在（可缓存）
//   - Err(_):      传输/数据库错误（不缓存，向上传播）
// 顺序: 列表查询的排序由实现方保证，调用方不得重排
// ==========================================

use crate::domain::catalog::{
    Color, Profile, ProfileSystem, StockItem, SystemAvailableColor, SystemProfileListItem,
};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// CatalogRepository Trait
// ==========================================
// 实现者:
// - SqliteCatalogRepository（本地目录快照）
// - CachedCatalogRepository（读穿缓存装饰器）
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// 按系统类型查询型材系统
    ///
    /// # 排序
    /// - primacy 升序（空值最后）, system_id 升序
    async fn get_profile_systems_by_type(
        &self,
        system_type: &str,
    ) -> RepositoryResult<Vec<ProfileSystem>>;

    /// 查询系统可用色白名单
    async fn get_system_available_colors(
        &self,
        system_id: i64,
    ) -> RepositoryResult<Vec<SystemAvailableColor>>;

    /// 按 ID 查询颜色
    async fn get_color_by_id(&self, color_id: i64) -> RepositoryResult<Option<Color>>;

    /// 查询系统内某角色的候选型材
    ///
    /// # 排序
    /// - primacy 降序（空值最后）, profile_id 升序
    async fn get_system_profile_list_items(
        &self,
        system_id: i64,
        role: &str,
    ) -> RepositoryResult<Vec<SystemProfileListItem>>;

    /// 按 ID 查询型材
    async fn get_profile_by_id(&self, profile_id: i64) -> RepositoryResult<Option<Profile>>;

    /// 查询 (型材, 颜色) 库存项；存在即代表可订
    async fn get_stock_item(
        &self,
        profile_id: i64,
        color_id: i64,
    ) -> RepositoryResult<Option<StockItem>>;
}
