// ==========================================
// 门窗型材引擎 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供只读目录访问接口,屏蔽存储与传输细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod cached_catalog_repo;
pub mod catalog_repo;
pub mod error;
pub mod sqlite_catalog_repo;

// 重导出核心仓储
pub use cached_catalog_repo::{CacheStats, CachedCatalogRepository};
pub use catalog_repo::CatalogRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use sqlite_catalog_repo::{SqliteCatalogRepository, CATALOG_SCHEMA_SQL};
