// ==========================================
// 门窗型材引擎 - 配置层
// ==========================================
// 职责: 引擎配置读取（目录缓存 TTL / 调用超时）
// 存储: config_kv 表
// ==========================================

pub mod cache_settings;
pub mod config_manager;
pub mod engine_config_trait;

// 重导出核心配置类型
pub use cache_settings::CatalogCacheSettings;
pub use config_manager::{config_keys, ConfigManager};
pub use engine_config_trait::EngineConfigReader;
