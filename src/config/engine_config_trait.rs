// ==========================================
// 门窗型材引擎 - 引擎配置读取 Trait
// ==========================================
// 职责: 定义目录缓存所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// EngineConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait EngineConfigReader: Send + Sync {
    // ===== 目录缓存 =====

    /// 是否启用目录缓存
    ///
    /// # 默认值
    /// - true
    async fn get_cache_enabled(&self) -> Result<bool, Box<dyn Error + Send + Sync>>;

    /// 找到记录/列表的缓存时长（秒）
    ///
    /// # 默认值
    /// - 3600
    async fn get_cache_positive_ttl_secs(&self) -> Result<u64, Box<dyn Error + Send + Sync>>;

    /// "确认不存在" 的缓存时长（秒）
    ///
    /// # 默认值
    /// - 300
    ///
    /// # 用途
    /// - 目录补录后较快可见
    async fn get_cache_negative_ttl_secs(&self) -> Result<u64, Box<dyn Error + Send + Sync>>;

    // ===== 目录访问 =====

    /// 单次目录调用超时（毫秒），0 表示不限
    ///
    /// # 默认值
    /// - 10000
    async fn get_catalog_call_timeout_ms(&self) -> Result<u64, Box<dyn Error + Send + Sync>>;
}
