// ==========================================
// 门窗型材引擎 - 目录缓存设置
// ==========================================

use crate::config::engine_config_trait::EngineConfigReader;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;

pub const DEFAULT_POSITIVE_TTL_SECS: u64 = 3600;
pub const DEFAULT_NEGATIVE_TTL_SECS: u64 = 300;
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 10_000;

/// 目录缓存设置（由 EngineConfigReader 一次性读出）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCacheSettings {
    pub enabled: bool,
    pub positive_ttl: Duration,
    pub negative_ttl: Duration,
    /// None 表示不限时
    pub call_timeout: Option<Duration>,
}

impl Default for CatalogCacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            positive_ttl: Duration::from_secs(DEFAULT_POSITIVE_TTL_SECS),
            negative_ttl: Duration::from_secs(DEFAULT_NEGATIVE_TTL_SECS),
            call_timeout: Some(Duration::from_millis(DEFAULT_CALL_TIMEOUT_MS)),
        }
    }
}

impl CatalogCacheSettings {
    /// 从配置读取器加载
    pub async fn load<C>(config: &C) -> Result<Self, Box<dyn Error + Send + Sync>>
    where
        C: EngineConfigReader + ?Sized,
    {
        let timeout_ms = config.get_catalog_call_timeout_ms().await?;

        Ok(Self {
            enabled: config.get_cache_enabled().await?,
            positive_ttl: Duration::from_secs(config.get_cache_positive_ttl_secs().await?),
            negative_ttl: Duration::from_secs(config.get_cache_negative_ttl_secs().await?),
            call_timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
        })
    }
}
