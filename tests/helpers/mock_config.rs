// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use std::error::Error;
use window_profile_engine::config::EngineConfigReader;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockEngineConfig {
    pub cache_enabled: bool,
    pub positive_ttl_secs: u64,
    pub negative_ttl_secs: u64,
    pub call_timeout_ms: u64,
}

impl MockEngineConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            cache_enabled: true,
            positive_ttl_secs: 3600,
            negative_ttl_secs: 300,
            call_timeout_ms: 10_000,
        }
    }

    /// 短 TTL 配置
    pub fn short_ttl(positive: u64, negative: u64) -> Self {
        let mut config = Self::default();
        config.positive_ttl_secs = positive;
        config.negative_ttl_secs = negative;
        config
    }

    /// 不限时
    pub fn without_timeout() -> Self {
        let mut config = Self::default();
        config.call_timeout_ms = 0;
        config
    }
}

#[async_trait]
impl EngineConfigReader for MockEngineConfig {
    async fn get_cache_enabled(&self) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Ok(self.cache_enabled)
    }

    async fn get_cache_positive_ttl_secs(&self) -> Result<u64, Box<dyn Error + Send + Sync>> {
        Ok(self.positive_ttl_secs)
    }

    async fn get_cache_negative_ttl_secs(&self) -> Result<u64, Box<dyn Error + Send + Sync>> {
        Ok(self.negative_ttl_secs)
    }

    async fn get_catalog_call_timeout_ms(&self) -> Result<u64, Box<dyn Error + Send + Sync>> {
        Ok(self.call_timeout_ms)
    }
}
