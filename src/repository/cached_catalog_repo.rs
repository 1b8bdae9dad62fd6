// ==========================================
// 门窗型材引擎 - 目录读穿缓存
// ==========================================
// 职责: 包装任意 CatalogRepository，按查询族缓存结果
// 约束:
// - 找到/列表 使用正向 TTL；确认不存在 使用负向 TTL（短）
// - 错误不缓存，原样向上传播
// - 同一 key 同时最多一个上游请求（single-flight）
// - 调用方丢弃 future 即取消，key 锁随之释放，后续等待者接手
// - 过期条目每隔 SWEEP_INTERVAL 在写入时统一清扫
// ==========================================

use crate::config::CatalogCacheSettings;
use crate::domain::catalog::{
    Color, Profile, ProfileSystem, StockItem, SystemAvailableColor, SystemProfileListItem,
};
use crate::repository::catalog_repo::CatalogRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// 过期条目清扫间隔
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(2 * 3600);

// ==========================================
// CacheStats - 缓存统计
// ==========================================
/// misses = upstream_calls + coalesced（上游出错的请求也计入 upstream_calls）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// 首次检查即命中
    pub hits: u64,
    /// 首次检查未命中
    pub misses: u64,
    /// 实际发往上游的请求
    pub upstream_calls: u64,
    /// 未命中但等锁后由其他调用方的结果满足
    pub coalesced: u64,
}

#[derive(Default)]
struct StatCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    upstream_calls: AtomicU64,
    coalesced: AtomicU64,
}

// ==========================================
// TtlCache - 单查询族缓存
// ==========================================
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

struct Entries<K, V> {
    map: HashMap<K, CacheEntry<V>>,
    last_sweep: Instant,
}

struct TtlCache<K, V> {
    name: &'static str,
    entries: Mutex<Entries<K, V>>,
    key_locks: Mutex<HashMap<K, Arc<tokio::sync::Mutex<()>>>>,
}

/// 持有 key 锁的引用，drop 时（含调用方取消）尝试回收
struct KeyLockRelease<'a, K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    cache: &'a TtlCache<K, V>,
    key: K,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl<K, V> Drop for KeyLockRelease<'_, K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    fn drop(&mut self) {
        self.cache.release_key_lock(&self.key, &self.lock);
    }
}

fn lock_poisoned<E: std::fmt::Display>(e: E) -> RepositoryError {
    RepositoryError::LockError(format!("缓存锁获取失败: {}", e))
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Mutex::new(Entries {
                map: HashMap::new(),
                last_sweep: Instant::now(),
            }),
            key_locks: Mutex::new(HashMap::new()),
        }
    }

    /// 读取未过期条目；过期条目顺带移除
    fn lookup(&self, key: &K) -> RepositoryResult<Option<V>> {
        let mut entries = self.entries.lock().map_err(lock_poisoned)?;
        match entries.map.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.map.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// 写入条目；距上次清扫超过 SWEEP_INTERVAL 时先清掉所有过期条目
    fn store(&self, key: K, value: V, ttl: Duration) -> RepositoryResult<()> {
        let mut entries = self.entries.lock().map_err(lock_poisoned)?;
        let now = Instant::now();
        if now.duration_since(entries.last_sweep) >= SWEEP_INTERVAL {
            let before = entries.map.len();
            entries.map.retain(|_, entry| entry.expires_at > now);
            entries.last_sweep = now;
            debug!(
                cache = self.name,
                removed = before - entries.map.len(),
                "清扫过期条目"
            );
        }
        entries.map.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    fn clear(&self) -> RepositoryResult<()> {
        self.entries.lock().map_err(lock_poisoned)?.map.clear();
        Ok(())
    }

    #[cfg(test)]
    fn len(&self) -> RepositoryResult<usize> {
        Ok(self.entries.lock().map_err(lock_poisoned)?.map.len())
    }

    #[cfg(test)]
    fn pending_key_locks(&self) -> RepositoryResult<usize> {
        Ok(self.key_locks.lock().map_err(lock_poisoned)?.len())
    }

    fn key_lock(&self, key: &K) -> RepositoryResult<Arc<tokio::sync::Mutex<()>>> {
        let mut locks = self.key_locks.lock().map_err(lock_poisoned)?;
        Ok(locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone())
    }

    /// 只剩 map 与当前持有者两份引用时回收 key 锁
    fn release_key_lock(&self, key: &K, lock: &Arc<tokio::sync::Mutex<()>>) {
        if let Ok(mut locks) = self.key_locks.lock() {
            if Arc::strong_count(lock) <= 2 {
                locks.remove(key);
            }
        }
    }

    /// 读穿：命中直接返回；未命中在 key 锁内二次检查后请求上游
    async fn get_or_fetch<F, Fut>(
        &self,
        key: K,
        stats: &StatCounters,
        ttl_for: impl Fn(&V) -> Duration,
        fetch: F,
    ) -> RepositoryResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RepositoryResult<V>>,
    {
        if let Some(value) = self.lookup(&key)? {
            stats.hits.fetch_add(1, Ordering::Relaxed);
            debug!(cache = self.name, ?key, "Cache HIT");
            return Ok(value);
        }

        stats.misses.fetch_add(1, Ordering::Relaxed);

        let release = KeyLockRelease {
            cache: self,
            lock: self.key_lock(&key)?,
            key,
        };
        let _guard = release.lock.lock().await;

        // 等锁期间可能已由其他调用方填充
        if let Some(value) = self.lookup(&release.key)? {
            stats.coalesced.fetch_add(1, Ordering::Relaxed);
            debug!(cache = self.name, key = ?release.key, "Cache HIT (coalesced)");
            return Ok(value);
        }

        stats.upstream_calls.fetch_add(1, Ordering::Relaxed);
        debug!(cache = self.name, key = ?release.key, "Cache MISS");

        let value = fetch().await?;
        self.store(release.key.clone(), value.clone(), ttl_for(&value))?;
        Ok(value)
    }
}

// ==========================================
// CachedCatalogRepository - 缓存装饰器
// ==========================================
pub struct CachedCatalogRepository<R>
where
    R: CatalogRepository,
{
    inner: Arc<R>,
    settings: CatalogCacheSettings,
    stats: StatCounters,
    systems_by_type: TtlCache<String, Vec<ProfileSystem>>,
    available_colors: TtlCache<i64, Vec<SystemAvailableColor>>,
    colors: TtlCache<i64, Option<Color>>,
    role_lists: TtlCache<(i64, String), Vec<SystemProfileListItem>>,
    profiles: TtlCache<i64, Option<Profile>>,
    stock_items: TtlCache<(i64, i64), Option<StockItem>>,
}

impl<R> CachedCatalogRepository<R>
where
    R: CatalogRepository,
{
    /// 创建缓存装饰器
    ///
    /// # 参数
    /// - inner: 上游目录仓储
    /// - settings: TTL / 超时 / 开关
    pub fn new(inner: Arc<R>, settings: CatalogCacheSettings) -> Self {
        Self {
            inner,
            settings,
            stats: StatCounters::default(),
            systems_by_type: TtlCache::new("systems_by_type"),
            available_colors: TtlCache::new("available_colors"),
            colors: TtlCache::new("colors"),
            role_lists: TtlCache::new("role_lists"),
            profiles: TtlCache::new("profiles"),
            stock_items: TtlCache::new("stock_items"),
        }
    }

    pub fn settings(&self) -> &CatalogCacheSettings {
        &self.settings
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            upstream_calls: self.stats.upstream_calls.load(Ordering::Relaxed),
            coalesced: self.stats.coalesced.load(Ordering::Relaxed),
        }
    }

    /// 清空所有缓存条目
    pub fn invalidate_all(&self) -> RepositoryResult<()> {
        self.systems_by_type.clear()?;
        self.available_colors.clear()?;
        self.colors.clear()?;
        self.role_lists.clear()?;
        self.profiles.clear()?;
        self.stock_items.clear()?;
        Ok(())
    }

    /// 调用上游，按配置施加超时
    async fn call_upstream<T, Fut>(&self, operation: &str, fut: Fut) -> RepositoryResult<T>
    where
        Fut: Future<Output = RepositoryResult<T>>,
    {
        match self.settings.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(operation, timeout_ms = limit.as_millis() as u64, "目录访问超时");
                    Err(RepositoryError::Timeout {
                        operation: operation.to_string(),
                        timeout_ms: limit.as_millis() as u64,
                    })
                }
            },
            None => fut.await,
        }
    }

    fn list_ttl<T>(&self) -> impl Fn(&Vec<T>) -> Duration {
        let ttl = self.settings.positive_ttl;
        move |_| ttl
    }

    fn optional_ttl<T>(&self) -> impl Fn(&Option<T>) -> Duration {
        let positive = self.settings.positive_ttl;
        let negative = self.settings.negative_ttl;
        move |value| if value.is_some() { positive } else { negative }
    }
}

#[async_trait]
impl<R> CatalogRepository for CachedCatalogRepository<R>
where
    R: CatalogRepository,
{
    async fn get_profile_systems_by_type(
        &self,
        system_type: &str,
    ) -> RepositoryResult<Vec<ProfileSystem>> {
        let fetch = || {
            self.call_upstream(
                "get_profile_systems_by_type",
                self.inner.get_profile_systems_by_type(system_type),
            )
        };
        if !self.settings.enabled {
            return fetch().await;
        }
        self.systems_by_type
            .get_or_fetch(system_type.to_string(), &self.stats, self.list_ttl(), fetch)
            .await
    }

    async fn get_system_available_colors(
        &self,
        system_id: i64,
    ) -> RepositoryResult<Vec<SystemAvailableColor>> {
        let fetch = || {
            self.call_upstream(
                "get_system_available_colors",
                self.inner.get_system_available_colors(system_id),
            )
        };
        if !self.settings.enabled {
            return fetch().await;
        }
        self.available_colors
            .get_or_fetch(system_id, &self.stats, self.list_ttl(), fetch)
            .await
    }

    async fn get_color_by_id(&self, color_id: i64) -> RepositoryResult<Option<Color>> {
        let fetch = || self.call_upstream("get_color_by_id", self.inner.get_color_by_id(color_id));
        if !self.settings.enabled {
            return fetch().await;
        }
        self.colors
            .get_or_fetch(color_id, &self.stats, self.optional_ttl(), fetch)
            .await
    }

    async fn get_system_profile_list_items(
        &self,
        system_id: i64,
        role: &str,
    ) -> RepositoryResult<Vec<SystemProfileListItem>> {
        let fetch = || {
            self.call_upstream(
                "get_system_profile_list_items",
                self.inner.get_system_profile_list_items(system_id, role),
            )
        };
        if !self.settings.enabled {
            return fetch().await;
        }
        self.role_lists
            .get_or_fetch(
                (system_id, role.to_string()),
                &self.stats,
                self.list_ttl(),
                fetch,
            )
            .await
    }

    async fn get_profile_by_id(&self, profile_id: i64) -> RepositoryResult<Option<Profile>> {
        let fetch =
            || self.call_upstream("get_profile_by_id", self.inner.get_profile_by_id(profile_id));
        if !self.settings.enabled {
            return fetch().await;
        }
        self.profiles
            .get_or_fetch(profile_id, &self.stats, self.optional_ttl(), fetch)
            .await
    }

    async fn get_stock_item(
        &self,
        profile_id: i64,
        color_id: i64,
    ) -> RepositoryResult<Option<StockItem>> {
        let fetch = || {
            self.call_upstream(
                "get_stock_item",
                self.inner.get_stock_item(profile_id, color_id),
            )
        };
        if !self.settings.enabled {
            return fetch().await;
        }
        self.stock_items
            .get_or_fetch(
                (profile_id, color_id),
                &self.stats,
                self.optional_ttl(),
                fetch,
            )
            .await
    }
}
