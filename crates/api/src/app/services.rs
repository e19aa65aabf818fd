//! Collaborators shared by every handler.

use std::sync::Arc;
use std::time::Duration;

use meridian_core::{AccountService, Country, GeoService, PagedResult};
use meridian_infra::{
    AccountStatus, CacheEntryOptions, CacheStore, InMemoryAccountService, InMemoryGeoService,
    MokaCache,
};
use url::Url;

use crate::config::AppSettings;

/// Keys of the process-wide data cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataCacheKey {
    /// Default (unpaged) country list.
    Countries,
}

pub type CountryCache = dyn CacheStore<DataCacheKey, PagedResult<Country>>;

/// Handler dependencies, injected once at router construction.
#[derive(Clone)]
pub struct AppServices {
    pub account: Arc<dyn AccountService>,
    pub geo: Arc<dyn GeoService>,
    pub country_cache: Arc<CountryCache>,
    pub country_cache_options: CacheEntryOptions,
    /// Redirect target after a successful account reopen.
    pub login_url: Url,
}

impl AppServices {
    pub fn new(
        account: Arc<dyn AccountService>,
        geo: Arc<dyn GeoService>,
        country_cache: Arc<CountryCache>,
        login_url: Url,
    ) -> Self {
        Self {
            account,
            geo,
            country_cache,
            country_cache_options: country_cache_options(Duration::from_secs(30 * 60)),
            login_url,
        }
    }

    pub fn with_country_cache_ttl(mut self, ttl: Duration) -> Self {
        self.country_cache_options = country_cache_options(ttl);
        self
    }
}

/// Sliding window: the entry expires only after `ttl` without access. The
/// store is unbounded, so size pressure never evicts it.
pub fn country_cache_options(ttl: Duration) -> CacheEntryOptions {
    CacheEntryOptions::sliding(ttl)
}

/// Wire the in-memory collaborators used by the binary.
pub fn build_services(settings: &AppSettings) -> anyhow::Result<AppServices> {
    let account = Arc::new(InMemoryAccountService::new());
    if settings.seed_demo_account {
        tracing::warn!("seeding closed demo account 'demo'");
        account.insert("demo", "demo", AccountStatus::Closed);
    }

    let cache: MokaCache<DataCacheKey, PagedResult<Country>> = MokaCache::new();

    let services = AppServices::new(
        account,
        Arc::new(InMemoryGeoService::seeded()),
        Arc::new(cache),
        settings.urls.login_url()?,
    )
    .with_country_cache_ttl(settings.country_cache_ttl);

    Ok(services)
}
