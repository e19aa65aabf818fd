//! Geographic reference endpoints.
//!
//! Reads are anonymous and paginated; mutations require the admin role. Only
//! the unpaged country list goes through the data cache. Mutations do not
//! evict it, so it may lag an enable/disable by up to one sliding window.

use std::sync::Arc;

use axum::{
    Extension, Router,
    extract::Path,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch},
};

use meridian_core::{
    Country, DomainResult, EnabledCountry, Language, PageRequest, PagedResult, ProvinceState,
};
use meridian_infra::read_through;

use crate::app::dto::{
    CountryLanguageQuery, EventOutcome, LenientQuery, ModelAction, ModelType, PageQuery,
    PagedResponse, StatesQuery,
};
use crate::app::errors::ApiError;
use crate::app::services::{AppServices, DataCacheKey};
use crate::context::PrincipalContext;
use crate::middleware::{self, AuthState};

pub fn router(auth: AuthState) -> Router {
    let admin = Router::new()
        .route("/country/:iso2/enable", patch(patch_enable))
        .route("/country/:iso2/disable", patch(patch_disable))
        .route("/country/:iso2/lang/:language_code", patch(patch_country_language))
        .route_layer(from_fn(middleware::require_admin))
        .route_layer(from_fn_with_state(auth, middleware::auth_middleware));

    Router::new()
        .route("/countries", get(get_countries))
        .route("/countries/enabled", get(get_enabled_countries))
        .route("/languages", get(get_languages))
        .route("/states", get(get_province_states))
        .merge(admin)
}

// ─────────────────────────────────────────────────────────────────────────────
// Reads
// ─────────────────────────────────────────────────────────────────────────────

/// GET /geo/countries
pub async fn get_countries(
    Extension(services): Extension<Arc<AppServices>>,
    LenientQuery(query): LenientQuery<PageQuery>,
) -> Result<PagedResponse<Country>, ApiError> {
    Ok(countries(&services, query.page_request()).await?.into())
}

/// Paged requests go straight to the service; the default list is read through the cache.
pub async fn countries(
    services: &AppServices,
    page: PageRequest,
) -> DomainResult<PagedResult<Country>> {
    if page.is_paged() {
        return services.geo.get_countries(page).await;
    }

    read_through(
        services.country_cache.as_ref(),
        DataCacheKey::Countries,
        services.country_cache_options,
        || services.geo.get_countries(PageRequest::Unpaged),
    )
    .await
}

/// GET /geo/languages
pub async fn get_languages(
    Extension(services): Extension<Arc<AppServices>>,
    LenientQuery(query): LenientQuery<PageQuery>,
) -> Result<PagedResponse<Language>, ApiError> {
    let result = services.geo.get_languages(query.page_request()).await?;
    Ok(result.into())
}

/// GET /geo/countries/enabled
pub async fn get_enabled_countries(
    Extension(services): Extension<Arc<AppServices>>,
    LenientQuery(query): LenientQuery<PageQuery>,
) -> Result<PagedResponse<EnabledCountry>, ApiError> {
    let result = services
        .geo
        .get_enabled_countries(query.page_request())
        .await?;
    Ok(result.into())
}

/// GET /geo/states - `iso2` is handed to the service as received.
pub async fn get_province_states(
    Extension(services): Extension<Arc<AppServices>>,
    LenientQuery(query): LenientQuery<StatesQuery>,
) -> Result<PagedResponse<ProvinceState>, ApiError> {
    let result = services
        .geo
        .get_states(query.paging.page_request(), query.iso2())
        .await?;
    Ok(result.into())
}

// ─────────────────────────────────────────────────────────────────────────────
// Admin mutations
// ─────────────────────────────────────────────────────────────────────────────

/// PATCH /geo/country/:iso2/enable
pub async fn patch_enable(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(iso2): Path<String>,
) -> Result<EventOutcome, ApiError> {
    enable_disable_country(&services, &principal, &iso2, true).await
}

/// PATCH /geo/country/:iso2/disable
pub async fn patch_disable(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(iso2): Path<String>,
) -> Result<EventOutcome, ApiError> {
    enable_disable_country(&services, &principal, &iso2, false).await
}

pub async fn enable_disable_country(
    services: &AppServices,
    principal: &PrincipalContext,
    iso2: &str,
    enable: bool,
) -> Result<EventOutcome, ApiError> {
    if iso2.is_empty() {
        return Err(ApiError::BadRequest(None));
    }

    services
        .geo
        .enable_disable_country(iso2, principal.user_id(), enable)
        .await?;

    Ok(EventOutcome::success(ModelType::EnabledCountry, ModelAction::Update))
}

/// PATCH /geo/country/:iso2/lang/:language_code?main=
pub async fn patch_country_language(
    Extension(services): Extension<Arc<AppServices>>,
    Path((iso2, language_code)): Path<(String, String)>,
    LenientQuery(query): LenientQuery<CountryLanguageQuery>,
) -> Result<EventOutcome, ApiError> {
    set_country_language(&services, &iso2, &language_code, query.main).await
}

/// Country codes are stored upper case, language codes lower case.
pub async fn set_country_language(
    services: &AppServices,
    iso2: &str,
    language_code: &str,
    main: bool,
) -> Result<EventOutcome, ApiError> {
    if iso2.is_empty() || language_code.is_empty() {
        return Err(ApiError::invalid_parameters());
    }

    let iso2 = iso2.to_uppercase();
    let language_code = language_code.to_lowercase();
    services
        .geo
        .set_country_language(&iso2, &language_code, main)
        .await?;

    Ok(EventOutcome::success(ModelType::CountryLanguage, ModelAction::Update))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::num::NonZeroU32;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use chrono::{DateTime, Duration as ChronoDuration, Utc};

    use meridian_auth::Role;
    use meridian_core::{DomainError, GeoService, UserId};
    use meridian_infra::{CacheEntryOptions, CacheStore, Clock, ManualClock};

    use crate::app::dto::TOTAL_RECORDS_HEADER;
    use crate::app::errors::INVALID_REQUEST_PARAMETERS;
    use crate::app::services::CountryCache;

    fn country(iso2: &str) -> Country {
        Country {
            iso2: iso2.into(),
            iso3: format!("{iso2}X"),
            name: iso2.into(),
            capital: None,
            phone_code: None,
            currency: None,
        }
    }

    /// Geo service double that records every call.
    #[derive(Default)]
    struct RecordingGeo {
        country_calls: Mutex<Vec<PageRequest>>,
        state_filters: Mutex<Vec<Option<String>>>,
        enable_calls: Mutex<Vec<(String, UserId, bool)>>,
        language_calls: Mutex<Vec<(String, String, bool)>>,
        fail_with: Option<DomainError>,
    }

    impl RecordingGeo {
        fn country_calls(&self) -> usize {
            self.country_calls.lock().unwrap().len()
        }

        fn check(&self) -> DomainResult<()> {
            match &self.fail_with {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    #[async_trait::async_trait]
    impl GeoService for RecordingGeo {
        async fn get_countries(&self, page: PageRequest) -> DomainResult<PagedResult<Country>> {
            self.country_calls.lock().unwrap().push(page);
            let n = self.country_calls() as u64;
            Ok(PagedResult::new(vec![country("US"), country("CA")], 200 + n))
        }

        async fn get_languages(&self, _page: PageRequest) -> DomainResult<PagedResult<Language>> {
            let en = Language {
                code: "en".into(),
                name: "English".into(),
                native_name: None,
            };
            Ok(PagedResult::new(vec![en], 57))
        }

        async fn get_enabled_countries(
            &self,
            _page: PageRequest,
        ) -> DomainResult<PagedResult<EnabledCountry>> {
            Ok(PagedResult::empty())
        }

        async fn get_states(
            &self,
            _page: PageRequest,
            iso2: Option<&str>,
        ) -> DomainResult<PagedResult<ProvinceState>> {
            self.state_filters
                .lock()
                .unwrap()
                .push(iso2.map(str::to_string));
            Ok(PagedResult::empty())
        }

        async fn enable_disable_country(
            &self,
            iso2: &str,
            acting_user: UserId,
            enable: bool,
        ) -> DomainResult<()> {
            self.enable_calls
                .lock()
                .unwrap()
                .push((iso2.to_string(), acting_user, enable));
            self.check()
        }

        async fn set_country_language(
            &self,
            iso2: &str,
            language_code: &str,
            main: bool,
        ) -> DomainResult<()> {
            self.language_calls
                .lock()
                .unwrap()
                .push((iso2.to_string(), language_code.to_string(), main));
            self.check()
        }
    }

    /// Cache double driven by a manual clock that counts every interaction.
    struct SpyCache {
        clock: ManualClock,
        entries: Mutex<HashMap<DataCacheKey, SpyEntry>>,
        gets: AtomicUsize,
        sets: AtomicUsize,
    }

    struct SpyEntry {
        value: PagedResult<Country>,
        options: CacheEntryOptions,
        written_at: DateTime<Utc>,
        read_at: DateTime<Utc>,
    }

    impl SpyEntry {
        fn is_expired(&self, now: DateTime<Utc>) -> bool {
            let past = |since: DateTime<Utc>, window: Duration| {
                now >= since + ChronoDuration::from_std(window).unwrap()
            };
            self.options
                .sliding_expiration
                .is_some_and(|w| past(self.read_at, w))
                || self
                    .options
                    .absolute_expiration_relative_to_now
                    .is_some_and(|w| past(self.written_at, w))
        }
    }

    impl SpyCache {
        fn new(clock: ManualClock) -> Self {
            Self {
                clock,
                entries: Mutex::new(HashMap::new()),
                gets: AtomicUsize::new(0),
                sets: AtomicUsize::new(0),
            }
        }

        fn interactions(&self) -> usize {
            self.gets.load(Ordering::SeqCst) + self.sets.load(Ordering::SeqCst)
        }
    }

    impl CacheStore<DataCacheKey, PagedResult<Country>> for SpyCache {
        fn get(&self, key: &DataCacheKey) -> Option<PagedResult<Country>> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            let now = self.clock.now();
            let mut entries = self.entries.lock().unwrap();
            if entries.get(key)?.is_expired(now) {
                entries.remove(key);
                return None;
            }
            let entry = entries.get_mut(key)?;
            entry.read_at = now;
            Some(entry.value.clone())
        }

        fn set(&self, key: DataCacheKey, value: PagedResult<Country>, options: CacheEntryOptions) {
            self.sets.fetch_add(1, Ordering::SeqCst);
            let now = self.clock.now();
            let entry = SpyEntry {
                value,
                options,
                written_at: now,
                read_at: now,
            };
            self.entries.lock().unwrap().insert(key, entry);
        }
    }

    struct Fixture {
        services: Arc<AppServices>,
        geo: Arc<RecordingGeo>,
        cache: Arc<SpyCache>,
        clock: ManualClock,
    }

    fn fixture_with(geo: RecordingGeo) -> Fixture {
        let clock = ManualClock::default();
        let geo = Arc::new(geo);
        let cache = Arc::new(SpyCache::new(clock.clone()));
        let country_cache: Arc<CountryCache> = cache.clone();
        let services = AppServices::new(
            Arc::new(meridian_infra::InMemoryAccountService::new()),
            geo.clone(),
            country_cache,
            "http://localhost/login".parse().unwrap(),
        );
        Fixture {
            services: Arc::new(services),
            geo,
            cache,
            clock,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(RecordingGeo::default())
    }

    fn admin() -> PrincipalContext {
        PrincipalContext::new(UserId::new(), vec![Role::admin()])
    }

    fn paged(page: u32, size: u32) -> PageRequest {
        PageRequest::paged(NonZeroU32::new(page).unwrap(), NonZeroU32::new(size).unwrap())
    }

    #[tokio::test]
    async fn paged_country_requests_never_touch_the_cache() {
        let f = fixture();
        for _ in 0..3 {
            let result = countries(&f.services, paged(2, 10)).await.unwrap();
            assert_eq!(result.data.len(), 2);
        }
        assert_eq!(f.cache.interactions(), 0);
        assert_eq!(f.geo.country_calls(), 3);
        assert!(f.geo.country_calls.lock().unwrap().iter().all(|p| *p == paged(2, 10)));
    }

    #[tokio::test]
    async fn default_country_list_is_fetched_once_within_window() {
        let f = fixture();
        let first = countries(&f.services, PageRequest::Unpaged).await.unwrap();
        f.clock.advance(ChronoDuration::minutes(10));
        let second = countries(&f.services, PageRequest::Unpaged).await.unwrap();

        assert_eq!(f.geo.country_calls(), 1);
        assert_eq!(first, second);
        assert_eq!(
            f.geo.country_calls.lock().unwrap()[0],
            PageRequest::Unpaged
        );
    }

    #[tokio::test]
    async fn idle_cache_entry_expires_after_thirty_minutes() {
        let f = fixture();
        countries(&f.services, PageRequest::Unpaged).await.unwrap();

        f.clock.advance(ChronoDuration::minutes(30));
        let refreshed = countries(&f.services, PageRequest::Unpaged).await.unwrap();

        assert_eq!(f.geo.country_calls(), 2);
        assert_eq!(refreshed.total, 202);
    }

    #[tokio::test]
    async fn reads_slide_the_expiration_window() {
        let f = fixture();
        countries(&f.services, PageRequest::Unpaged).await.unwrap();
        for _ in 0..4 {
            f.clock.advance(ChronoDuration::minutes(29));
            countries(&f.services, PageRequest::Unpaged).await.unwrap();
        }
        assert_eq!(f.geo.country_calls(), 1);
    }

    #[tokio::test]
    async fn configured_ttl_is_respected() {
        let f = fixture();
        let services = (*f.services)
            .clone()
            .with_country_cache_ttl(Duration::from_secs(60));
        countries(&services, PageRequest::Unpaged).await.unwrap();
        f.clock.advance(ChronoDuration::seconds(61));
        countries(&services, PageRequest::Unpaged).await.unwrap();
        assert_eq!(f.geo.country_calls(), 2);
    }

    #[tokio::test]
    async fn total_header_reflects_service_total_not_page_length() {
        let f = fixture();
        let resp = get_languages(
            Extension(f.services.clone()),
            LenientQuery(PageQuery {
                page: Some(1),
                size: Some(1),
            }),
        )
        .await
        .unwrap()
        .into_response();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[TOTAL_RECORDS_HEADER], "57");
    }

    #[tokio::test]
    async fn states_filter_is_passed_through_unnormalized() {
        let f = fixture();
        let query = StatesQuery {
            paging: PageQuery::default(),
            iso2: Some("ca".into()),
        };
        get_province_states(Extension(f.services.clone()), LenientQuery(query))
            .await
            .unwrap();
        assert_eq!(
            f.geo.state_filters.lock().unwrap().as_slice(),
            &[Some("ca".to_string())]
        );
    }

    #[tokio::test]
    async fn enable_with_empty_code_is_rejected_without_calling_service() {
        let f = fixture();
        let err = enable_disable_country(&f.services, &admin(), "", true)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(None)));
        assert!(f.geo.enable_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn enable_passes_code_and_acting_user() {
        let f = fixture();
        let principal = admin();
        let outcome = enable_disable_country(&f.services, &principal, "US", true)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            EventOutcome::success(ModelType::EnabledCountry, ModelAction::Update)
        );
        assert_eq!(
            f.geo.enable_calls.lock().unwrap().as_slice(),
            &[("US".to_string(), principal.user_id(), true)]
        );
        assert_eq!(outcome.into_response().status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn disable_route_passes_false() {
        let f = fixture();
        let principal = admin();
        patch_disable(
            Extension(f.services.clone()),
            Extension(principal.clone()),
            Path("FR".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(
            f.geo.enable_calls.lock().unwrap().as_slice(),
            &[("FR".to_string(), principal.user_id(), false)]
        );
    }

    #[tokio::test]
    async fn language_codes_are_normalized() {
        let f = fixture();
        let outcome = set_country_language(&f.services, "us", "EN", false)
            .await
            .unwrap();
        assert_eq!(outcome.module, ModelType::CountryLanguage);
        assert_eq!(
            f.geo.language_calls.lock().unwrap().as_slice(),
            &[("US".to_string(), "en".to_string(), false)]
        );
    }

    #[tokio::test]
    async fn language_with_missing_parameters_is_rejected() {
        let f = fixture();
        for (iso2, code) in [("", "en"), ("us", "")] {
            let err = set_country_language(&f.services, iso2, code, false)
                .await
                .unwrap_err();
            assert!(
                matches!(&err, ApiError::BadRequest(Some(msg)) if msg == INVALID_REQUEST_PARAMETERS)
            );
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
        assert!(f.geo.language_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn service_errors_propagate() {
        let f = fixture_with(RecordingGeo {
            fail_with: Some(DomainError::not_found("country 'ZZ'")),
            ..RecordingGeo::default()
        });
        let err = enable_disable_country(&f.services, &admin(), "ZZ", true)
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn country_cache_is_not_evicted_by_mutations() {
        let f = fixture();
        countries(&f.services, PageRequest::Unpaged).await.unwrap();
        enable_disable_country(&f.services, &admin(), "US", false)
            .await
            .unwrap();
        countries(&f.services, PageRequest::Unpaged).await.unwrap();
        assert_eq!(f.geo.country_calls(), 1);
    }
}
