use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use meridian_core::{
    Country, CountryLanguage, DomainError, DomainResult, EnabledCountry, GeoService, Language,
    PageRequest, PagedResult, ProvinceState, UserId,
};

use crate::clock::{Clock, SystemClock};

use super::seed;

/// Per-country mutable settings, keyed by canonical iso2.
#[derive(Debug, Clone, Default)]
struct CountrySettings {
    enabled: Option<(UserId, DateTime<Utc>)>,
    languages: Vec<CountryLanguage>,
}

/// In-memory geo service for tests/dev.
///
/// Reference data is immutable after construction; only the enablement and
/// language settings change. Country codes match case-insensitively.
#[derive(Debug)]
pub struct InMemoryGeoService {
    countries: Vec<Country>,
    languages: Vec<Language>,
    states: Vec<ProvinceState>,
    settings: RwLock<BTreeMap<String, CountrySettings>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryGeoService {
    /// Service backed by the built-in catalog.
    pub fn seeded() -> Self {
        Self::with_catalog(seed::countries(), seed::languages(), seed::states())
    }

    pub fn with_catalog(
        mut countries: Vec<Country>,
        mut languages: Vec<Language>,
        states: Vec<ProvinceState>,
    ) -> Self {
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        languages.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            countries,
            languages,
            states,
            settings: RwLock::new(BTreeMap::new()),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn country(&self, iso2: &str) -> DomainResult<&Country> {
        self.countries
            .iter()
            .find(|c| c.iso2.eq_ignore_ascii_case(iso2))
            .ok_or_else(|| DomainError::not_found(format!("country '{iso2}'")))
    }

    fn language(&self, code: &str) -> DomainResult<&Language> {
        self.languages
            .iter()
            .find(|l| l.code.eq_ignore_ascii_case(code))
            .ok_or_else(|| DomainError::not_found(format!("language '{code}'")))
    }

    fn settings_write(
        &self,
    ) -> DomainResult<std::sync::RwLockWriteGuard<'_, BTreeMap<String, CountrySettings>>> {
        self.settings
            .write()
            .map_err(|_| DomainError::unavailable("geo settings lock poisoned"))
    }
}

#[async_trait::async_trait]
impl GeoService for InMemoryGeoService {
    async fn get_countries(&self, page: PageRequest) -> DomainResult<PagedResult<Country>> {
        Ok(PagedResult::paginate(self.countries.clone(), page))
    }

    async fn get_languages(&self, page: PageRequest) -> DomainResult<PagedResult<Language>> {
        Ok(PagedResult::paginate(self.languages.clone(), page))
    }

    async fn get_enabled_countries(
        &self,
        page: PageRequest,
    ) -> DomainResult<PagedResult<EnabledCountry>> {
        let settings = self
            .settings
            .read()
            .map_err(|_| DomainError::unavailable("geo settings lock poisoned"))?;

        let enabled = self
            .countries
            .iter()
            .filter_map(|c| {
                let s = settings.get(&c.iso2)?;
                let (enabled_by, enabled_at) = s.enabled?;
                Some(EnabledCountry {
                    iso2: c.iso2.clone(),
                    name: c.name.clone(),
                    enabled_by,
                    enabled_at,
                    languages: s.languages.clone(),
                })
            })
            .collect();

        Ok(PagedResult::paginate(enabled, page))
    }

    async fn get_states(
        &self,
        page: PageRequest,
        iso2: Option<&str>,
    ) -> DomainResult<PagedResult<ProvinceState>> {
        let mut states: Vec<ProvinceState> = self
            .states
            .iter()
            .filter(|s| iso2.is_none_or(|iso2| s.country_iso2.eq_ignore_ascii_case(iso2)))
            .cloned()
            .collect();
        states.sort_by(|a, b| {
            a.country_iso2
                .cmp(&b.country_iso2)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(PagedResult::paginate(states, page))
    }

    async fn enable_disable_country(
        &self,
        iso2: &str,
        acting_user: UserId,
        enable: bool,
    ) -> DomainResult<()> {
        let iso2 = self.country(iso2)?.iso2.clone();
        let now = self.clock.now();
        let mut settings = self.settings_write()?;
        let entry = settings.entry(iso2.clone()).or_default();

        entry.enabled = match (enable, entry.enabled) {
            // Re-enabling keeps the original audit stamp.
            (true, Some(existing)) => Some(existing),
            (true, None) => Some((acting_user, now)),
            (false, _) => None,
        };
        tracing::info!(%iso2, %acting_user, enable, "country enablement changed");
        Ok(())
    }

    async fn set_country_language(
        &self,
        iso2: &str,
        language_code: &str,
        main: bool,
    ) -> DomainResult<()> {
        let iso2 = self.country(iso2)?.iso2.clone();
        let code = self.language(language_code)?.code.clone();
        let mut settings = self.settings_write()?;
        let entry = settings.entry(iso2.clone()).or_default();

        if main {
            for l in entry.languages.iter_mut() {
                l.main = false;
            }
        }
        match entry.languages.iter_mut().find(|l| l.code == code) {
            Some(existing) => existing.main = main,
            None => entry.languages.push(CountryLanguage {
                code: code.clone(),
                main,
            }),
        }
        tracing::info!(%iso2, language = %code, main, "country language set");
        Ok(())
    }
}
