//! Geographic reference records and the geo service port.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DomainResult, PageRequest, PagedResult, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub iso2: String,
    pub iso3: String,
    pub name: String,
    pub capital: Option<String>,
    pub phone_code: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Lower-case language code (e.g. "en").
    pub code: String,
    pub name: String,
    pub native_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceState {
    pub code: String,
    pub name: String,
    pub country_iso2: String,
}

/// A language associated with a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryLanguage {
    pub code: String,
    /// Primary language of the country.
    pub main: bool,
}

/// A country switched on for use by the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledCountry {
    pub iso2: String,
    pub name: String,
    pub enabled_by: UserId,
    pub enabled_at: DateTime<Utc>,
    pub languages: Vec<CountryLanguage>,
}

/// Geographic reference service consumed by the API layer.
///
/// Implementations own persistence and business rules (what "main language"
/// replacement means, which countries exist, ...).
#[async_trait::async_trait]
pub trait GeoService: Send + Sync {
    async fn get_countries(&self, page: PageRequest) -> DomainResult<PagedResult<Country>>;

    async fn get_languages(&self, page: PageRequest) -> DomainResult<PagedResult<Language>>;

    async fn get_enabled_countries(
        &self,
        page: PageRequest,
    ) -> DomainResult<PagedResult<EnabledCountry>>;

    /// States/provinces, optionally restricted to one country.
    async fn get_states(
        &self,
        page: PageRequest,
        iso2: Option<&str>,
    ) -> DomainResult<PagedResult<ProvinceState>>;

    async fn enable_disable_country(
        &self,
        iso2: &str,
        acting_user: UserId,
        enable: bool,
    ) -> DomainResult<()>;

    async fn set_country_language(
        &self,
        iso2: &str,
        language_code: &str,
        main: bool,
    ) -> DomainResult<()>;
}
