use axum::{
    Json, async_trait,
    extract::{FromRequestParts, Query},
    http::{HeaderName, HeaderValue, StatusCode, Uri, request::Parts},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer, Serialize};

use meridian_core::{PageRequest, PagedResult};

use crate::app::errors::ApiError;

/// Response header carrying the full matching count of a paged listing.
pub const TOTAL_RECORDS_HEADER: HeaderName = HeaderName::from_static("x-total-records");

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub password: String,
}

impl LoginInput {
    /// Model validation; returns every violation, not just the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.username.trim().is_empty() {
            errors.push("username is required".to_string());
        }
        if self.password.is_empty() {
            errors.push("password is required".to_string());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw query string pairs in request order.
///
/// Repeated keys are kept and readers take the first value, so a query string
/// never fails to bind because of its content.
#[derive(Debug, Default)]
pub struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    pub fn from_uri(uri: &Uri) -> Result<Self, ApiError> {
        Query::<Vec<(String, String)>>::try_from_uri(uri)
            .map(|Query(pairs)| Self(pairs))
            .map_err(|rejection| ApiError::BadRequest(Some(rejection.body_text())))
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Query DTOs built leniently from [`QueryPairs`].
pub trait FromQueryPairs: Sized {
    fn from_pairs(pairs: &QueryPairs) -> Self;
}

/// Extractor for [`FromQueryPairs`] types; rejections use the [`ApiError`] body.
#[derive(Debug)]
pub struct LenientQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for LenientQuery<T>
where
    T: FromQueryPairs,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = QueryPairs::from_uri(&parts.uri)?;
        Ok(Self(T::from_pairs(&pairs)))
    }
}

/// `?page=&size=`; unparsable values read as absent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_raw(self.page, self.size)
    }
}

impl FromQueryPairs for PageQuery {
    fn from_pairs(pairs: &QueryPairs) -> Self {
        let int = |key| pairs.first(key).and_then(|v| v.trim().parse().ok());
        Self {
            page: int("page"),
            size: int("size"),
        }
    }
}

#[derive(Debug, Default)]
pub struct StatesQuery {
    pub paging: PageQuery,
    pub iso2: Option<String>,
}

impl StatesQuery {
    /// Country filter; an empty value means no filter.
    pub fn iso2(&self) -> Option<&str> {
        self.iso2.as_deref().filter(|s| !s.is_empty())
    }
}

impl FromQueryPairs for StatesQuery {
    fn from_pairs(pairs: &QueryPairs) -> Self {
        Self {
            paging: PageQuery::from_pairs(pairs),
            iso2: pairs.first("iso2").map(str::to_string),
        }
    }
}

/// `?main=`; only `true` and `1` (any case) set the flag.
#[derive(Debug, Default)]
pub struct CountryLanguageQuery {
    pub main: bool,
}

impl FromQueryPairs for CountryLanguageQuery {
    fn from_pairs(pairs: &QueryPairs) -> Self {
        let main = pairs
            .first("main")
            .map(|v| v.trim().to_ascii_lowercase())
            .is_some_and(|v| v == "true" || v == "1");
        Self { main }
    }
}

// -------------------------
// Response shapes
// -------------------------

/// A page of records: JSON array body plus the total in [`TOTAL_RECORDS_HEADER`].
#[derive(Debug)]
pub struct PagedResponse<T>(pub PagedResult<T>);

impl<T> From<PagedResult<T>> for PagedResponse<T> {
    fn from(value: PagedResult<T>) -> Self {
        Self(value)
    }
}

impl<T: Serialize> IntoResponse for PagedResponse<T> {
    fn into_response(self) -> Response {
        let PagedResult { data, total } = self.0;
        let mut resp = (StatusCode::OK, Json(data)).into_response();
        resp.headers_mut()
            .insert(TOTAL_RECORDS_HEADER, HeaderValue::from(total));
        resp
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModelType {
    EnabledCountry,
    CountryLanguage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModelAction {
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventStatus {
    Success,
}

/// Success envelope for mutations: which model changed, how, and the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventOutcome {
    pub module: ModelType,
    pub action: ModelAction,
    pub status: EventStatus,
}

impl EventOutcome {
    pub fn success(module: ModelType, action: ModelAction) -> Self {
        Self {
            module,
            action,
            status: EventStatus::Success,
        }
    }
}

impl IntoResponse for EventOutcome {
    fn into_response(self) -> Response {
        tracing::info!(
            module = ?self.module,
            action = ?self.action,
            status = ?self.status,
            "model event"
        );
        (StatusCode::OK, Json(self)).into_response()
    }
}
