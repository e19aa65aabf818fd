//! `meridian-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure or HTTP
//! concerns): identifiers, the domain error model, pagination, the geographic
//! reference records, and the service ports the API layer depends on.

pub mod account;
pub mod error;
pub mod geo;
pub mod id;
pub mod paging;

pub use account::AccountService;
pub use error::{DomainError, DomainResult};
pub use geo::{Country, CountryLanguage, EnabledCountry, GeoService, Language, ProvinceState};
pub use id::UserId;
pub use paging::{PageRequest, PagedResult};
