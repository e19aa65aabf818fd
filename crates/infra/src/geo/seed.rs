//! Built-in reference catalog for dev/test runs.

use meridian_core::{Country, Language, ProvinceState};

fn country(
    iso2: &str,
    iso3: &str,
    name: &str,
    capital: &str,
    phone_code: &str,
    currency: &str,
) -> Country {
    Country {
        iso2: iso2.into(),
        iso3: iso3.into(),
        name: name.into(),
        capital: Some(capital.into()),
        phone_code: Some(phone_code.into()),
        currency: Some(currency.into()),
    }
}

pub fn countries() -> Vec<Country> {
    vec![
        country("AR", "ARG", "Argentina", "Buenos Aires", "54", "ARS"),
        country("AU", "AUS", "Australia", "Canberra", "61", "AUD"),
        country("BR", "BRA", "Brazil", "Brasília", "55", "BRL"),
        country("CA", "CAN", "Canada", "Ottawa", "1", "CAD"),
        country("DE", "DEU", "Germany", "Berlin", "49", "EUR"),
        country("ES", "ESP", "Spain", "Madrid", "34", "EUR"),
        country("FR", "FRA", "France", "Paris", "33", "EUR"),
        country("GB", "GBR", "United Kingdom", "London", "44", "GBP"),
        country("IN", "IND", "India", "New Delhi", "91", "INR"),
        country("IT", "ITA", "Italy", "Rome", "39", "EUR"),
        country("JP", "JPN", "Japan", "Tokyo", "81", "JPY"),
        country("MX", "MEX", "Mexico", "Mexico City", "52", "MXN"),
        country("PT", "PRT", "Portugal", "Lisbon", "351", "EUR"),
        country("US", "USA", "United States", "Washington, D.C.", "1", "USD"),
    ]
}

pub fn languages() -> Vec<Language> {
    [
        ("de", "German", "Deutsch"),
        ("en", "English", "English"),
        ("es", "Spanish", "Español"),
        ("fr", "French", "Français"),
        ("hi", "Hindi", "हिन्दी"),
        ("it", "Italian", "Italiano"),
        ("ja", "Japanese", "日本語"),
        ("pt", "Portuguese", "Português"),
    ]
    .into_iter()
    .map(|(code, name, native)| Language {
        code: code.into(),
        name: name.into(),
        native_name: Some(native.into()),
    })
    .collect()
}

pub fn states() -> Vec<ProvinceState> {
    [
        ("US", "CA", "California"),
        ("US", "FL", "Florida"),
        ("US", "NY", "New York"),
        ("US", "TX", "Texas"),
        ("US", "WA", "Washington"),
        ("CA", "BC", "British Columbia"),
        ("CA", "ON", "Ontario"),
        ("CA", "QC", "Quebec"),
        ("BR", "RJ", "Rio de Janeiro"),
        ("BR", "SP", "São Paulo"),
        ("MX", "JAL", "Jalisco"),
        ("AU", "NSW", "New South Wales"),
        ("AU", "VIC", "Victoria"),
    ]
    .into_iter()
    .map(|(iso2, code, name)| ProvinceState {
        code: code.into(),
        name: name.into(),
        country_iso2: iso2.into(),
    })
    .collect()
}
