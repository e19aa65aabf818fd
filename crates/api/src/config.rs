//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use url::Url;

const DEV_JWT_SECRET: &str = "dev-secret";

/// Front-end locations used to build redirects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlSettings {
    /// Base URL of the web client, e.g. `https://app.example.com`.
    pub web: String,
    /// Path of the login page appended to `web`, e.g. `/login`.
    pub login_page: String,
}

impl UrlSettings {
    /// `web` and `login_page` concatenated verbatim, then parsed.
    pub fn login_url(&self) -> Result<Url> {
        let raw = format!("{}{}", self.web, self.login_page);
        Url::parse(&raw)
            .with_context(|| format!("WEB_URL + LOGIN_PAGE is not a valid URL: '{raw}'"))
    }
}

#[derive(Clone, Debug)]
pub struct AppSettings {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub urls: UrlSettings,
    /// Sliding expiration of the cached default country list.
    pub country_cache_ttl: Duration,
    /// Register a closed `demo`/`demo` account in the in-memory account store.
    pub seed_demo_account: bool,
}

impl AppSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = match var("BIND_ADDR") {
            Some(v) => v
                .parse()
                .with_context(|| format!("BIND_ADDR must be a socket address, got '{v}'"))?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let urls = UrlSettings {
            web: var("WEB_URL").unwrap_or_else(|| "http://localhost:4200".into()),
            login_page: var("LOGIN_PAGE").unwrap_or_else(|| "/login".into()),
        };
        urls.login_url()?;

        let country_cache_ttl = match var("COUNTRY_CACHE_TTL_SECS") {
            Some(v) => {
                let secs: u64 = v.parse().with_context(|| {
                    format!("COUNTRY_CACHE_TTL_SECS must be an integer, got '{v}'")
                })?;
                if secs == 0 {
                    bail!("COUNTRY_CACHE_TTL_SECS must be positive");
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(30 * 60),
        };

        let seed_demo_account = match var("SEED_DEMO_ACCOUNT") {
            Some(v) => parse_bool("SEED_DEMO_ACCOUNT", &v)?,
            None => false,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            urls,
            country_cache_ttl,
            seed_demo_account,
        })
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => bail!("invalid boolean value '{other}' for {name}"),
    }
}
