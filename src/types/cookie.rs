//! Cookie schemas.
//!
//! A cookie schema is a plain object schema with cookie directives attached
//! alongside it. The directives take no part in validation; the code that
//! reads and writes cookies looks them up through
//! [`Schema::cookie_options`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypesError;
use crate::schema::{ObjectOptions, Schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookiePriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookieSameSite {
    Strict,
    Lax,
    None,
}

/// One signing secret, or a rotation list with the current secret first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Secrets {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for Secrets {
    fn from(secret: &str) -> Self {
        Secrets::One(secret.to_string())
    }
}

impl From<Vec<&str>> for Secrets {
    fn from(secrets: Vec<&str>) -> Self {
        Secrets::Many(secrets.into_iter().map(String::from).collect())
    }
}

/// Directives for the cookies a schema describes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CookieOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    /// Seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<CookiePriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<CookieSameSite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<Secrets>,
    /// Names of the properties whose values must be signed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sign: Vec<String>,
}

impl CookieOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = Some(http_only);
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    pub fn same_site(mut self, same_site: CookieSameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn secrets(mut self, secrets: impl Into<Secrets>) -> Self {
        self.secrets = Some(secrets.into());
        self
    }

    pub fn sign<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sign = names.into_iter().map(Into::into).collect();
        self
    }

    /// All secrets in rotation order
    pub fn secret_list(&self) -> Vec<&str> {
        match &self.secrets {
            None => Vec::new(),
            Some(Secrets::One(secret)) => vec![secret.as_str()],
            Some(Secrets::Many(secrets)) => secrets.iter().map(String::as_str).collect(),
        }
    }

    /// The secret new signatures are made with
    pub fn signing_secret(&self) -> Option<&str> {
        self.secret_list().into_iter().next()
    }

    pub fn requires_signature(&self, name: &str) -> bool {
        self.sign.iter().any(|n| n == name)
    }

    /// Copy the directives onto an outgoing cookie
    ///
    /// `priority` has no counterpart in the `cookie` crate and is skipped.
    #[cfg(feature = "cookies")]
    pub fn apply_to(&self, cookie: &mut cookie::Cookie<'_>) {
        use cookie::SameSite;
        use cookie::time::{Duration, OffsetDateTime};

        if let Some(domain) = &self.domain {
            cookie.set_domain(domain.clone());
        }
        if let Some(path) = &self.path {
            cookie.set_path(path.clone());
        }
        if let Some(http_only) = self.http_only {
            cookie.set_http_only(http_only);
        }
        if let Some(secure) = self.secure {
            cookie.set_secure(secure);
        }
        if let Some(same_site) = self.same_site {
            cookie.set_same_site(match same_site {
                CookieSameSite::Strict => SameSite::Strict,
                CookieSameSite::Lax => SameSite::Lax,
                CookieSameSite::None => SameSite::None,
            });
        }
        if let Some(seconds) = self.max_age {
            cookie.set_max_age(Duration::seconds(seconds));
        }
        if let Some(expires) = self.expires {
            match OffsetDateTime::from_unix_timestamp(expires.timestamp()) {
                Ok(at) => cookie.set_expires(at),
                Err(e) => tracing::warn!(error = %e, "Cookie expiry out of range, leaving it unset"),
            }
        }
    }
}

/// Caller options for `t.cookie`: directives and object constraints in one bag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CookieSchemaOptions {
    #[serde(flatten)]
    pub cookie: CookieOptions,
    #[serde(flatten)]
    pub object: ObjectOptions,
}

impl CookieSchemaOptions {
    pub fn new(cookie: CookieOptions, object: ObjectOptions) -> Self {
        Self { cookie, object }
    }

    /// Split a JSON options bag into directives and object constraints
    pub fn from_json(options: serde_json::Value) -> crate::Result<Self> {
        serde_json::from_value(options).map_err(|e| TypesError::invalid_option(e.to_string()))
    }
}

pub(crate) fn schema(properties: BTreeMap<String, Schema>, options: CookieSchemaOptions) -> Schema {
    Schema::object(properties, options.object).with_cookie(options.cookie)
}
