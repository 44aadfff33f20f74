//! Client configuration and API credentials.
//!
//! # Design
//! `ClientConfig` can be built in code, loaded from JSON, or read from the
//! `SMARTERU_*` environment variables. The not-found table maps a method to
//! the vendor error codes that mean "the record does not exist"; lookups that
//! fail with one of those codes return `None` instead of an error.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::method::Method;
use crate::types::ErrorCode;

pub const DEFAULT_ENDPOINT: &str = "https://api.smarteru.com/apiv2/";

/// Placeholder written over both API keys in logged requests.
pub const REDACTED: &str = "********";

pub const ACCOUNT_KEY_VAR: &str = "SMARTERU_ACCOUNT_KEY";
pub const USER_KEY_VAR: &str = "SMARTERU_USER_KEY";
pub const ENDPOINT_VAR: &str = "SMARTERU_ENDPOINT";

/// The account-level and user-level API keys embedded in every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    account_api_key: String,
    user_api_key: String,
}

impl Credentials {
    pub fn new(account_api_key: impl Into<String>, user_api_key: impl Into<String>) -> Self {
        Self {
            account_api_key: account_api_key.into(),
            user_api_key: user_api_key.into(),
        }
    }

    pub fn account_api_key(&self) -> &str {
        &self.account_api_key
    }

    pub fn user_api_key(&self) -> &str {
        &self.user_api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_api_key", &REDACTED)
            .field("user_api_key", &REDACTED)
            .finish()
    }
}

#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub account_api_key: String,
    pub user_api_key: String,
    #[serde(default = "default_not_found_codes")]
    pub not_found_codes: HashMap<Method, Vec<String>>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_not_found_codes() -> HashMap<Method, Vec<String>> {
    HashMap::from([(Method::GetUser, vec!["GU:03".to_string()])])
}

impl ClientConfig {
    pub fn new(account_api_key: impl Into<String>, user_api_key: impl Into<String>) -> Self {
        Self {
            endpoint: default_endpoint(),
            account_api_key: account_api_key.into(),
            user_api_key: user_api_key.into(),
            not_found_codes: default_not_found_codes(),
        }
    }

    /// Read the keys from `SMARTERU_ACCOUNT_KEY` / `SMARTERU_USER_KEY`, and
    /// the endpoint from `SMARTERU_ENDPOINT` when it is set.
    pub fn from_env() -> Result<Self> {
        let account = std::env::var(ACCOUNT_KEY_VAR)
            .map_err(|_| Error::missing(format!("{ACCOUNT_KEY_VAR} is not set")))?;
        let user = std::env::var(USER_KEY_VAR)
            .map_err(|_| Error::missing(format!("{USER_KEY_VAR} is not set")))?;
        let mut config = Self::new(account, user);
        if let Ok(endpoint) = std::env::var(ENDPOINT_VAR) {
            config.endpoint = endpoint;
        }
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::invalid(format!("invalid client config: {e}")))
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Add `code` to the codes that mean "not found" for `method`.
    pub fn with_not_found_code(mut self, method: Method, code: impl Into<String>) -> Self {
        self.not_found_codes.entry(method).or_default().push(code.into());
        self
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.account_api_key, &self.user_api_key)
    }

    pub fn is_not_found(&self, method: Method, errors: &[ErrorCode]) -> bool {
        self.not_found_codes
            .get(&method)
            .is_some_and(|codes| errors.iter().any(|e| codes.contains(&e.error_code)))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("account_api_key", &REDACTED)
            .field("user_api_key", &REDACTED)
            .field("not_found_codes", &self.not_found_codes)
            .finish()
    }
}
