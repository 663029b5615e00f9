//! OAuth scope handling for Shopify API.
//!
//! This module provides the [`AuthScopes`] type for the scopes an app requests
//! during install, and for comparing them against the scopes Shopify grants.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// An ordered set of OAuth scopes.
///
/// Scopes keep the order they were configured in so the authorization URL
/// carries exactly what the operator wrote. Duplicates are dropped.
///
/// # Implied Scopes
///
/// When checking coverage, Shopify's implied scopes are honored:
/// - `write_products` implies `read_products`
/// - `unauthenticated_write_products` implies `unauthenticated_read_products`
///
/// # Example
///
/// ```rust
/// use shopify_connect::AuthScopes;
///
/// let requested: AuthScopes = "read_products, write_orders".parse().unwrap();
/// assert_eq!(requested.to_string(), "read_products,write_orders");
///
/// let granted: AuthScopes = "write_products,write_orders".parse().unwrap();
/// assert!(granted.covers(&requested));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AuthScopes {
    scopes: Vec<String>,
}

impl AuthScopes {
    /// Creates an empty scope set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the scope set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Returns the number of distinct scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Returns an iterator over the scopes in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(String::as_str)
    }

    /// Returns `true` if this scope set covers every scope in `other`,
    /// taking implied read scopes into account.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        other.iter().all(|wanted| {
            self.iter()
                .any(|held| held == wanted || Self::implied_scope(held).as_deref() == Some(wanted))
        })
    }

    fn implied_scope(scope: &str) -> Option<String> {
        scope
            .strip_prefix("unauthenticated_write_")
            .map(|rest| format!("unauthenticated_read_{rest}"))
            .or_else(|| {
                scope
                    .strip_prefix("write_")
                    .map(|rest| format!("read_{rest}"))
            })
    }
}

impl FromStr for AuthScopes {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scopes: Vec<String> = Vec::new();

        for scope in s.split(',') {
            let scope = scope.trim();
            if scope.is_empty() {
                continue;
            }

            if !scope.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(ConfigError::InvalidScopes {
                    reason: format!("Invalid characters in scope: '{scope}'"),
                });
            }

            if !scopes.iter().any(|s| s == scope) {
                scopes.push(scope.to_string());
            }
        }

        Ok(Self { scopes })
    }
}

impl fmt::Display for AuthScopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.scopes.join(","))
    }
}
