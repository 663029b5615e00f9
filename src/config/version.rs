//! Shopify Admin API version selection.
//!
//! This module provides the [`ApiVersion`] type used to build versioned
//! Admin API paths such as `/admin/api/2023-04/shop.json`.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Shopify Admin API version.
///
/// Shopify releases stable versions quarterly (January, April, July, October),
/// named `YYYY-MM`. The `Unstable` variant targets the preview API.
///
/// # Example
///
/// ```rust
/// use shopify_connect::ApiVersion;
///
/// let version: ApiVersion = "2024-10".parse().unwrap();
/// assert_eq!(version.to_string(), "2024-10");
/// assert!(version.is_stable());
///
/// assert_eq!(ApiVersion::default().to_string(), "2023-04");
/// assert_eq!(
///     ApiVersion::default().admin_path("shop.json"),
///     "/admin/api/2023-04/shop.json"
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// A quarterly stable release.
    Stable {
        /// Four-digit release year.
        year: u16,
        /// Release month: 1, 4, 7 or 10.
        month: u8,
    },
    /// Unstable API version for development and testing.
    Unstable,
}

impl ApiVersion {
    /// Version used for the store lookup when none is configured.
    pub const DEFAULT: Self = Self::Stable {
        year: 2023,
        month: 4,
    };

    /// Returns `true` for quarterly releases, `false` for `Unstable`.
    #[must_use]
    pub const fn is_stable(&self) -> bool {
        matches!(self, Self::Stable { .. })
    }

    /// Builds an Admin REST path for `resource` under this version.
    #[must_use]
    pub fn admin_path(&self, resource: &str) -> String {
        format!("/admin/api/{self}/{}", resource.trim_start_matches('/'))
    }

    fn parse_stable(s: &str) -> Option<Self> {
        let (year, month) = s.split_once('-')?;
        if year.len() != 4 || month.len() != 2 {
            return None;
        }
        if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
            return None;
        }

        let year: u16 = year.parse().ok()?;
        let month: u8 = month.parse().ok()?;

        // Quarterly releases only
        matches!(month, 1 | 4 | 7 | 10).then_some(Self::Stable { year, month })
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable { year, month } => write!(f, "{year:04}-{month:02}"),
            Self::Unstable => f.write_str("unstable"),
        }
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        if s == "unstable" {
            return Ok(Self::Unstable);
        }

        Self::parse_stable(&s).ok_or(ConfigError::InvalidApiVersion { version: s })
    }
}
