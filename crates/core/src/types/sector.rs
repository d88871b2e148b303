//! Pricing sector for client accounts.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing a [`Sector`] from a string.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown sector: {0:?} (expected \"retail\" or \"reseller\")")]
pub struct SectorParseError(pub String);

/// Pricing tier assigned to a client profile.
///
/// The sector determines which of a product's two prices a viewer sees:
/// reseller accounts see `price_reseller`, everyone else (retail accounts
/// and anonymous visitors) sees `price_retail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    /// Standard consumer pricing. New accounts start here.
    #[default]
    Retail,
    /// Wholesale pricing, granted by an administrator.
    Reseller,
}

impl Sector {
    /// The wire representation used by the platform's `profiles` table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Retail => "retail",
            Self::Reseller => "reseller",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sector {
    type Err = SectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "retail" => Ok(Self::Retail),
            "reseller" => Ok(Self::Reseller),
            other => Err(SectorParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_retail() {
        assert_eq!(Sector::default(), Sector::Retail);
    }

    #[test]
    fn test_display_matches_wire_form() {
        assert_eq!(Sector::Retail.to_string(), "retail");
        assert_eq!(Sector::Reseller.to_string(), "reseller");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("retail".parse::<Sector>().unwrap(), Sector::Retail);
        assert_eq!("reseller".parse::<Sector>().unwrap(), Sector::Reseller);
        assert!("wholesale".parse::<Sector>().is_err());
        // Case-sensitive on purpose: the platform stores lowercase values.
        assert!("Retail".parse::<Sector>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&Sector::Reseller).unwrap(),
            "\"reseller\""
        );
        let parsed: Sector = serde_json::from_str("\"retail\"").unwrap();
        assert_eq!(parsed, Sector::Retail);
    }
}
