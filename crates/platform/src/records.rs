//! Row types for the platform's collections.
//!
//! These mirror the `profiles`, `products`, `categories`, and `banners`
//! tables. The platform owns the rows; the structs here are the typed wire
//! forms the facades read and write.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vitrine_core::{BannerId, CategoryId, Email, ProductId, ProfileId, Sector, UserId};

use crate::auth::Identity;

/// Application-owned record extending an identity with commerce attributes.
///
/// At most one profile exists per identity (`user_id` is unique). Created
/// lazily on first successful sign-in if absent; mutated by admin actions or
/// self-service; deleted only alongside the identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub email: Email,
    pub phone: Option<String>,
    pub sector: Sector,
    pub is_admin: bool,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a profile row.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub user_id: UserId,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub sector: Sector,
    pub is_admin: bool,
    pub is_blocked: bool,
}

impl NewProfile {
    /// The default profile created on first sign-in: retail, no privileges.
    ///
    /// The sector requested at sign-up stays in auth metadata; promotion to
    /// reseller is an admin action.
    #[must_use]
    pub fn default_for(identity: &Identity) -> Self {
        let email = identity
            .email
            .as_deref()
            .and_then(|raw| Email::parse(raw).ok())
            .unwrap_or_else(|| {
                // The auth service accepted this address; fall back to a
                // synthetic one rather than refuse to create the row.
                Email::parse(&format!("{}@unknown.invalid", identity.id))
                    .unwrap_or_else(|_| unreachable!("synthetic email is well-formed"))
            });

        Self {
            user_id: identity.id,
            email,
            phone: identity.user_metadata.phone.clone(),
            sector: Sector::Retail,
            is_admin: false,
            is_blocked: false,
        }
    }
}

/// Partial update for a profile row, keyed by `user_id`.
///
/// Absent fields are left untouched by the platform.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<Sector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_blocked: Option<bool>,
}

/// A catalog product with both sector prices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price_retail: Decimal,
    pub price_reseller: Decimal,
    pub image_url: Option<String>,
    pub sku: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl Product {
    /// The price shown to a viewer.
    ///
    /// Reseller profiles see the reseller price; retail profiles and
    /// anonymous viewers see the retail price.
    #[must_use]
    pub const fn price_for(&self, sector: Option<Sector>) -> Decimal {
        match sector {
            Some(Sector::Reseller) => self.price_reseller,
            Some(Sector::Retail) | None => self.price_retail,
        }
    }
}

/// Insert payload for a product row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price_retail: Decimal,
    pub price_reseller: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

/// Partial update for a product row.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_retail: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_reseller: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

/// Filter for product listings; absent fields mean "no restriction".
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive containment match against name or description.
    pub text: Option<String>,
    /// Exact category slug.
    pub category_slug: Option<String>,
}

/// A flat category used as a filter key - no hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// Insert payload for a category row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
}

/// Home-carousel content row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Banner {
    pub id: BannerId,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub position: i32,
    pub is_active: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use vitrine_core::UserId;

    fn product() -> Product {
        Product {
            id: ProductId::generate(),
            name: "Wireless Mouse".to_owned(),
            description: Some("Optical mouse".to_owned()),
            price_retail: Decimal::new(14990, 2),
            price_reseller: Decimal::new(9990, 2),
            image_url: None,
            sku: Some("MOU-001".to_owned()),
            category_id: None,
        }
    }

    #[test]
    fn test_price_for_reseller() {
        assert_eq!(
            product().price_for(Some(Sector::Reseller)),
            Decimal::new(9990, 2)
        );
    }

    #[test]
    fn test_price_for_retail_and_anonymous() {
        let p = product();
        assert_eq!(p.price_for(Some(Sector::Retail)), Decimal::new(14990, 2));
        assert_eq!(p.price_for(None), Decimal::new(14990, 2));
    }

    #[test]
    fn test_profile_patch_skips_absent_fields() {
        let patch = ProfilePatch {
            sector: Some(Sector::Reseller),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            r#"{"sector":"reseller"}"#
        );
    }

    #[test]
    fn test_default_profile_is_retail_without_privileges() {
        let identity = Identity {
            id: UserId::generate(),
            email: Some("client@example.com".to_owned()),
            email_confirmed_at: None,
            user_metadata: crate::auth::UserMetadata {
                // A reseller request at sign-up must not leak into the row.
                sector: Some(Sector::Reseller),
                phone: Some("+5511999999999".to_owned()),
            },
        };

        let row = NewProfile::default_for(&identity);
        assert_eq!(row.sector, Sector::Retail);
        assert!(!row.is_admin);
        assert!(!row.is_blocked);
        assert_eq!(row.email.as_str(), "client@example.com");
        assert_eq!(row.phone.as_deref(), Some("+5511999999999"));
    }
}
