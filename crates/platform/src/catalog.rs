//! Catalog facade: products, categories, banners.
//!
//! Read operations serve the storefront; the targeted writes at the bottom
//! serve the back-office. Every method is one request against the table API
//! with no cache in between.

use tracing::instrument;

use vitrine_core::{CategoryId, ProductId};

use crate::error::PlatformError;
use crate::records::{Banner, Category, NewCategory, NewProduct, Product, ProductFilter, ProductPatch};
use crate::rest::{Order, RestClient};

/// Upper bound on a product listing page.
pub const PRODUCT_PAGE_SIZE: usize = 50;

/// Typed access to the catalog collections.
#[derive(Debug, Clone)]
pub struct Catalog {
    rest: RestClient,
}

impl Catalog {
    /// Create a catalog facade over a table API client.
    #[must_use]
    pub const fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// List products matching a filter, ordered by name.
    ///
    /// Text matches case-insensitively against name or description; the
    /// category filter matches an exact slug; both together intersect. An
    /// empty filter returns an unfiltered page of at most
    /// [`PRODUCT_PAGE_SIZE`] rows. An unknown category slug yields an empty
    /// listing rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport, API, or decode failure.
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, PlatformError> {
        let category = match &filter.category_slug {
            Some(slug) => match self.category_by_slug(slug).await? {
                Some(category) => Some(category),
                None => return Ok(Vec::new()),
            },
            None => None,
        };

        let mut request = self
            .rest
            .table("products")
            .select("*")
            .order("name", Order::Asc)
            .limit(PRODUCT_PAGE_SIZE);

        if let Some(text) = filter.text.as_deref().filter(|t| !t.trim().is_empty()) {
            request = request.or_ilike(&["name", "description"], text.trim());
        }
        if let Some(category) = category {
            request = request.eq("category_id", &category.id.to_string());
        }

        request.fetch().await
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport, API, or decode failure.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, PlatformError> {
        self.rest
            .table("products")
            .select("*")
            .eq("id", &id.to_string())
            .fetch_optional()
            .await
    }

    /// List all categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport, API, or decode failure.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, PlatformError> {
        self.rest
            .table("categories")
            .select("*")
            .order("name", Order::Asc)
            .fetch()
            .await
    }

    /// Find a category by its slug.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport, API, or decode failure.
    pub async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, PlatformError> {
        self.rest
            .table("categories")
            .select("*")
            .eq("slug", slug)
            .fetch_optional()
            .await
    }

    /// List active banners in position order.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport, API, or decode failure.
    #[instrument(skip(self))]
    pub async fn list_banners(&self) -> Result<Vec<Banner>, PlatformError> {
        self.rest
            .table("banners")
            .select("*")
            .eq("is_active", "true")
            .order("position", Order::Asc)
            .fetch()
            .await
    }

    // =========================================================================
    // Back-office writes
    // =========================================================================

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport, API, or decode failure.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, PlatformError> {
        self.rest.table("products").insert(product).await
    }

    /// Patch a product by id.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::NotFound` if no row matches the id.
    #[instrument(skip(self, patch))]
    pub async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, PlatformError> {
        let mut rows: Vec<Product> = self
            .rest
            .table("products")
            .eq("id", &id.to_string())
            .update(patch)
            .await?;
        if rows.is_empty() {
            return Err(PlatformError::NotFound(format!("product {id}")));
        }
        Ok(rows.swap_remove(0))
    }

    /// Delete a product by id.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport or API failure.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), PlatformError> {
        self.rest
            .table("products")
            .eq("id", &id.to_string())
            .delete()
            .await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport, API, or decode failure.
    #[instrument(skip(self, category), fields(slug = %category.slug))]
    pub async fn create_category(&self, category: &NewCategory) -> Result<Category, PlatformError> {
        self.rest.table("categories").insert(category).await
    }

    /// Delete a category by id.
    ///
    /// Products pointing at it keep a dangling `category_id`; the platform
    /// schema nulls the column via its foreign-key rule.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport or API failure.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), PlatformError> {
        self.rest
            .table("categories")
            .eq("id", &id.to_string())
            .delete()
            .await
    }
}
