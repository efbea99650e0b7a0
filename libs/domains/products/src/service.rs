//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use domain_users::{Principal, User, UserError, UserRepository};

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, ImageUpload, Product, ProductFilter, ProductOwner};
use crate::repository::ProductRepository;
use crate::storage::ImageStore;

/// Product service providing business logic operations.
///
/// Orchestrates the product repository, the user repository (owner
/// resolution from the caller's [`Principal`]) and the image store.
pub struct ProductService<P, U, S>
where
    P: ProductRepository,
    U: UserRepository,
    S: ImageStore,
{
    products: Arc<P>,
    users: Arc<U>,
    images: Arc<S>,
}

impl<P, U, S> ProductService<P, U, S>
where
    P: ProductRepository,
    U: UserRepository,
    S: ImageStore,
{
    pub fn new(products: P, users: U, images: S) -> Self {
        Self {
            products: Arc::new(products),
            users: Arc::new(users),
            images: Arc::new(images),
        }
    }

    /// List products; an empty filter returns everything in repository order.
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        self.products.find_all(filter).await
    }

    /// Resolve the acting user from an explicit principal.
    pub async fn user_by_principal(&self, principal: &Principal) -> ProductResult<User> {
        let user = self
            .users
            .find_by_email(principal.name())
            .await?
            .ok_or_else(|| UserError::PrincipalNotFound(principal.name().to_string()))?;
        Ok(user)
    }

    /// Create a listing owned by the caller.
    ///
    /// Non-empty image payloads are stored in call order and their
    /// identifiers appended to the product; the first stored image becomes
    /// the preview. A storage failure aborts before the repository save, so
    /// no product record ever references an unstored image. Exactly one
    /// repository save happens on success.
    #[instrument(skip(self, input, images), fields(principal = %principal.name(), title = %input.title))]
    pub async fn save_product(
        &self,
        principal: &Principal,
        input: CreateProduct,
        images: Vec<ImageUpload>,
    ) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let owner = self.user_by_principal(principal).await?;
        let mut product = Product::new(ProductOwner::from(&owner), input);

        for image in &images {
            if image.is_empty() {
                continue;
            }
            let image_id = self.images.store(image).await?;
            product.images.push(image_id);
        }
        product.preview_image_id = product.images.first().cloned();

        tracing::info!(
            product_id = %product.id,
            owner = %product.owner.email,
            image_count = product.images.len(),
            "Creating product"
        );
        self.products.save(product).await
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Delete a product. Unknown ids are accepted as a no-op.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        self.products.delete_by_id(id).await
    }
}

impl<P, U, S> Clone for ProductService<P, U, S>
where
    P: ProductRepository,
    U: UserRepository,
    S: ImageStore,
{
    fn clone(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
            users: Arc::clone(&self.users),
            images: Arc::clone(&self.images),
        }
    }
}
