use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Product, ProductFilter};

/// Repository trait for Product persistence.
///
/// Each query is a named method; implementations can use any storage backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find a product by ID
    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// List products; an empty filter returns everything
    async fn find_all(&self, filter: ProductFilter) -> ProductResult<Vec<Product>>;

    /// Insert or update a product record
    async fn save(&self, product: Product) -> ProductResult<Product>;

    /// Delete a product by ID; unknown ids are a no-op
    async fn delete_by_id(&self, id: Uuid) -> ProductResult<()>;
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn find_all(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut result: Vec<Product> = products
            .values()
            .filter(|p| match filter.term() {
                Some(term) => {
                    let term = term.to_lowercase();
                    p.title.to_lowercase().contains(&term)
                        || p.description.to_lowercase().contains(&term)
                }
                None => true,
            })
            .cloned()
            .collect();

        // Listing order
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(result)
    }

    async fn save(&self, product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;
        products.insert(product.id, product.clone());

        tracing::debug!(product_id = %product.id, "Saved product");
        Ok(product)
    }

    async fn delete_by_id(&self, id: Uuid) -> ProductResult<()> {
        let mut products = self.products.write().await;

        if products.remove(&id).is_some() {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(())
    }
}
