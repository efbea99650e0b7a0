use chrono::{DateTime, Utc};
use domain_users::User;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// The user owning a listing, captured at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductOwner {
    pub id: Uuid,
    pub email: String,
}

impl From<&User> for ProductOwner {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user, immutable after creation
    pub owner: ProductOwner,
    /// Listing title
    pub title: String,
    /// Listing description
    pub description: String,
    /// Price in cents
    pub price_cents: i64,
    /// Stored image identifiers, in upload order
    #[serde(default)]
    pub images: Vec<String>,
    /// Identifier of the preview image; always one of `images` when set
    pub preview_image_id: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a new listing for an owner. Images are attached afterwards by
    /// the service layer.
    pub fn new(owner: ProductOwner, input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            owner,
            title: input.title,
            description: input.description,
            price_cents: input.price_cents,
            images: Vec::new(),
            preview_image_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Price in cents
    #[validate(range(min = 0))]
    pub price_cents: i64,
}

/// Raw uploaded image payload. Empty payloads are skipped during product
/// creation.
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Query filters for listing products
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct ProductFilter {
    /// Case-insensitive substring match against title and description
    pub search: Option<String>,
}

impl ProductFilter {
    /// A normalized search term, if one was supplied.
    pub fn term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
