//! Products Domain
//!
//! Marketplace listings: creation with image attachments (the first stored
//! image becomes the preview), filtered listing, lookup and deletion. The
//! owning user is bound at creation time from the caller's [`Principal`]
//! and never changes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, owner binding, image sequencing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────────────┐
//! │ Repository + Store  │  ← Data access and image blobs (traits + impls)
//! └──────┬──────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! [`Principal`]: domain_users::Principal

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod storage;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{CreateProduct, ImageUpload, Product, ProductFilter, ProductOwner};
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
pub use storage::{ImageStore, InMemoryImageStore};
