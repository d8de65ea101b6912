// ── Product form draft ──

use wares_api::{NewProduct, Product};

use crate::error::CoreError;

/// Editable form fields for creating or updating a product.
///
/// Defaults to a blank form: empty text fields, price 0, stock 0.
/// Stock cannot go negative; the type rules it out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: u32,
}

impl ProductDraft {
    /// Pre-populate the form from an existing record (edit flow).
    pub fn from_product(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price,
            category: product.category.clone(),
            stock: product.stock,
        }
    }

    /// Client-side validation, run before any network call.
    ///
    /// Text fields must be non-empty after trimming, a category must be
    /// selected, and the price must be positive. The first violation is
    /// returned as a user-visible message.
    pub fn validate(&self) -> Result<NewProduct, CoreError> {
        let title = self.title.trim();
        let description = self.description.trim();
        let category = self.category.trim();

        if title.is_empty() {
            return Err(CoreError::Validation {
                message: "Title is required".into(),
            });
        }
        if description.is_empty() {
            return Err(CoreError::Validation {
                message: "Description is required".into(),
            });
        }
        if category.is_empty() {
            return Err(CoreError::Validation {
                message: "Select a category".into(),
            });
        }
        if self.price <= 0.0 {
            return Err(CoreError::Validation {
                message: "Price must be greater than zero".into(),
            });
        }

        Ok(NewProduct {
            title: title.to_owned(),
            description: description.to_owned(),
            price: self.price,
            category: category.to_owned(),
            stock: self.stock,
        })
    }
}
