use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dto::validate_non_negative;
use crate::sanitize::Sanitize;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItemRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(custom(function = "validate_non_negative", message = "Price must not be negative"))]
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
    pub category_id: Uuid,
    pub is_veg: bool,
    #[validate(range(min = 0, max = 5, message = "Spice level must be between 0 and 5"))]
    pub spice_level: i32,
    pub image: Option<String>,
}

impl Sanitize for CreateMenuItemRequest {
    fn sanitize(&mut self) {
        self.name.sanitize();
        self.description.sanitize();
        self.image.sanitize();
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItemRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_non_negative", message = "Price must not be negative"))]
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub price: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub is_veg: Option<bool>,
    #[validate(range(min = 0, max = 5, message = "Spice level must be between 0 and 5"))]
    pub spice_level: Option<i32>,
    pub image: Option<String>,
    pub is_available: Option<bool>,
}

impl Sanitize for UpdateMenuItemRequest {
    fn sanitize(&mut self) {
        self.name.sanitize();
        self.description.sanitize();
        self.image.sanitize();
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
    pub sort_order: Option<i32>,
    pub image: Option<String>,
}

impl Sanitize for CreateCategoryRequest {
    fn sanitize(&mut self) {
        self.name.sanitize();
        self.slug.sanitize();
        self.image.sanitize();
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: Option<String>,
    pub sort_order: Option<i32>,
    pub image: Option<String>,
}

impl Sanitize for UpdateCategoryRequest {
    fn sanitize(&mut self) {
        self.name.sanitize();
        self.slug.sanitize();
        self.image.sanitize();
    }
}
