use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dto::{validate_email_or_empty, validate_non_negative};
use crate::entity::orders::OrderStatus;
use crate::routes::params::Pagination;
use crate::sanitize::Sanitize;

/// One cart line as submitted by the storefront. Name and price are kept
/// as sent so the order snapshot survives later catalog edits.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub menu_item_id: Uuid,
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    #[validate(custom(function = "validate_non_negative", message = "Price must not be negative"))]
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

impl Sanitize for OrderItemInput {
    fn sanitize(&mut self) {
        self.name.sanitize();
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(length(min = 10, message = "Phone number must be at least 10 characters"))]
    pub customer_phone: String,
    #[validate(custom(function = "validate_email_or_empty", message = "Invalid email address"))]
    pub customer_email: Option<String>,
    #[validate(length(min = 1, message = "Order must contain at least one item"), nested)]
    pub items: Vec<OrderItemInput>,
}

impl CreateOrderRequest {
    /// Empty string from the form means no email.
    pub fn email(&self) -> Option<String> {
        self.customer_email.clone().filter(|e| !e.is_empty())
    }
}

impl Sanitize for CreateOrderRequest {
    fn sanitize(&mut self) {
        self.customer_name.sanitize();
        self.customer_phone.sanitize();
        self.customer_email.sanitize();
        self.items.sanitize();
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub success: bool,
    pub order_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

// Pagination fields are inlined rather than flattened; axum's Query
// extractor cannot deserialize numbers through serde(flatten).
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<OrderStatus>,
}

impl OrderListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}
