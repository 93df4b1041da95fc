use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::entity::reservations::ReservationStatus;
use crate::routes::params::Pagination;
use crate::sanitize::Sanitize;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 10, message = "Phone number must be at least 10 characters"))]
    pub phone: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(range(min = 1, message = "Guests must be at least 1"))]
    pub guests: i32,
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    #[validate(length(min = 1, message = "Time is required"))]
    pub time: String,
    pub notes: Option<String>,
}

impl Sanitize for CreateReservationRequest {
    fn sanitize(&mut self) {
        self.name.sanitize();
        self.phone.sanitize();
        self.email.sanitize();
        self.time.sanitize();
        self.notes.sanitize();
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationCreated {
    pub success: bool,
    pub id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReservationStatusRequest {
    pub status: ReservationStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<ReservationStatus>,
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
}

impl ReservationListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}
