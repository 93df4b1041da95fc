use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(range(min = 1, message = "Slot capacity must be at least 1"))]
    pub max_guests_per_slot: Option<i32>,
    #[validate(range(min = 1, message = "Reservation capacity must be at least 1"))]
    pub max_guests_per_reservation: Option<i32>,
    #[validate(range(min = 5, max = 120, message = "Slot interval must be between 5 and 120 minutes"))]
    pub slot_interval_minutes: Option<i32>,
}
