use sea_orm::entity::prelude::*;

// Single-row table holding reservation capacity settings. When the row is
// missing, admission control falls back to the defaults below.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub max_guests_per_slot: i32,
    pub max_guests_per_reservation: i32,
    pub slot_interval_minutes: i32,
    pub updated_at: DateTimeWithTimeZone,
}

pub const DEFAULT_MAX_GUESTS_PER_SLOT: i32 = 40;
pub const DEFAULT_MAX_GUESTS_PER_RESERVATION: i32 = 10;
pub const DEFAULT_SLOT_INTERVAL_MINUTES: i32 = 15;

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
