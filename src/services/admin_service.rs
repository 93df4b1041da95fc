use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, EntityTrait};
use uuid::Uuid;

use crate::dto::settings::UpdateSettingsRequest;
use crate::entity::settings::{
    self, DEFAULT_MAX_GUESTS_PER_RESERVATION, DEFAULT_MAX_GUESTS_PER_SLOT,
    DEFAULT_SLOT_INTERVAL_MINUTES, Entity as SettingsTable,
};
use crate::error::AppResult;
use crate::models::{DashboardStats, Settings};
use crate::state::AppState;

/// Headline numbers for the admin dashboard. These are plain SQL aggregates
/// over whole tables, so they go straight through the sqlx pool.
pub async fn dashboard(state: &AppState) -> AppResult<DashboardStats> {
    let order_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(&state.pool)
        .await?;

    let reservation_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE status = 'PENDING'")
            .fetch_one(&state.pool)
            .await?;

    let menu_item_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
        .fetch_one(&state.pool)
        .await?;

    let revenue: Decimal =
        sqlx::query_scalar("SELECT COALESCE(SUM(total), 0) FROM orders WHERE status = 'COMPLETED'")
            .fetch_one(&state.pool)
            .await?;

    Ok(DashboardStats {
        order_count,
        reservation_count,
        menu_item_count,
        revenue,
    })
}

/// Fetch the capacity settings row, creating it with defaults on first read.
pub async fn get_settings(state: &AppState) -> AppResult<Settings> {
    let row = find_or_create(state).await?;
    Ok(row.into())
}

pub async fn update_settings(
    state: &AppState,
    payload: UpdateSettingsRequest,
) -> AppResult<Settings> {
    let existing = find_or_create(state).await?;

    let mut active: settings::ActiveModel = existing.into();
    if let Some(max_guests_per_slot) = payload.max_guests_per_slot {
        active.max_guests_per_slot = Set(max_guests_per_slot);
    }
    if let Some(max_guests_per_reservation) = payload.max_guests_per_reservation {
        active.max_guests_per_reservation = Set(max_guests_per_reservation);
    }
    if let Some(slot_interval_minutes) = payload.slot_interval_minutes {
        active.slot_interval_minutes = Set(slot_interval_minutes);
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    Ok(updated.into())
}

async fn find_or_create(state: &AppState) -> AppResult<settings::Model> {
    if let Some(row) = SettingsTable::find().one(&state.orm).await? {
        return Ok(row);
    }

    let row = settings::ActiveModel {
        id: Set(Uuid::new_v4()),
        max_guests_per_slot: Set(DEFAULT_MAX_GUESTS_PER_SLOT),
        max_guests_per_reservation: Set(DEFAULT_MAX_GUESTS_PER_RESERVATION),
        slot_interval_minutes: Set(DEFAULT_SLOT_INTERVAL_MINUTES),
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(row)
}
