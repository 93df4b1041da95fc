use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, Iterable, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::reservations::{
        CreateReservationRequest, ReservationListQuery, UpdateReservationStatusRequest,
    },
    entity::{
        Reservations, Settings,
        reservations::{self, ReservationStatus},
        settings,
    },
    error::{AppError, AppResult},
    models::Reservation,
    notify::Notification,
    response::{Meta, Paginated},
    state::AppState,
};

/// Book a table. The capacity check and the insert run in one transaction
/// holding the settings row under FOR UPDATE, so two bookings racing for
/// the last seats of a slot are serialized.
pub async fn create_reservation(
    state: &AppState,
    payload: CreateReservationRequest,
) -> AppResult<Reservation> {
    let txn = state.orm.begin().await?;

    let limits = Settings::find()
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .map(|s| (s.max_guests_per_slot, s.max_guests_per_reservation))
        .unwrap_or((
            settings::DEFAULT_MAX_GUESTS_PER_SLOT,
            settings::DEFAULT_MAX_GUESTS_PER_RESERVATION,
        ));
    let (max_guests_per_slot, max_guests_per_reservation) = limits;

    if payload.guests > max_guests_per_reservation {
        return Err(AppError::BadRequest(format!(
            "Maximum {max_guests_per_reservation} guests per reservation"
        )));
    }

    let holding: Vec<ReservationStatus> = ReservationStatus::iter()
        .filter(|status| status.holds_capacity())
        .collect();
    let booked: Vec<i32> = Reservations::find()
        .select_only()
        .column(reservations::Column::Guests)
        .filter(reservations::Column::Date.eq(payload.date))
        .filter(reservations::Column::Time.eq(payload.time.as_str()))
        .filter(reservations::Column::Status.is_in(holding))
        .into_tuple()
        .all(&txn)
        .await?;
    let current_guests: i32 = booked.into_iter().sum();

    if current_guests + payload.guests > max_guests_per_slot {
        return Err(AppError::BadRequest(
            "This time slot is fully booked. Please choose another time.".into(),
        ));
    }

    let reservation = reservations::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        phone: Set(payload.phone),
        email: Set(payload.email),
        date: Set(payload.date),
        time: Set(payload.time),
        guests: Set(payload.guests),
        notes: Set(payload.notes.filter(|n| !n.is_empty())),
        status: Set(ReservationStatus::Pending),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    let reservation = Reservation::from(reservation);
    state.notifier.notify(Notification::Reservation {
        reservation: reservation.clone(),
    });
    Ok(reservation)
}

/// Back-office listing, soonest slot first.
pub async fn list_reservations(
    state: &AppState,
    query: ReservationListQuery,
) -> AppResult<Paginated<Reservation>> {
    let (page, per_page, offset) = query.pagination().normalize();

    let mut finder = Reservations::find()
        .order_by_asc(reservations::Column::Date)
        .order_by_asc(reservations::Column::Time);
    if let Some(status) = query.status {
        finder = finder.filter(reservations::Column::Status.eq(status));
    }
    if let Some(date) = query.date {
        finder = finder.filter(reservations::Column::Date.eq(date));
    }

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Reservation::from)
        .collect();

    Ok(Paginated::new(items, Meta::new(page, per_page, total)))
}

pub async fn update_status(
    state: &AppState,
    id: Uuid,
    payload: UpdateReservationStatusRequest,
) -> AppResult<Reservation> {
    let reservation = Reservations::find_by_id(id).one(&state.orm).await?;
    let reservation = match reservation {
        Some(reservation) => reservation,
        None => return Err(AppError::NotFound),
    };

    if !reservation.status.can_transition_to(payload.status) {
        return Err(AppError::BadRequest(format!(
            "Cannot change status from {} to {}",
            reservation.status.as_str(),
            payload.status.as_str()
        )));
    }

    let mut active: reservations::ActiveModel = reservation.into();
    active.status = Set(payload.status);
    active.updated_at = Set(Utc::now().into());
    let reservation = active.update(&state.orm).await?;

    let reservation = Reservation::from(reservation);
    state.notifier.notify(Notification::Reservation {
        reservation: reservation.clone(),
    });
    Ok(reservation)
}
